//! Task spawning and cancellation.
//!
//! Background work started by a chat surface is always paired with a
//! [`CancellationToken`] or an abort on its [`JoinHandle`], so tearing the
//! surface down never leaves a subscription running.

pub use tokio::task::{yield_now, AbortHandle, JoinError, JoinHandle};
pub use tokio_util::sync::CancellationToken;

/// Spawns a new asynchronous task on the current runtime.
///
/// # Examples
///
/// ```rust
/// use core_async::task::spawn;
///
/// # async fn example() {
/// let handle = spawn(async { 42 });
/// assert_eq!(handle.await.unwrap(), 42);
/// # }
/// ```
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
