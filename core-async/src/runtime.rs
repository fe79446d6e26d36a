//! Runtime utilities that abstract over the underlying async executor.
//!
//! Hosts that call into the SDK from a non-async context (a UI thread, an FFI
//! shim) use [`block_on`] or keep a [`Handle`] around to spawn onto.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion on a fresh current-thread runtime.
///
/// # Panics
///
/// Panics if the runtime cannot be built, which only happens when the OS
/// refuses to hand out the timer or I/O driver.
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}

/// Returns the handle of the runtime driving the current task, if any.
pub fn current() -> Option<Handle> {
    Handle::try_current().ok()
}
