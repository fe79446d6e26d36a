//! Runtime abstraction layer for the chat widget SDK.
//!
//! Every crate in the workspace spawns background work (profile fetch, avatar
//! download, connectivity subscription, delayed script injection) through this
//! crate instead of naming Tokio directly. Keeping the executor behind one
//! seam lets a host embed the SDK in whatever runtime it already drives.
//!
//! # Modules
//!
//! - `task`: task spawning and cancellation
//! - `time`: sleep, timeouts, durations
//! - `sync`: channels and async locks
//! - `runtime`: handles and a blocking entry point for FFI-style hosts
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//! use core_async::time::{sleep, Duration};
//!
//! async fn example() {
//!     let handle = task::spawn(async {
//!         sleep(Duration::from_millis(300)).await;
//!         "retry injection"
//!     });
//!     let _ = handle.await;
//! }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
