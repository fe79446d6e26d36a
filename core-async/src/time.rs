//! Time-related abstractions.
//!
//! Tests drive these through Tokio's paused clock (`start_paused = true`), so
//! fixed delays such as the 300 ms configuration re-injection stay
//! deterministic.

pub use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
pub use tokio::time::{interval, sleep, sleep_until, timeout, Interval, Sleep, Timeout};

/// Error returned by [`timeout`] when the deadline elapses first.
pub type Elapsed = tokio::time::error::Elapsed;
