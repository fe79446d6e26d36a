//! Synchronization primitives.
//!
//! The chat surface controller owns its state on a single task and receives
//! every background result over an [`mpsc`] channel; [`broadcast`] carries
//! surface events to any number of host listeners.

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};
