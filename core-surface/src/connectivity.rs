//! Connectivity observation for the header icon.

use std::sync::Arc;

use bridge_traits::network::NetworkMonitor;
use core_async::task::{spawn, CancellationToken};
use tracing::{debug, warn};

/// Last known connectivity, starting optimistic.
///
/// Only changes are reported, so the header icon is swapped once per flip
/// however often the platform repeats itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityTracker {
    connected: bool,
}

impl ConnectivityTracker {
    pub fn new() -> Self {
        Self { connected: true }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Record a reading; `Some(flag)` only when it differs from the last one.
    pub fn update(&mut self, connected: bool) -> Option<bool> {
        if connected == self.connected {
            return None;
        }
        self.connected = connected;
        Some(connected)
    }
}

impl Default for ConnectivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Background subscription to a [`NetworkMonitor`].
///
/// Every reading is forwarded to `sink` as a plain reachability flag. The
/// subscription ends on [`stop`](Self::stop), on drop, or when the monitor's
/// stream finishes.
#[derive(Debug)]
pub struct ConnectivityObserver {
    cancel: CancellationToken,
}

impl ConnectivityObserver {
    /// Must be called from within the async runtime.
    pub fn start<F>(monitor: Arc<dyn NetworkMonitor>, sink: F) -> Self
    where
        F: Fn(bool) + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        spawn(async move {
            let mut stream = tokio::select! {
                _ = token.cancelled() => return,
                subscribed = monitor.subscribe_changes() => match subscribed {
                    Ok(stream) => stream,
                    Err(error) => {
                        warn!(error = %error, "Network monitor unavailable");
                        return;
                    }
                },
            };

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    next = stream.next() => match next {
                        Some(info) => sink(info.is_satisfied()),
                        None => break,
                    },
                }
            }

            debug!("Connectivity observation ended");
        });

        Self { cancel }
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for ConnectivityObserver {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
