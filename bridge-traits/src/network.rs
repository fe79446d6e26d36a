//! Network Monitoring Abstraction
//!
//! Provides path reachability updates. The chat header only needs one bit of
//! this (satisfied or not), but adapters report the full path information so
//! hosts can reuse the same monitor elsewhere.

use crate::error::Result;

/// Network connection type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkType {
    /// Cellular/mobile data connection
    Cellular,
    /// WiFi connection
    WiFi,
    /// Ethernet connection
    Ethernet,
    /// Other or unknown connection type
    Other,
}

/// Reachability of the current network path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    /// The path is usable for outgoing traffic
    Satisfied,
    /// No usable path
    Unsatisfied,
    /// A path exists but must be brought up first (e.g. VPN on demand)
    RequiresConnection,
}

/// Network path information
#[derive(Debug, Clone)]
pub struct NetworkInfo {
    pub status: PathStatus,
    pub network_type: Option<NetworkType>,
    /// Whether the connection is considered expensive by the OS
    pub is_expensive: bool,
    /// Whether the OS asked apps to limit data usage
    pub is_constrained: bool,
}

impl NetworkInfo {
    /// Whether the path can carry traffic right now.
    pub fn is_satisfied(&self) -> bool {
        self.status == PathStatus::Satisfied
    }
}

/// Network monitor trait
///
/// # Platform Support
///
/// - **iOS / macOS**: `NWPathMonitor`
/// - **Android**: `ConnectivityManager.NetworkCallback`
/// - **Desktop**: polling probe (see `bridge-desktop`)
///
/// # Example
///
/// ```ignore
/// use bridge_traits::network::NetworkMonitor;
///
/// async fn watch(monitor: &dyn NetworkMonitor) -> Result<()> {
///     let mut changes = monitor.subscribe_changes().await?;
///     while let Some(info) = changes.next().await {
///         println!("connected: {}", info.is_satisfied());
///     }
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait NetworkMonitor: Send + Sync {
    /// Get current network information
    async fn get_network_info(&self) -> Result<NetworkInfo>;

    /// Check if currently connected to any network
    async fn is_connected(&self) -> bool {
        matches!(
            self.get_network_info().await,
            Ok(NetworkInfo {
                status: PathStatus::Satisfied,
                ..
            })
        )
    }

    /// Subscribe to path changes
    ///
    /// Returns a stream of path updates. Implementations emit an update
    /// whenever the platform reports a new path; consumers handle duplicates.
    async fn subscribe_changes(&self) -> Result<Box<dyn NetworkChangeStream>>;
}

/// Stream of network path changes
#[async_trait::async_trait]
pub trait NetworkChangeStream: Send {
    /// Get the next network info update
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<NetworkInfo>;
}
