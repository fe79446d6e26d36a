//! Network Monitoring Implementation

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    network::{NetworkChangeStream, NetworkInfo, NetworkMonitor, NetworkType, PathStatus},
};
use core_async::time::{sleep, timeout, Duration};
use tracing::debug;

const DEFAULT_PROBE_ADDR: &str = "1.1.1.1:443";
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Desktop network monitor implementation
///
/// Desktop operating systems expose path monitoring through APIs that need
/// platform-specific bindings (netlink, SystemConfiguration, NLM). This
/// adapter approximates them with a TCP connect probe: a successful connect
/// means the path is satisfied.
#[derive(Debug, Clone)]
pub struct ProbeNetworkMonitor {
    probe_addr: String,
    probe_timeout: Duration,
    poll_interval: Duration,
}

impl ProbeNetworkMonitor {
    /// Create a new network monitor
    pub fn new() -> Self {
        Self {
            probe_addr: DEFAULT_PROBE_ADDR.to_string(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Probe a different `host:port`.
    pub fn with_probe_addr(mut self, addr: impl Into<String>) -> Self {
        self.probe_addr = addr.into();
        self
    }

    /// Change how often the change stream re-probes.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    async fn probe(&self) -> PathStatus {
        match timeout(
            self.probe_timeout,
            tokio::net::TcpStream::connect(self.probe_addr.as_str()),
        )
        .await
        {
            Ok(Ok(_)) => PathStatus::Satisfied,
            Ok(Err(_)) | Err(_) => PathStatus::Unsatisfied,
        }
    }
}

impl Default for ProbeNetworkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NetworkMonitor for ProbeNetworkMonitor {
    async fn get_network_info(&self) -> Result<NetworkInfo> {
        let status = self.probe().await;
        debug!(status = ?status, probe = %self.probe_addr, "Network path probed");

        Ok(NetworkInfo {
            status,
            // A TCP probe cannot tell WiFi from Ethernet
            network_type: (status == PathStatus::Satisfied).then_some(NetworkType::Other),
            is_expensive: false,
            is_constrained: false,
        })
    }

    async fn subscribe_changes(&self) -> Result<Box<dyn NetworkChangeStream>> {
        Ok(Box::new(ProbeChangeStream {
            monitor: self.clone(),
            first: true,
        }))
    }
}

/// Change stream that re-probes on a fixed interval.
///
/// The first update is emitted immediately; later updates follow every
/// poll interval, whether or not the status changed.
struct ProbeChangeStream {
    monitor: ProbeNetworkMonitor,
    first: bool,
}

#[async_trait]
impl NetworkChangeStream for ProbeChangeStream {
    async fn next(&mut self) -> Option<NetworkInfo> {
        if self.first {
            self.first = false;
        } else {
            sleep(self.monitor.poll_interval).await;
        }

        self.monitor.get_network_info().await.ok()
    }
}
