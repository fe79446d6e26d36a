//! # Desktop Bridge Implementations
//!
//! Default implementations of the host capability traits for desktop
//! platforms (macOS, Windows, Linux), used by desktop hosts and by the SDK's
//! own integration tests.
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `NetworkMonitor` using a periodic TCP reachability probe
//! - `ResourceBundle` reading the packaged web widget from a directory
//!
//! The web view is not provided here: a desktop host wires its own engine
//! (for example a `wry` window) to `bridge_traits::webview::WebView`.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DirectoryBundle, ProbeNetworkMonitor, ReqwestHttpClient};
//!
//! let http_client = ReqwestHttpClient::new()?;
//! let monitor = ProbeNetworkMonitor::new();
//! let bundle = DirectoryBundle::new("./widget")?;
//! ```

mod http;
mod network;
mod resources;

pub use http::ReqwestHttpClient;
pub use network::ProbeNetworkMonitor;
pub use resources::DirectoryBundle;
