//! # Host Bridge Traits
//!
//! Capability traits that each host platform implements for the chat widget
//! SDK.
//!
//! ## Overview
//!
//! The SDK never talks to a UI toolkit, a web engine or the network stack
//! directly. Each of those collaborators is a trait in this crate, and the
//! host (iOS, Android, desktop) hands concrete adapters to the SDK at
//! construction time.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Single-shot HTTP requests (profile and avatar fetch)
//! - [`NetworkMonitor`](network::NetworkMonitor) - Path reachability changes
//!
//! ### Web content
//! - [`WebView`](webview::WebView) - Load HTML, evaluate script
//! - [`ResourceBundle`](resources::ResourceBundle) - Packaged `index.html` and its base URL
//!
//! ### Utilities
//! - [`LoggerSink`](logging::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ HTTP, network, resources |
//! | iOS      | host app (WKWebView) | 📋 Host-provided |
//! | Android  | host app (WebView)   | 📋 Host-provided |
//!
//! The web view itself is always host-provided; only the host owns a
//! rendering engine.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it with an actionable message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so adapters can be shared with the
//! background tasks a chat surface spawns.
//!
//! ## Examples
//!
//! ### Implementing WebView
//!
//! ```ignore
//! use bridge_traits::webview::{ScriptValue, WebView};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//! use url::Url;
//!
//! pub struct MyWebView { /* engine handle */ }
//!
//! #[async_trait]
//! impl WebView for MyWebView {
//!     async fn load_html(&self, html: String, base_url: Option<Url>) -> Result<()> {
//!         todo!()
//!     }
//!
//!     async fn evaluate_script(&self, script: String) -> Result<ScriptValue> {
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod logging;
pub mod network;
pub mod resources;
pub mod webview;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use logging::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use network::{NetworkChangeStream, NetworkInfo, NetworkMonitor, NetworkType, PathStatus};
pub use resources::ResourceBundle;
pub use webview::{ScriptValue, WebView, WebViewSettings};
