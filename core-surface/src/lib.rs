//! # Chat Surface
//!
//! The screen that hosts the web chat widget: a native header (profile,
//! connectivity icon, back button) above a web view running the bundled
//! page.
//!
//! ## Overview
//!
//! - [`ChatSurface`] describes a surface before it is on screen
//! - [`SurfaceHandle`] drives a running surface from the host
//! - [`SurfaceView`] / [`SurfacePresenter`] are implemented by the host UI
//! - [`HeaderModel`] is what the host draws in the header
//! - [`ConnectivityObserver`] feeds the header's connectivity icon
//!
//! ## Usage
//!
//! ```ignore
//! let surface = ChatSurface::new(config, ThemeStore::global().snapshot(), None, deps);
//! let settings = surface.webview_settings();
//! // build the native screen and web view with `settings`...
//! let handle = surface.attach(view, webview)?;
//!
//! // from the web view's delegate callbacks:
//! handle.page_loaded()?;
//! handle.receive_message("close", serde_json::Value::Null)?;
//! ```

pub mod connectivity;
pub mod controller;
pub mod error;
pub mod header;
pub mod view;

pub use connectivity::{ConnectivityObserver, ConnectivityTracker};
pub use controller::{
    ChatSurface, InjectionStrategy, SurfaceDependencies, SurfaceHandle, SurfaceOptions,
    SurfaceState, DEFAULT_RETRY_DELAY,
};
pub use error::{Result, SurfaceError};
pub use header::{AvatarContent, HeaderModel, HEADER_HEIGHT};
pub use view::{PresentCompletion, PresentationStyle, SurfacePresenter, SurfaceView};
