//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the chat widget SDK:
//! - SDK configuration (credentials, endpoints, header resources)
//! - Theme state (header colors with derived text color)
//! - Logging and tracing infrastructure
//! - Surface event bus
//!
//! ## Overview
//!
//! Every other SDK crate depends on this one for its configuration types and
//! logging conventions. Nothing here touches the network or a web view.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod theme;

pub use config::{ChatwootConfig, ChatwootConfigBuilder, ImageAsset};
pub use error::{Error, Result};
pub use theme::{Color, ThemeSnapshot, ThemeStore};
