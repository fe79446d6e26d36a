//! # Bridge Protocol
//!
//! The vocabulary shared between the SDK and the bundled web page.
//!
//! Page to host: messages posted on named channels (`console`, `close`,
//! `ready`), decoded into [`BridgeMessage`].
//!
//! Host to page: scripts evaluated in the page that publish the
//! configuration ([`initial_injection_script`], [`retry_injection_script`])
//! or ask the page to close ([`close_request_script`]).

pub mod error;
pub mod injection;
pub mod message;

pub use error::{ProtocolError, Result};
pub use injection::{
    close_request_script, initial_injection_script, retry_injection_script, PageConfig,
    CLOSE_EVENT, CONFIG_LOADED_EVENT,
};
pub use message::{log_console, BridgeMessage, ConsoleLevel, BRIDGE_CHANNELS};
