//! Messages posted by the web page over named bridge channels.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use core_runtime::logging::WEBVIEW_TARGET;

use crate::error::{ProtocolError, Result};

/// Channel carrying console output mirrored from the page.
pub const CONSOLE_CHANNEL: &str = "console";
/// Channel the page posts on when the chat should be dismissed.
pub const CLOSE_CHANNEL: &str = "close";
/// Channel the page posts on once its listeners are installed.
pub const READY_CHANNEL: &str = "ready";

/// Every channel the host must register a message handler for.
pub const BRIDGE_CHANNELS: [&str; 3] = [CONSOLE_CHANNEL, CLOSE_CHANNEL, READY_CHANNEL];

/// Console method the page called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleLevel {
    #[default]
    Log,
    Error,
    Warn,
    Info,
}

impl ConsoleLevel {
    /// Unknown or missing types are plain `log`.
    pub fn from_type(kind: Option<&str>) -> Self {
        match kind {
            Some("error") => ConsoleLevel::Error,
            Some("warn") => ConsoleLevel::Warn,
            Some("info") => ConsoleLevel::Info,
            _ => ConsoleLevel::Log,
        }
    }
}

/// A decoded bridge message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeMessage {
    ConsoleLog { level: ConsoleLevel, text: String },
    CloseRequested,
    PageReady,
    Unrecognized { channel: String },
}

impl BridgeMessage {
    /// Decode a message from its channel name and JSON payload.
    ///
    /// The payload is only inspected on the console channel, which expects
    /// an object of the form `{"type": "warn", "message": "..."}`.
    ///
    /// # Errors
    ///
    /// [`ProtocolError::InvalidPayload`] when a console payload is not an
    /// object.
    pub fn decode(channel: &str, payload: &Value) -> Result<Self> {
        match channel {
            CONSOLE_CHANNEL => {
                let object = payload.as_object().ok_or_else(|| ProtocolError::InvalidPayload {
                    channel: channel.to_string(),
                    message: format!("expected an object, got {}", kind_of(payload)),
                })?;

                let level = ConsoleLevel::from_type(object.get("type").and_then(Value::as_str));
                let text = object
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();

                Ok(BridgeMessage::ConsoleLog { level, text })
            }
            CLOSE_CHANNEL => Ok(BridgeMessage::CloseRequested),
            READY_CHANNEL => Ok(BridgeMessage::PageReady),
            other => Ok(BridgeMessage::Unrecognized {
                channel: other.to_string(),
            }),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Re-emit page console output as a tracing event on the webview target.
pub fn log_console(level: ConsoleLevel, text: &str) {
    match level {
        ConsoleLevel::Log => debug!(target: WEBVIEW_TARGET, "{}", text),
        ConsoleLevel::Info => info!(target: WEBVIEW_TARGET, "{}", text),
        ConsoleLevel::Warn => warn!(target: WEBVIEW_TARGET, "{}", text),
        ConsoleLevel::Error => error!(target: WEBVIEW_TARGET, "{}", text),
    }
}
