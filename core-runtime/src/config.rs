//! # SDK Configuration
//!
//! Provides the configuration value the host hands to the SDK before it
//! creates any chat surface.
//!
//! ## Overview
//!
//! [`ChatwootConfig`] is immutable once built. It carries the account
//! credentials and endpoints that are injected into the web widget, plus the
//! header presentation settings (inbox name, font size, icons). Use
//! [`ChatwootConfigBuilder`] to construct it; the builder fails fast when a
//! required field is missing but otherwise trusts the caller.
//!
//! ## Required Fields
//!
//! - account id
//! - API host (e.g. `https://app.chatwoot.com`)
//! - access token
//! - pubsub token
//! - websocket URL
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::ChatwootConfig;
//!
//! let config = ChatwootConfig::builder()
//!     .account_id(1)
//!     .api_host("https://app.chatwoot.com")
//!     .access_token("token")
//!     .pubsub_token("pubsub")
//!     .websocket_url("wss://app.chatwoot.com/cable")
//!     .inbox_name("Support")
//!     .build()
//!     .expect("all required fields set");
//!
//! assert_eq!(config.inbox_name, "Support");
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::ChatwootConfig;
//!
//! // Missing credentials: build() names the first missing field
//! let config = ChatwootConfig::builder()
//!     .account_id(1)
//!     .build()
//!     .expect("Should fail - missing API host");
//! ```

use crate::error::{Error, Result};
use bytes::Bytes;
use std::fmt;
use std::path::PathBuf;

/// Default inbox label shown in the header.
pub const DEFAULT_INBOX_NAME: &str = "Chat";

/// Default header font size in points.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// An image resource the host renders in the header.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageAsset {
    /// A platform symbol name (SF Symbols on Apple platforms)
    System(String),
    /// A file inside the host's resource bundle
    Bundled(PathBuf),
    /// Encoded image bytes (PNG, JPEG, ...)
    Data(Bytes),
}

impl ImageAsset {
    pub fn system(name: impl Into<String>) -> Self {
        Self::System(name.into())
    }

    pub fn default_back_arrow() -> Self {
        Self::system("chevron.left")
    }

    pub fn default_connected() -> Self {
        Self::system("wifi")
    }

    pub fn default_disconnected() -> Self {
        Self::system("wifi.slash")
    }
}

impl fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageAsset::System(name) => f.debug_tuple("System").field(name).finish(),
            ImageAsset::Bundled(path) => f.debug_tuple("Bundled").field(path).finish(),
            ImageAsset::Data(bytes) => write!(f, "Data({} bytes)", bytes.len()),
        }
    }
}

/// Configuration for the chat widget SDK.
///
/// Holds everything a chat surface needs: the credentials and endpoints
/// injected into the page and the header resources. Construct with
/// [`ChatwootConfig::builder`].
#[derive(Clone, PartialEq)]
pub struct ChatwootConfig {
    /// Numeric account identifier
    pub account_id: i64,

    /// Base URL of the API (no trailing path)
    pub api_host: String,

    /// User access token, sent as `api_access_token`
    pub access_token: String,

    /// Token for the realtime pub/sub channel
    pub pubsub_token: String,

    /// Websocket endpoint used by the widget
    pub websocket_url: String,

    /// Inbox label displayed in the header
    pub inbox_name: String,

    /// Header font size in points
    pub font_size: f64,

    /// Hide the message editor inside the widget
    pub disable_editor: bool,

    /// Hide the attachment button inside the editor
    pub editor_disable_upload: bool,

    pub back_arrow_icon: ImageAsset,
    pub connected_icon: ImageAsset,
    pub disconnected_icon: ImageAsset,
}

impl fmt::Debug for ChatwootConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatwootConfig")
            .field("account_id", &self.account_id)
            .field("api_host", &self.api_host)
            .field("access_token", &"[REDACTED]")
            .field("pubsub_token", &"[REDACTED]")
            .field("websocket_url", &self.websocket_url)
            .field("inbox_name", &self.inbox_name)
            .field("font_size", &self.font_size)
            .field("disable_editor", &self.disable_editor)
            .field("editor_disable_upload", &self.editor_disable_upload)
            .field("back_arrow_icon", &self.back_arrow_icon)
            .field("connected_icon", &self.connected_icon)
            .field("disconnected_icon", &self.disconnected_icon)
            .finish()
    }
}

impl ChatwootConfig {
    /// Creates a new builder for constructing a `ChatwootConfig`.
    pub fn builder() -> ChatwootConfigBuilder {
        ChatwootConfigBuilder::default()
    }

    /// Creates a configuration from the five required values, with defaults
    /// for everything else.
    pub fn new(
        account_id: i64,
        api_host: impl Into<String>,
        access_token: impl Into<String>,
        pubsub_token: impl Into<String>,
        websocket_url: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            api_host: api_host.into(),
            access_token: access_token.into(),
            pubsub_token: pubsub_token.into(),
            websocket_url: websocket_url.into(),
            inbox_name: DEFAULT_INBOX_NAME.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            disable_editor: false,
            editor_disable_upload: false,
            back_arrow_icon: ImageAsset::default_back_arrow(),
            connected_icon: ImageAsset::default_connected(),
            disconnected_icon: ImageAsset::default_disconnected(),
        }
    }
}

/// Builder for constructing [`ChatwootConfig`] instances.
#[derive(Default)]
pub struct ChatwootConfigBuilder {
    account_id: Option<i64>,
    api_host: Option<String>,
    access_token: Option<String>,
    pubsub_token: Option<String>,
    websocket_url: Option<String>,
    inbox_name: Option<String>,
    font_size: Option<f64>,
    disable_editor: bool,
    editor_disable_upload: bool,
    back_arrow_icon: Option<ImageAsset>,
    connected_icon: Option<ImageAsset>,
    disconnected_icon: Option<ImageAsset>,
}

impl ChatwootConfigBuilder {
    pub fn account_id(mut self, id: i64) -> Self {
        self.account_id = Some(id);
        self
    }

    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn pubsub_token(mut self, token: impl Into<String>) -> Self {
        self.pubsub_token = Some(token.into());
        self
    }

    pub fn websocket_url(mut self, url: impl Into<String>) -> Self {
        self.websocket_url = Some(url.into());
        self
    }

    pub fn inbox_name(mut self, name: impl Into<String>) -> Self {
        self.inbox_name = Some(name.into());
        self
    }

    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn disable_editor(mut self, disabled: bool) -> Self {
        self.disable_editor = disabled;
        self
    }

    pub fn editor_disable_upload(mut self, disabled: bool) -> Self {
        self.editor_disable_upload = disabled;
        self
    }

    pub fn back_arrow_icon(mut self, icon: ImageAsset) -> Self {
        self.back_arrow_icon = Some(icon);
        self
    }

    pub fn connected_icon(mut self, icon: ImageAsset) -> Self {
        self.connected_icon = Some(icon);
        self
    }

    pub fn disconnected_icon(mut self, icon: ImageAsset) -> Self {
        self.disconnected_icon = Some(icon);
        self
    }

    /// Builds the final `ChatwootConfig` instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first required field that was not
    /// set. Values are not otherwise validated.
    pub fn build(self) -> Result<ChatwootConfig> {
        let account_id = self.account_id.ok_or_else(|| missing("Account id", "account_id"))?;
        let api_host = self.api_host.ok_or_else(|| missing("API host", "api_host"))?;
        let access_token = self
            .access_token
            .ok_or_else(|| missing("Access token", "access_token"))?;
        let pubsub_token = self
            .pubsub_token
            .ok_or_else(|| missing("Pubsub token", "pubsub_token"))?;
        let websocket_url = self
            .websocket_url
            .ok_or_else(|| missing("Websocket URL", "websocket_url"))?;

        Ok(ChatwootConfig {
            account_id,
            api_host,
            access_token,
            pubsub_token,
            websocket_url,
            inbox_name: self
                .inbox_name
                .unwrap_or_else(|| DEFAULT_INBOX_NAME.to_string()),
            font_size: self.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            disable_editor: self.disable_editor,
            editor_disable_upload: self.editor_disable_upload,
            back_arrow_icon: self
                .back_arrow_icon
                .unwrap_or_else(ImageAsset::default_back_arrow),
            connected_icon: self
                .connected_icon
                .unwrap_or_else(ImageAsset::default_connected),
            disconnected_icon: self
                .disconnected_icon
                .unwrap_or_else(ImageAsset::default_disconnected),
        })
    }
}

fn missing(label: &str, setter: &str) -> Error {
    Error::Config(format!(
        "{} is required. Use .{}() to set it.",
        label, setter
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> ChatwootConfigBuilder {
        ChatwootConfig::builder()
            .account_id(42)
            .api_host("https://chat.example.com")
            .access_token("access-secret")
            .pubsub_token("pubsub-secret")
            .websocket_url("wss://chat.example.com/cable")
    }

    #[test]
    fn test_builder_with_all_required_fields() {
        let config = complete_builder().build().unwrap();

        assert_eq!(config.account_id, 42);
        assert_eq!(config.api_host, "https://chat.example.com");
        assert_eq!(config.inbox_name, DEFAULT_INBOX_NAME);
        assert_eq!(config.font_size, DEFAULT_FONT_SIZE);
        assert!(!config.disable_editor);
        assert!(!config.editor_disable_upload);
        assert_eq!(config.connected_icon, ImageAsset::default_connected());
    }

    #[test]
    fn test_builder_optional_fields() {
        let config = complete_builder()
            .inbox_name("Billing")
            .font_size(18.0)
            .disable_editor(true)
            .editor_disable_upload(true)
            .back_arrow_icon(ImageAsset::Bundled(PathBuf::from("back.png")))
            .build()
            .unwrap();

        assert_eq!(config.inbox_name, "Billing");
        assert_eq!(config.font_size, 18.0);
        assert!(config.disable_editor);
        assert!(config.editor_disable_upload);
        assert_eq!(
            config.back_arrow_icon,
            ImageAsset::Bundled(PathBuf::from("back.png"))
        );
    }

    #[test]
    fn test_builder_requires_api_host() {
        let result = ChatwootConfig::builder().account_id(1).build();

        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("api_host")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_requires_tokens() {
        let result = ChatwootConfig::builder()
            .account_id(1)
            .api_host("https://chat.example.com")
            .build();

        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("access_token")),
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_builder_does_not_validate_values() {
        let config = ChatwootConfig::builder()
            .account_id(-1)
            .api_host("")
            .access_token("")
            .pubsub_token("")
            .websocket_url("")
            .build();

        assert!(config.is_ok());
    }

    #[test]
    fn test_new_matches_builder_defaults() {
        let from_new = ChatwootConfig::new(
            42,
            "https://chat.example.com",
            "access-secret",
            "pubsub-secret",
            "wss://chat.example.com/cable",
        );

        assert_eq!(from_new, complete_builder().build().unwrap());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let config = complete_builder()
            .back_arrow_icon(ImageAsset::Data(Bytes::from_static(b"png")))
            .build()
            .unwrap();
        let debug = format!("{:?}", config);

        assert!(!debug.contains("access-secret"));
        assert!(!debug.contains("pubsub-secret"));
        assert!(debug.contains("[REDACTED]"));
        assert!(debug.contains("Data(3 bytes)"));
    }
}
