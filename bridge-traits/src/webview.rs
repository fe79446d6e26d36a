//! Web Content View Abstraction
//!
//! The host owns the rendering engine (`WKWebView`, Android `WebView`, `wry`).
//! The SDK only needs two things from it: load an HTML string against a base
//! URL, and evaluate a script. Messages travelling the other way (page to
//! native) are delivered by the host to the chat surface handle.

use async_trait::async_trait;
use url::Url;

use crate::error::Result;

/// Value produced by a script evaluation, if the engine reported one.
pub type ScriptValue = Option<serde_json::Value>;

/// Engine settings a host applies when it creates the web view for a chat
/// surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebViewSettings {
    /// Play media inline instead of going full screen
    pub allows_inline_media_playback: bool,
    /// Require a user gesture before media plays
    pub media_requires_user_action: bool,
    pub javascript_enabled: bool,
    pub allows_back_forward_gestures: bool,
    pub allows_link_preview: bool,
    /// Expose the page to the platform web inspector
    pub inspectable: bool,
    /// Names of the script message handlers to register
    pub message_handlers: Vec<String>,
}

impl WebViewSettings {
    /// Default settings with the given message handler names.
    pub fn with_message_handlers<I, S>(handlers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            message_handlers: handlers.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

impl Default for WebViewSettings {
    fn default() -> Self {
        Self {
            allows_inline_media_playback: true,
            media_requires_user_action: false,
            javascript_enabled: true,
            allows_back_forward_gestures: true,
            allows_link_preview: true,
            inspectable: cfg!(debug_assertions),
            message_handlers: Vec::new(),
        }
    }
}

/// Web content view trait
///
/// Script evaluation is best effort: the SDK logs errors but never retries
/// and never blocks on the result.
#[async_trait]
pub trait WebView: Send + Sync {
    /// Load an HTML document, resolving relative assets against `base_url`.
    async fn load_html(&self, html: String, base_url: Option<Url>) -> Result<()>;

    /// Evaluate a script in the page's global scope.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::ScriptEvaluation`](crate::error::BridgeError::ScriptEvaluation)
    /// when the engine reports an exception or the view is gone.
    async fn evaluate_script(&self, script: String) -> Result<ScriptValue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = WebViewSettings::default();
        assert!(settings.allows_inline_media_playback);
        assert!(!settings.media_requires_user_action);
        assert!(settings.javascript_enabled);
        assert!(settings.message_handlers.is_empty());
    }

    #[test]
    fn test_settings_with_handlers() {
        let settings = WebViewSettings::with_message_handlers(["console", "close"]);
        assert_eq!(settings.message_handlers, vec!["console", "close"]);
        assert!(settings.javascript_enabled);
    }
}
