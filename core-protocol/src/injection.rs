//! Scripts that hand the SDK configuration to the web page.
//!
//! The page reads its settings from a handful of `window.__*__` globals and
//! from `window.chatwootConfig`, and listens for a `chatwootConfigLoaded`
//! event on `document`. Every value is embedded as a JSON literal, so tokens
//! and hosts containing quotes or backslashes cannot break out of the script.

use serde::{Deserialize, Serialize};

use core_runtime::config::ChatwootConfig;

use crate::error::Result;

/// Event dispatched on `document` once the configuration is in place.
pub const CONFIG_LOADED_EVENT: &str = "chatwootConfigLoaded";

/// Event the page listens for to tear itself down.
pub const CLOSE_EVENT: &str = "chatwootClose";

/// Global holding the whole configuration object.
pub const CONFIG_GLOBAL: &str = "chatwootConfig";

/// `(global name, PageConfig field)` pairs assigned by every injection.
pub const PAGE_GLOBALS: [(&str, &str); 7] = [
    ("__WOOT_ACCOUNT_ID__", "accountId"),
    ("__WOOT_API_HOST__", "apiHost"),
    ("__WOOT_ACCESS_TOKEN__", "accessToken"),
    ("__PUBSUB_TOKEN__", "pubsubToken"),
    ("__WEBSOCKET_URL__", "websocketUrl"),
    ("__DISABLE_EDITOR__", "disableEditor"),
    ("__EDITOR_DISABLE_UPLOAD__", "editorDisableUpload"),
];

/// Assigned only when a conversation id is known.
pub const CONVERSATION_GLOBAL: &str = "__WOOT_CONVERSATION_ID__";

/// The object the page receives as `window.chatwootConfig`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub account_id: i64,
    pub api_host: String,
    pub access_token: String,
    pub pubsub_token: String,
    pub websocket_url: String,
    pub disable_editor: bool,
    pub editor_disable_upload: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
}

impl PageConfig {
    pub fn new(config: &ChatwootConfig, conversation_id: Option<i64>) -> Self {
        Self {
            account_id: config.account_id,
            api_host: config.api_host.clone(),
            access_token: config.access_token.clone(),
            pubsub_token: config.pubsub_token.clone(),
            websocket_url: config.websocket_url.clone(),
            disable_editor: config.disable_editor,
            editor_disable_upload: config.editor_disable_upload,
            conversation_id,
        }
    }

    /// JSON text safe to paste into a script as an expression.
    pub fn to_js_literal(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        // Line and paragraph separators are valid in JSON strings but end
        // the statement in pre-ES2019 engines.
        Ok(json
            .replace('\u{2028}', "\\u2028")
            .replace('\u{2029}', "\\u2029"))
    }
}

impl std::fmt::Display for PageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print tokens
        write!(
            f,
            "account {} at {} (conversation {:?})",
            self.account_id, self.api_host, self.conversation_id
        )
    }
}

fn assignments(config: &PageConfig) -> String {
    let mut body = String::new();
    for (global, field) in PAGE_GLOBALS {
        body.push_str(&format!("  window.{} = config.{};\n", global, field));
    }
    if config.conversation_id.is_some() {
        body.push_str(&format!(
            "  window.{} = config.conversationId;\n",
            CONVERSATION_GLOBAL
        ));
    }
    body.push_str(&format!("  window.{} = config;\n", CONFIG_GLOBAL));
    body.push_str(&format!(
        "  document.dispatchEvent(new CustomEvent('{}', {{ detail: config }}));\n",
        CONFIG_LOADED_EVENT
    ));
    body
}

/// Script evaluated as soon as the page finishes loading.
///
/// Wrapped in a function scope so it can be evaluated again without
/// redeclaring bindings.
pub fn initial_injection_script(config: &PageConfig) -> Result<String> {
    Ok(format!(
        "(function () {{\n  const config = {};\n{}}})();",
        config.to_js_literal()?,
        assignments(config)
    ))
}

/// Script for the delayed second injection.
///
/// Produces the same page state as [`initial_injection_script`], but any
/// exception is caught and reported, and the script evaluates to `true` on
/// success and `false` on failure.
pub fn retry_injection_script(config: &PageConfig) -> Result<String> {
    Ok(format!(
        "(function () {{\n  try {{\n  const config = {};\n{}  return true;\n  }} catch (error) {{\n    console.error('Error injecting Chatwoot config:', error);\n    return false;\n  }}\n}})();",
        config.to_js_literal()?,
        assignments(config)
    ))
}

/// Script asking the page to tear itself down.
pub fn close_request_script() -> String {
    format!("document.dispatchEvent(new Event('{}'));", CLOSE_EVENT)
}
