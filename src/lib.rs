//! Chatwoot chat widget SDK.
//!
//! Embeds the Chatwoot web chat widget in a host application: a native
//! header above a web view running the bundled widget, configured through
//! injected page globals.
//!
//! This crate re-exports the host-facing API from `core-service`. Enable
//! the `desktop-shims` feature (on by default) for ready-made desktop
//! adapters via [`SdkDependencies::desktop`].
//!
//! ```ignore
//! use chatwoot_sdk::{ChatwootConfig, ChatwootSdk, SdkDependencies};
//!
//! let config = ChatwootConfig::builder()
//!     .account_id(1)
//!     .api_host("https://app.chatwoot.com")
//!     .access_token(access_token)
//!     .pubsub_token(pubsub_token)
//!     .websocket_url("wss://app.chatwoot.com/cable")
//!     .build()?;
//!
//! let sdk = ChatwootSdk::new(config, SdkDependencies::desktop("./widget")?);
//! sdk.present_chat(&presenter, None, true, None);
//! ```

pub use core_service::*;
