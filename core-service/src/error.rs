use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Chatwoot SDK is not configured: call setup() before creating a chat surface")]
    NotConfigured,

    #[error("Configuration error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Chat surface error: {0}")]
    Surface(#[from] core_surface::SurfaceError),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::error::BridgeError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
