use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The controller has shut down (closed, destroyed or every handle dropped).
    #[error("Chat surface {0} is no longer running")]
    Closed(String),

    #[error("No async runtime available to drive the chat surface")]
    NoRuntime,
}

pub type Result<T> = std::result::Result<T, SurfaceError>;
