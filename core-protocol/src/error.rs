use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed payload on channel '{channel}': {message}")]
    InvalidPayload { channel: String, message: String },

    #[error("Failed to serialize page configuration: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProtocolError>;
