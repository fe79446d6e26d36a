use thiserror::Error;

/// Why the profile (or the avatar behind it) could not be loaded.
///
/// None of these reach the user: the surface falls back to the default name
/// or to the initials badge.
#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Transport(#[from] bridge_traits::error::BridgeError),

    #[error("Unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("Response body was empty")]
    EmptyBody,

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Expected a JSON object")]
    NotAnObject,

    #[error("Image decoding failed: {0}")]
    ImageDecode(String),
}

pub type Result<T> = std::result::Result<T, ProfileError>;
