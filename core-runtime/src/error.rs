use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid hex color: {0}")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, Error>;
