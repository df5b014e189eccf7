//! Error types for View-Tally

use thiserror::Error;

/// Result type alias for View-Tally operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for View-Tally
#[derive(Error, Debug)]
pub enum Error {
    /// The resource is unknown to the backing store (deleted or never approved)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Backing store failures other than a missing resource
    #[error("Store error: {0}")]
    Store(String),

    /// Malformed or out-of-range public identifier
    #[error("Invalid public id: {0}")]
    InvalidId(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
