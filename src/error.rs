//! Error types for the vault pipeline
//!
//! Construction-time failures are reported through [`VaultError`]. Generation
//! failures never surface here; the pipeline recovers from them locally.

use thiserror::Error;

/// Main error type for cache and pipeline construction
#[derive(Error, Debug)]
pub enum VaultError {
    /// Cache capacity must be a positive number of entries
    #[error("Invalid capacity: {capacity} (must be greater than 0)")]
    InvalidCapacity { capacity: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

impl From<String> for VaultError {
    fn from(s: String) -> Self {
        VaultError::Other(s)
    }
}

impl From<&str> for VaultError {
    fn from(s: &str) -> Self {
        VaultError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(e: serde_json::Error) -> Self {
        VaultError::SerializationError(e.to_string())
    }
}
