//! Error types for the coworking directory

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoworkError {
    // Lookup errors
    #[error("Space not found: {id}")]
    SpaceNotFound { id: i64 },

    #[error("Blog post not found: {slug}")]
    PostNotFound { slug: String },

    // Request shaping errors
    #[error("Invalid query parameter {key}: {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error("Invalid space id: {0}")]
    InvalidSpaceId(String),

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CoworkError {
    pub fn invalid_parameter(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { key: key.into(), reason: reason.into() }
    }

    /// True for errors caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. } | Self::InvalidSpaceId(_))
    }
}

pub type Result<T> = std::result::Result<T, CoworkError>;
