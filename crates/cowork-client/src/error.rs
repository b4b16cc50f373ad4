//! Client error types

use thiserror::Error;

/// Errors surfaced by directory API calls.
///
/// Messages are kept as strings so results carrying an error can be cloned
/// into every subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Server responded with {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Transport failures and server-side errors may succeed on retry;
    /// client errors (4xx, including 404) never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500,
            Self::NotFound { .. } | Self::Decode(_) | Self::InvalidUrl(_) => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
