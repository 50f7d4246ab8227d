//! Error types for backend fetches.

use thiserror::Error;

/// Backend error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The user does not exist upstream.
    #[error("user '{0}' not found")]
    NotFound(String),

    /// Network failure, unexpected status, or a page that could not be parsed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The HTTP client could not be built.
    #[error("client setup failed: {0}")]
    Client(String),
}

impl BackendError {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
