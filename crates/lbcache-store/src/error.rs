//! Error types for store operations.

/// Error type for key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store URL could not be parsed or names an unsupported scheme.
    #[error("Invalid store URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Could not establish a connection to the store.
    #[error("Store connection failed: {0}")]
    Connect(String),

    /// A GET or SET command failed.
    #[error("Store command {command} failed for '{key}': {reason}")]
    Command {
        command: &'static str,
        key: String,
        reason: String,
    },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
