//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lbcache_backend::{BackendError, View};
use lbcache_cache::CacheError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A view could not be produced, for any reason.
    #[error("Could not fetch {label}: {cause}")]
    Unavailable { label: &'static str, cause: String },

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Wrap a cache failure for `view`.
    ///
    /// Upstream, not-found and store failures all become [`ServerError::Unavailable`].
    pub fn unavailable(view: View, err: CacheError<BackendError>) -> Self {
        ServerError::Unavailable {
            label: view.label(),
            cause: err.to_string(),
        }
    }
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub detail: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::Unavailable { .. } => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let detail = self.to_string();

        match &self {
            ServerError::Internal(_) => {
                tracing::error!(status = %status, error = %detail, "Server error");
            }
            ServerError::Unavailable { .. } => {
                tracing::warn!(status = %status, error = %detail, "View unavailable");
            }
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
