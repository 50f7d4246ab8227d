//! Liveness endpoint.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Liveness report.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok` when the process answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Which store backs the cache (`redis` or `memory`).
    pub store: String,
    /// Which backend refreshes stale views.
    pub backend: String,
    /// Refresh window applied to every view, in seconds.
    pub refresh_window_secs: u64,
}

/// Report liveness and how the cache is wired. Sends nothing to the store
/// or the backend.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: state.cache.store().name().to_string(),
        backend: state.backend.name().to_string(),
        refresh_window_secs: state.cache.refresh_window().as_secs(),
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
