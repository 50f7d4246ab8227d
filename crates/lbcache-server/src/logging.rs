//! Per-request access log.

use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};

use crate::state::AppState;

/// Route template for a request, or `unmatched` when no route applied.
pub(crate) fn route_of(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string())
}

/// Log one line per request, keyed by route template so the log groups by
/// view rather than by username. The username goes in its own field.
///
/// Every view failure is a 404, so 4xx logs at `warn`, everything else at
/// `info`.
pub async fn request_logging_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.config.request_logging {
        return next.run(request).await;
    }

    let route = route_of(&request);
    let username = username_of(request.uri().path()).to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if response.status().is_client_error() || response.status().is_server_error() {
        warn!(%route, %username, status, elapsed_ms, "request failed");
    } else {
        info!(%route, %username, status, elapsed_ms, "request served");
    }

    response
}

/// `/user/alice/films` → `alice`; empty for non-user paths.
fn username_of(path: &str) -> &str {
    path.strip_prefix("/user/")
        .and_then(|rest| rest.split('/').next())
        .unwrap_or("")
}
