//! HTTP API for the lbcache proxy.
//!
//! Serves four read-only views of a Letterboxd user, each through the
//! freshness cache:
//!
//! - `GET /user/{username}`: profile attributes
//! - `GET /user/{username}/following`
//! - `GET /user/{username}/followers`
//! - `GET /user/{username}/films`: watched films as `[title, slug]` pairs
//!
//! Any failure answers 404 with `{"detail": "Could not fetch <view>: <cause>"}`.
//! `GET /health` and the OpenAPI document (Swagger UI at `/docs`) are
//! served alongside.
//!
//! # Example
//!
//! ```ignore
//! use lbcache_server::{Server, ServerConfig};
//!
//! let cache = FreshnessCache::new(store, CacheConfig::default());
//! let backend: SharedBackend = Arc::new(LetterboxdBackend::new(LetterboxdConfig::default())?);
//! let config = ServerConfig::new().with_bind_address("127.0.0.1:6996".parse()?);
//!
//! Server::new(cache, backend, config).run().await?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod state;

pub use config::{DEFAULT_PORT, ServerConfig};
pub use error::{ErrorResponse, Result, ServerError};
pub use logging::request_logging_middleware;
pub use state::AppState;

use axum::{Router, middleware};
use lbcache_backend::SharedBackend;
use lbcache_cache::FreshnessCache;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The lbcache HTTP server.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server over a cache and a backend.
    pub fn new(cache: FreshnessCache, backend: SharedBackend, config: ServerConfig) -> Self {
        Self {
            state: AppState::new(cache, backend, config),
        }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(routes::health_routes())
            .merge(routes::user_routes())
            .merge(routes::swagger_ui())
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                logging::request_logging_middleware,
            ))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the server on the configured address.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Internal(format!("Failed to bind {addr}: {e}")))?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let router = self.router();

        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "Starting server");
        }

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::Internal(format!("Server error: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use lbcache_backend::{Film, MockBackend, MockUser, View};
    use lbcache_cache::{CacheConfig, CacheEntry};
    use lbcache_store::{KvStore, MemoryStore};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    struct Harness {
        store: MemoryStore,
        backend: Arc<MockBackend>,
        router: Router,
    }

    fn harness_with_window(window: Duration) -> Harness {
        let store = MemoryStore::new();
        let backend = Arc::new(
            MockBackend::new().with_user(
                MockUser::new("alice")
                    .with_attr("display_name", "Alice")
                    .with_following(&["bob", "carol"])
                    .with_followers(&["dave"])
                    .with_films(&[("Heat", "heat-1995"), ("Alien", "alien")]),
            ),
        );
        let cache = FreshnessCache::new(
            Arc::new(store.clone()),
            CacheConfig::new().with_refresh_window(window),
        );
        let server = Server::new(
            cache,
            backend.clone(),
            ServerConfig::new().with_request_logging(false),
        );

        Harness {
            store,
            backend,
            router: server.router(),
        }
    }

    fn harness() -> Harness {
        harness_with_window(Duration::from_secs(300))
    }

    async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_profile_route() {
        let h = harness();
        let (status, body) = get(&h.router, "/user/alice").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"username": "alice", "display_name": "Alice"}));
        assert!(h.store.contains("lb:profile:alice").await);
    }

    #[tokio::test]
    async fn test_list_routes_wrap_payload() {
        let h = harness();

        let (status, body) = get(&h.router, "/user/alice/following").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"following": ["bob", "carol"]}));

        let (_, body) = get(&h.router, "/user/alice/followers").await;
        assert_eq!(body, json!({"followers": ["dave"]}));

        let (_, body) = get(&h.router, "/user/alice/films").await;
        assert_eq!(
            body,
            json!({"films": [["Heat", "heat-1995"], ["Alien", "alien"]]})
        );

        for key in ["lb:following:alice", "lb:followers:alice", "lb:films:alice"] {
            assert!(h.store.contains(key).await, "missing {key}");
        }
    }

    #[tokio::test]
    async fn test_second_request_served_from_cache() {
        let h = harness();

        get(&h.router, "/user/alice/films").await;
        get(&h.router, "/user/alice/films").await;

        assert_eq!(h.backend.calls(View::WatchedFilms), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refreshed() {
        let h = harness();
        let old = CacheEntry::new(vec![Film::new("Old", "old")], 1.0);
        h.store
            .set("lb:films:alice", old.encode().unwrap())
            .await
            .unwrap();

        let (_, body) = get(&h.router, "/user/alice/films").await;
        assert_eq!(
            body,
            json!({"films": [["Heat", "heat-1995"], ["Alien", "alien"]]})
        );
        assert_eq!(h.backend.calls(View::WatchedFilms), 1);
    }

    #[tokio::test]
    async fn test_zero_window_always_fetches() {
        let h = harness_with_window(Duration::ZERO);

        get(&h.router, "/user/alice/following").await;
        get(&h.router, "/user/alice/following").await;

        assert_eq!(h.backend.calls(View::Following), 2);
    }

    #[tokio::test]
    async fn test_unknown_user_is_404_and_not_cached() {
        let h = harness();

        let (status, body) = get(&h.router, "/user/ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"detail": "Could not fetch user: user 'ghost' not found"})
        );

        let (status, body) = get(&h.router, "/user/ghost/films").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["detail"],
            json!("Could not fetch watched films: user 'ghost' not found")
        );

        assert!(h.store.is_empty().await);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_404_and_keeps_stale_entry() {
        let h = harness();
        let old = CacheEntry::new(vec!["zed".to_string()], 1.0);
        let bytes = old.encode().unwrap();
        h.store.set("lb:followers:alice", bytes.clone()).await.unwrap();

        h.backend.set_failure(Some("connection reset"));
        let (status, body) = get(&h.router, "/user/alice/followers").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"detail": "Could not fetch followers: upstream error: connection reset"})
        );
        assert_eq!(h.store.raw("lb:followers:alice").await, Some(bytes));
    }

    #[tokio::test]
    async fn test_usernames_are_case_sensitive() {
        let h = harness();
        let (status, _) = get(&h.router, "/user/Alice").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health_and_openapi() {
        let h = harness();

        let (status, body) = get(&h.router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
        assert_eq!(body["backend"], "mock");

        let (status, body) = get(&h.router, routes::openapi::OPENAPI_PATH).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "LetterboxdPY Wrapper");
        assert_eq!(h.backend.total_calls(), 0);
    }

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::new()
            .with_bind_address("127.0.0.1:9000".parse().unwrap())
            .with_request_logging(false);

        assert_eq!(config.bind_address.port(), 9000);
        assert!(!config.request_logging);
        assert_eq!(ServerConfig::default().bind_address.port(), DEFAULT_PORT);
    }
}
