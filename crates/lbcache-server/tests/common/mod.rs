//! Common test utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use lbcache_backend::{MockBackend, MockUser};
use lbcache_cache::{CacheConfig, FreshnessCache};
use lbcache_server::{Server, ServerConfig};
use lbcache_store::MemoryStore;

/// A test server that runs in the background.
pub struct TestServer {
    /// The server's address.
    pub addr: SocketAddr,
    /// HTTP client for this server.
    pub client: Client,
    /// The store behind the cache.
    pub store: MemoryStore,
    /// The backend behind the cache.
    pub backend: Arc<MockBackend>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with one known user, `alice`.
    pub async fn start() -> Result<Self> {
        Self::start_with(default_backend(), Duration::from_secs(300)).await
    }

    /// Start a server over `backend` with the given refresh window.
    pub async fn start_with(backend: MockBackend, window: Duration) -> Result<Self> {
        let store = MemoryStore::new();
        let backend = Arc::new(backend);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let cache = FreshnessCache::new(
            Arc::new(store.clone()),
            CacheConfig::new().with_refresh_window(window),
        );
        let config = ServerConfig::new()
            .with_bind_address(addr)
            .with_request_logging(false);
        let server = Server::new(cache, backend.clone(), config);

        let handle = tokio::spawn(async move {
            let _ = server.serve(listener).await;
        });

        let client = Client::new();
        wait_for_server(&client, addr).await?;

        Ok(Self {
            addr,
            client,
            store,
            backend,
            _handle: handle,
        })
    }

    /// Get the base URL for the server.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get a request builder for `path`.
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(format!("{}{}", self.base_url(), path))
    }
}

/// A backend that knows `alice`.
pub fn default_backend() -> MockBackend {
    MockBackend::new().with_user(
        MockUser::new("alice")
            .with_attr("display_name", "Alice")
            .with_attr("bio", "Mostly horror.")
            .with_following(&["bob"])
            .with_followers(&["carol", "dave"])
            .with_films(&[("The Thing", "the-thing")]),
    )
}

/// Wait for the server to become ready.
async fn wait_for_server(client: &Client, addr: SocketAddr) -> Result<()> {
    let url = format!("http://{}/health", addr);

    let result = timeout(Duration::from_secs(5), async {
        loop {
            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => return,
                _ => tokio::time::sleep(Duration::from_millis(50)).await,
            }
        }
    })
    .await;

    match result {
        Ok(()) => Ok(()),
        Err(_) => anyhow::bail!("Timeout waiting for server to start"),
    }
}
