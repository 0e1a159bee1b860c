//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test gateway servers.
//! Each test gets an isolated gateway with its own data directory and its
//! own stub analysis backend.

use super::constants::*;
use super::stub_backend::StubBackend;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tonalogy_gateway::config::{HISTORY_STORAGE_KEY, SETTINGS_STORAGE_KEY};
use tonalogy_gateway::server::server::make_app;
use tonalogy_gateway::server::{RequestsLoggingLevel, ServerConfig};
use tonalogy_gateway::store::Settings;
use tonalogy_gateway::{AnalysisBackend, BackendClient, JsonHistoryStore, JsonSettingsStore};

/// Test gateway instance with an isolated data dir and stub backend.
///
/// When dropped, the server gracefully shuts down and temp resources are
/// cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the gateway is listening on
    pub port: u16,

    /// The scriptable stand-in for the external analysis service
    pub stub: StubBackend,

    /// Where this gateway persists its stores
    pub data_dir: PathBuf,

    // Private fields - keep resources alive until drop
    _temp_data_dir: Option<TempDir>,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test gateway on a random port with a fresh data dir.
    pub async fn spawn() -> Self {
        let temp_data_dir = TempDir::new().expect("Failed to create data dir");
        let data_dir = temp_data_dir.path().to_path_buf();
        Self::spawn_inner(data_dir, Some(temp_data_dir)).await
    }

    /// Spawns a gateway over an existing data dir.
    ///
    /// Use this to simulate a restart: drop the first server, then spawn a
    /// second one over the same directory and check what persisted.
    pub async fn spawn_in(data_dir: &Path) -> Self {
        Self::spawn_inner(data_dir.to_path_buf(), None).await
    }

    async fn spawn_inner(data_dir: PathBuf, temp_data_dir: Option<TempDir>) -> Self {
        let stub = StubBackend::spawn().await;

        let backend: Arc<dyn AnalysisBackend> =
            Arc::new(BackendClient::new(stub.base_url.clone(), 5));

        let history = Arc::new(
            JsonHistoryStore::open(&data_dir.join(HISTORY_STORAGE_KEY))
                .expect("Failed to open history store"),
        );
        let settings = Arc::new(
            JsonSettingsStore::open(
                &data_dir.join(SETTINGS_STORAGE_KEY),
                Settings::defaults(&stub.base_url),
            )
            .expect("Failed to open settings store"),
        );

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener.local_addr().expect("Failed to get local address").port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            frontend_dir_path: None,
        };

        let app = make_app(config, backend, history, settings).expect("Failed to build app");

        // Spawn server in background task with graceful shutdown
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .expect("Server failed");
        });

        let server = Self {
            base_url,
            port,
            stub,
            data_dir,
            _temp_data_dir: temp_data_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => {
                    return;
                }
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Send shutdown signal
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
        // TempDir is cleaned up automatically
    }
}
