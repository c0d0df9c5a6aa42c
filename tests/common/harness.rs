//! Test server harness.

use codesim::embedding::{CodeEmbedder, EncoderStatus};
use codesim::gateway::{HandlerState, create_router_with_state};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;
pub const TEST_MODEL_NAME: &str = "codesim/test-stub";

#[derive(Clone)]
pub struct TestServerConfig {
    pub port: u16,
    pub max_batch: usize,
    /// Encoder to serve with; `None` simulates a failed model load.
    pub embedder: Option<CodeEmbedder>,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            max_batch: 16,
            embedder: Some(CodeEmbedder::stub()),
        }
    }
}

impl TestServerConfig {
    pub fn with_embedder(mut self, embedder: CodeEmbedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn without_encoder(mut self) -> Self {
        self.embedder = None;
        self
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

/// Spawns a server on `127.0.0.1` backed by the configured encoder.
///
/// Port `0` binds an ephemeral port; read it back from [`TestServer::addr`].
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let state = match config.embedder {
        Some(embedder) => HandlerState::new(embedder, TEST_MODEL_NAME, config.max_batch),
        None => HandlerState::unavailable(
            EncoderStatus::unavailable(TEST_MODEL_NAME, "cpu"),
            config.max_batch,
        ),
    };

    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
    })
}
