//! HTTP client helpers for tests.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, TestClientError> {
        let resp = self.client.post(self.url(path)).json(&body).send().await?;

        let status_header = resp
            .headers()
            .get("x-codesim-status")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        match resp.status().as_u16() {
            200 => Ok(resp.json().await?),
            400 | 422 => Err(TestClientError::BadRequest(resp.text().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, status_header, body))
            }
        }
    }

    pub async fn embed(&self, code: &str) -> Result<EmbedResponse, TestClientError> {
        self.post("/embed", serde_json::json!({ "code": code }))
            .await
    }

    pub async fn similarity(&self, a: &str, b: &str) -> Result<f32, TestClientError> {
        let resp: SimilarityResponse = self
            .post("/similarity", serde_json::json!({ "a": a, "b": b }))
            .await?;
        Ok(resp.cosine)
    }

    pub async fn batch_similarity(
        &self,
        snippets: &[&str],
    ) -> Result<Vec<Vec<f32>>, TestClientError> {
        let resp: BatchSimilarityResponse = self
            .post(
                "/batch-similarity",
                serde_json::json!({ "snippets": snippets }),
            )
            .await?;
        Ok(resp.matrix)
    }

    /// Returns the health body along with the HTTP status code.
    pub async fn health(&self) -> Result<(u16, HealthResponse), TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;
        let status = resp.status().as_u16();
        Ok((status, resp.json().await?))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub model: String,
    pub device: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbedResponse {
    pub dim: usize,
    pub vector: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimilarityResponse {
    pub cosine: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchSimilarityResponse {
    pub matrix: Vec<Vec<f32>>,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status: {0} ({1}) - Body: {2}")]
    UnexpectedStatus(u16, String, String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}
