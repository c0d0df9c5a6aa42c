use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::embedding::encoder::TokenEncoder;
use crate::embedding::error::EmbeddingError;
use crate::embedding::pooling::pool;
use crate::embedding::sanitize::sanitize;
use crate::embedding::stub::StubEncoder;
use crate::embedding::types::Embedding;

/// Sanitize, encode, pool: text in, normalized [`Embedding`] out.
#[derive(Clone)]
pub struct CodeEmbedder {
    encoder: Arc<dyn TokenEncoder>,
}

impl std::fmt::Debug for CodeEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeEmbedder")
            .field("device", &self.encoder.device_label())
            .field("embedding_dim", &self.encoder.hidden_size())
            .field("stub", &self.encoder.is_stub())
            .finish()
    }
}

impl CodeEmbedder {
    /// Wraps an already-loaded encoder.
    pub fn new(encoder: Arc<dyn TokenEncoder>) -> Self {
        Self { encoder }
    }

    /// Deterministic embedder backed by [`StubEncoder`] (no model files).
    pub fn stub() -> Self {
        warn!("Embedder running in STUB mode (testing only)");
        Self::new(Arc::new(StubEncoder::default()))
    }

    /// Embeds a single snippet.
    pub fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let sanitized = sanitize(text);
        let output = self.encoder.encode(&sanitized)?;
        let embedding = pool(&output.hidden_states, &output.attention_mask)?;

        debug!(
            text_len = text.len(),
            sanitized_len = sanitized.len(),
            token_count = output.seq_len(),
            degenerate = embedding.is_degenerate(),
            "Embedded snippet"
        );

        Ok(embedding)
    }

    /// Embeds every snippet once, in order; the first failure aborts the batch.
    pub fn embed_all<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<Embedding>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text.as_ref())).collect()
    }

    /// Embedding dimension (the encoder's hidden size).
    pub fn embedding_dim(&self) -> usize {
        self.encoder.hidden_size()
    }

    /// Returns `true` if running on a stub encoder.
    pub fn is_stub(&self) -> bool {
        self.encoder.is_stub()
    }

    /// Short device name (`cpu`, `cuda:0`, ...).
    pub fn device_label(&self) -> String {
        self.encoder.device_label()
    }
}

/// Read-only initialization state reported by health checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncoderStatus {
    /// `true` when an encoder loaded and requests can be served.
    pub ok: bool,
    /// Configured model name.
    pub model: String,
    /// Compute device selected at startup.
    pub device: String,
}

impl EncoderStatus {
    /// Status for a successfully loaded embedder.
    pub fn ready(model: impl Into<String>, embedder: &CodeEmbedder) -> Self {
        Self {
            ok: true,
            model: model.into(),
            device: embedder.device_label(),
        }
    }

    /// Status after a failed load.
    pub fn unavailable(model: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            ok: false,
            model: model.into(),
            device: device.into(),
        }
    }
}
