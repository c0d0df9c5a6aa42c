use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::constants::DEFAULT_MAX_BATCH;
use crate::embedding::{
    CodeBertConfig, CodeBertEncoder, CodeEmbedder, EmbeddingError, EncoderStatus, device_label,
    select_device,
};
use crate::gateway::error::GatewayError;
use crate::similarity::SimilarityEngine;

/// Shared per-process state handed to every handler.
///
/// `engine` is `None` when the encoder failed to load; health checks still
/// answer from `status`.
#[derive(Clone)]
pub struct HandlerState {
    pub engine: Option<Arc<SimilarityEngine>>,

    pub status: Arc<EncoderStatus>,

    pub max_batch: usize,
}

impl HandlerState {
    pub fn new(embedder: CodeEmbedder, model_name: impl Into<String>, max_batch: usize) -> Self {
        let status = EncoderStatus::ready(model_name, &embedder);
        Self {
            engine: Some(Arc::new(SimilarityEngine::new(embedder))),
            status: Arc::new(status),
            max_batch,
        }
    }

    /// State for a process whose encoder failed to load.
    pub fn unavailable(status: EncoderStatus, max_batch: usize) -> Self {
        Self {
            engine: None,
            status: Arc::new(status),
            max_batch,
        }
    }

    /// Stub-backed state with default limits.
    pub fn stub() -> Self {
        Self::new(
            CodeEmbedder::stub(),
            crate::constants::DEFAULT_MODEL_NAME,
            DEFAULT_MAX_BATCH,
        )
    }

    /// Loads the encoder described by `config`.
    ///
    /// A load failure is logged and recorded in `status`; the returned state
    /// still serves health checks.
    pub fn from_config(config: &Config) -> Self {
        if config.stub_encoder {
            warn!("CODESIM_STUB_ENCODER set, serving deterministic stub embeddings");
            return Self::new(CodeEmbedder::stub(), config.model_name.clone(), config.max_batch);
        }

        let device = match select_device() {
            Ok(device) => device,
            Err(e) => {
                error!(error = %e, "No usable compute device");
                let status = EncoderStatus::unavailable(config.model_name.clone(), "none");
                return Self::unavailable(status, config.max_batch);
            }
        };
        let label = device_label(&device);

        let loaded = match &config.model_path {
            Some(path) => CodeBertEncoder::load_on(CodeBertConfig::new(path.clone()), device),
            None => Err(EmbeddingError::ModelNotFound {
                path: PathBuf::from("<unset CODESIM_MODEL_PATH>"),
            }),
        };

        match loaded {
            Ok(encoder) => {
                let embedder = CodeEmbedder::new(Arc::new(encoder));
                info!(
                    model = %config.model_name,
                    device = %label,
                    dim = embedder.embedding_dim(),
                    "Encoder ready"
                );
                Self::new(embedder, config.model_name.clone(), config.max_batch)
            }
            Err(e) => {
                error!(model = %config.model_name, error = %e, "Encoder failed to load");
                let status = EncoderStatus::unavailable(config.model_name.clone(), label);
                Self::unavailable(status, config.max_batch)
            }
        }
    }

    pub fn with_max_batch(mut self, max_batch: usize) -> Self {
        self.max_batch = max_batch;
        self
    }

    pub(crate) fn engine(&self) -> Result<Arc<SimilarityEngine>, GatewayError> {
        self.engine.clone().ok_or_else(|| {
            GatewayError::ModelUnavailable(format!("encoder '{}' is not loaded", self.status.model))
        })
    }
}
