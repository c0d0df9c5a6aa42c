//! CodeBERT encoder (safetensors + tokenizer).
//!
//! Use [`StubEncoder`](crate::embedding::StubEncoder) for tests without model files.

/// CodeBERT configuration.
pub mod config;


pub use config::CodeBertConfig;

use candle_core::{DType, Device, Tensor};
use parking_lot::Mutex;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info};

use crate::embedding::encoder::{EncoderOutput, TokenEncoder};
use crate::embedding::error::EmbeddingError;
use crate::embedding::roberta::RobertaEncoderModel;

/// Pretrained CodeBERT behind the [`TokenEncoder`] seam.
///
/// Forward passes are single-flight: the model sits behind a mutex so at most
/// one inference touches the backend's buffers at a time. Tokenization runs
/// outside the lock.
pub struct CodeBertEncoder {
    model: Mutex<RobertaEncoderModel>,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
    config: CodeBertConfig,
}

impl std::fmt::Debug for CodeBertEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodeBertEncoder")
            .field("device", &format!("{:?}", self.device))
            .field("hidden_size", &self.hidden_size)
            .field("max_seq_len", &self.config.max_seq_len)
            .finish()
    }
}

impl CodeBertEncoder {
    /// Loads the encoder on an explicit device.
    pub fn load_on(config: CodeBertConfig, device: Device) -> Result<Self, EmbeddingError> {
        config.validate()?;
        debug!(?device, "Selected compute device for CodeBERT");

        if !config.model_available() {
            return Err(EmbeddingError::ModelLoadFailed {
                reason: format!(
                    "Missing {} or {} in {}",
                    CodeBertConfig::CONFIG_FILE,
                    CodeBertConfig::WEIGHTS_FILE,
                    config.model_dir.display()
                ),
            });
        }

        if !config.tokenizer_available() {
            return Err(EmbeddingError::TokenizationFailed {
                reason: format!(
                    "Missing {} in {}",
                    CodeBertConfig::TOKENIZER_FILE,
                    config.model_dir.display()
                ),
            });
        }

        let tokenizer = load_tokenizer(&config)?;

        let model = RobertaEncoderModel::load(&config.model_dir, &device).map_err(|e| {
            EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to load CodeBERT weights: {}", e),
            }
        })?;
        let hidden_size = model.hidden_size();

        info!(
            model_dir = %config.model_dir.display(),
            hidden_size,
            max_seq_len = config.max_seq_len,
            "CodeBERT encoder loaded"
        );

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            device,
            hidden_size,
            config,
        })
    }

    fn row_tensor(&self, values: &[u32]) -> Result<Tensor, EmbeddingError> {
        Ok(Tensor::new(values, &self.device)?.unsqueeze(0)?)
    }
}

/// Loads `tokenizer.json` with truncation at `max_seq_len` (special tokens included).
fn load_tokenizer(config: &CodeBertConfig) -> Result<Tokenizer, EmbeddingError> {
    let path = config.model_dir.join(CodeBertConfig::TOKENIZER_FILE);
    let mut tokenizer =
        Tokenizer::from_file(&path).map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("Failed to load tokenizer: {}", e),
        })?;

    let truncation = TruncationParams {
        max_length: config.max_seq_len,
        ..Default::default()
    };
    tokenizer
        .with_truncation(Some(truncation))
        .map_err(|e| EmbeddingError::TokenizationFailed {
            reason: format!("Failed to configure truncation: {}", e),
        })?;

    Ok(tokenizer)
}

impl TokenEncoder for CodeBertEncoder {
    fn encode(&self, text: &str) -> Result<EncoderOutput, EmbeddingError> {
        let encoding =
            self.tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let ids = encoding.get_ids();
        if ids.is_empty() {
            // Single masked-out position; pooling turns this into a zero vector.
            debug!("Tokenizer produced no tokens");
            return Ok(EncoderOutput {
                hidden_states: Tensor::zeros((1, 1, self.hidden_size), DType::F32, &self.device)?,
                attention_mask: Tensor::zeros((1, 1), DType::U32, &self.device)?,
            });
        }

        debug!(
            text_len = text.len(),
            token_count = ids.len(),
            truncated = !encoding.get_overflowing().is_empty(),
            "Running CodeBERT forward pass"
        );

        let input_ids = self.row_tensor(ids)?;
        let token_type_ids = self.row_tensor(encoding.get_type_ids())?;
        let attention_mask = self.row_tensor(encoding.get_attention_mask())?;

        let hidden_states = self
            .model
            .lock()
            .forward(&input_ids, &token_type_ids, &attention_mask)
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("CodeBERT forward pass failed: {}", e),
            })?;

        Ok(EncoderOutput {
            hidden_states,
            attention_mask,
        })
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn device(&self) -> &Device {
        &self.device
    }
}
