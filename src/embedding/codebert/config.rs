use std::path::PathBuf;

use crate::constants::DEFAULT_MAX_SEQ_LEN;
use crate::embedding::error::EmbeddingError;

/// Configuration for [`CodeBertEncoder`](super::CodeBertEncoder).
#[derive(Debug, Clone)]
pub struct CodeBertConfig {
    /// Directory with `config.json`, `model.safetensors` and `tokenizer.json`.
    pub model_dir: PathBuf,
    /// Max tokens passed to the model (truncation limit).
    pub max_seq_len: usize,
}

impl Default for CodeBertConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::new(),
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
        }
    }
}

impl CodeBertConfig {
    pub const CONFIG_FILE: &'static str = "config.json";
    pub const WEIGHTS_FILE: &'static str = "model.safetensors";
    pub const TOKENIZER_FILE: &'static str = "tokenizer.json";

    /// Creates a config for a model directory.
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Overrides the truncation limit.
    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    /// Validates required fields and that the model directory exists.
    pub fn validate(&self) -> Result<(), EmbeddingError> {
        if self.max_seq_len == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "max_seq_len must be greater than zero".to_string(),
            });
        }

        if self.model_dir.as_os_str().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "model_dir is required".to_string(),
            });
        }

        if !self.model_dir.is_dir() {
            return Err(EmbeddingError::ModelNotFound {
                path: self.model_dir.clone(),
            });
        }

        Ok(())
    }

    /// Returns `true` if both `config.json` and `model.safetensors` exist.
    pub fn model_available(&self) -> bool {
        self.model_dir.join(Self::CONFIG_FILE).is_file()
            && self.model_dir.join(Self::WEIGHTS_FILE).is_file()
    }

    /// Returns `true` if `tokenizer.json` exists.
    pub fn tokenizer_available(&self) -> bool {
        self.model_dir.join(Self::TOKENIZER_FILE).is_file()
    }
}
