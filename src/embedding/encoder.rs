//! The seam between the pooling pipeline and the pretrained model.

use candle_core::{Device, Tensor};

use crate::embedding::device::device_label;
use crate::embedding::error::EmbeddingError;

/// Per-token output of one encoder invocation.
#[derive(Debug, Clone)]
pub struct EncoderOutput {
    /// Last hidden state, shape `[1, T, H]`.
    pub hidden_states: Tensor,
    /// Attention mask, shape `[1, T]` (1 = real token, 0 = padding).
    pub attention_mask: Tensor,
}

impl EncoderOutput {
    /// Number of token positions `T` (real and padding).
    pub fn seq_len(&self) -> usize {
        self.attention_mask.dims().last().copied().unwrap_or(0)
    }
}

/// Text to hidden-state capability.
///
/// Implementations hold process-wide, read-only weights and must be safe to
/// call from concurrent requests; serialize internally if the backend is not
/// reentrant.
pub trait TokenEncoder: Send + Sync {
    /// Tokenizes (truncating to the encoder's max length) and runs a forward pass.
    fn encode(&self, text: &str) -> Result<EncoderOutput, EmbeddingError>;

    /// Hidden size `H` of the produced vectors.
    fn hidden_size(&self) -> usize;

    /// Device the encoder computes on.
    fn device(&self) -> &Device;

    /// Returns `true` for deterministic stand-ins that load no weights.
    fn is_stub(&self) -> bool {
        false
    }

    /// Short device name for health reporting.
    fn device_label(&self) -> String {
        device_label(self.device())
    }
}
