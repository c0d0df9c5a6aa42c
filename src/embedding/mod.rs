//! Embedding pipeline: sanitize, encode, pool.
//!
//! - [`sanitize`] normalizes raw text.
//! - [`TokenEncoder`] is the model seam; [`CodeBertEncoder`] and [`StubEncoder`] implement it.
//! - [`pooling`] reduces hidden states to a unit vector.
//! - [`CodeEmbedder`] chains the three.

/// CodeBERT encoder (safetensors + tokenizer).
pub mod codebert;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod embedder;
/// Encoder trait and output type.
pub mod encoder;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
/// Mask-aware mean pooling and L2 normalization.
pub mod pooling;
/// RoBERTa weights wrapper used by the CodeBERT encoder.
pub mod roberta;
/// Input text normalization.
pub mod sanitize;
/// Deterministic stand-in encoder.
pub mod stub;
mod types;


pub use codebert::{CodeBertConfig, CodeBertEncoder};
pub use device::{device_label, select_device};
pub use embedder::{CodeEmbedder, EncoderStatus};
pub use encoder::{EncoderOutput, TokenEncoder};
pub use error::EmbeddingError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockEncoder;
pub use pooling::{l2_normalize, mean_pool, pool};
pub use sanitize::sanitize;
pub use stub::StubEncoder;
pub use types::Embedding;
