//! Codesim library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`CodeEmbedder`], [`Embedding`] - Snippet embedding (sanitize, encode, pool)
//! - [`SimilarityEngine`], [`SimilarityMatrix`] - Pairwise and all-pairs cosine similarity
//! - [`EncoderStatus`] - Read-only load state reported by health checks
//!
//! ## Encoders
//! - [`CodeBertEncoder`], [`CodeBertConfig`] - Pretrained RoBERTa-family encoder
//! - [`StubEncoder`] - Deterministic encoder that needs no model files
//! - [`TokenEncoder`] - The seam both implement
//!
//! ## HTTP
//! - [`gateway::create_router_with_state`] builds the Axum router.
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod similarity;

pub use config::{Config, ConfigError};
pub use embedding::{
    CodeBertConfig, CodeBertEncoder, CodeEmbedder, Embedding, EmbeddingError, EncoderOutput,
    EncoderStatus, StubEncoder, TokenEncoder, device_label, sanitize, select_device,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEncoder;
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use similarity::{SimilarityEngine, SimilarityError, SimilarityMatrix, cosine, dot};
