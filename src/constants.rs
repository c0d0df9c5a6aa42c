//! Cross-cutting, shared constants.
//!
//! The character and token limits mirror what CodeBERT was trained with; the
//! hidden size is only a default and the loaded model's config wins.

/// Max characters kept by the sanitizer (prefix truncation).
pub const MAX_INPUT_CHARS: usize = 8000;

/// Spaces substituted for each tab character.
pub const TAB_WIDTH: usize = 4;

/// Hard token limit passed to the tokenizer's truncation.
pub const DEFAULT_MAX_SEQ_LEN: usize = 512;

/// Hidden size of `microsoft/codebert-base`.
pub const DEFAULT_HIDDEN_SIZE: usize = 768;

/// Model name reported by health checks when none is configured.
pub const DEFAULT_MODEL_NAME: &str = "microsoft/codebert-base";

/// Floor applied to the L2 norm before division.
///
/// A zero vector divided by this floor stays zero.
pub const NORM_EPSILON: f32 = 1e-12;

/// Default cap on snippets per batch-similarity request.
pub const DEFAULT_MAX_BATCH: usize = 256;

/// Response header carrying a short machine-readable status.
pub const CODESIM_STATUS_HEADER: &str = "x-codesim-status";

/// Status value for a healthy service.
pub const CODESIM_STATUS_HEALTHY: &str = "healthy";

/// Status value when the encoder is not loaded.
pub const CODESIM_STATUS_NOT_READY: &str = "not_ready";
