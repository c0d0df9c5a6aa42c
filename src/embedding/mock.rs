use std::sync::atomic::{AtomicUsize, Ordering};

use candle_core::Device;

use crate::embedding::encoder::{EncoderOutput, TokenEncoder};
use crate::embedding::error::EmbeddingError;
use crate::embedding::stub::StubEncoder;

/// Counting [`StubEncoder`] wrapper that can be told to fail.
///
/// Any input containing the configured trigger returns
/// [`EmbeddingError::InferenceFailed`], standing in for an out-of-memory
/// forward pass.
#[derive(Debug, Default)]
pub struct MockEncoder {
    inner: StubEncoder,
    fail_trigger: Option<String>,
    calls: AtomicUsize,
}

impl MockEncoder {
    pub fn new(hidden_size: usize) -> Self {
        Self {
            inner: StubEncoder::new(hidden_size),
            fail_trigger: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every encode whose input contains `trigger`.
    pub fn failing_on(mut self, trigger: impl Into<String>) -> Self {
        self.fail_trigger = Some(trigger.into());
        self
    }

    /// Number of `encode` calls observed so far (including failures).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TokenEncoder for MockEncoder {
    fn encode(&self, text: &str) -> Result<EncoderOutput, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(trigger) = &self.fail_trigger
            && text.contains(trigger.as_str())
        {
            return Err(EmbeddingError::InferenceFailed {
                reason: "mock encoder out of memory".to_string(),
            });
        }

        self.inner.encode(text)
    }

    fn hidden_size(&self) -> usize {
        self.inner.hidden_size()
    }

    fn device(&self) -> &Device {
        self.inner.device()
    }

    fn is_stub(&self) -> bool {
        true
    }
}
