//! Deterministic stand-in for the pretrained encoder.

use std::hash::{DefaultHasher, Hash, Hasher};

use candle_core::{Device, Tensor};
use tracing::debug;

use crate::constants::{DEFAULT_HIDDEN_SIZE, DEFAULT_MAX_SEQ_LEN};
use crate::embedding::encoder::{EncoderOutput, TokenEncoder};
use crate::embedding::error::EmbeddingError;

const BOS_TOKEN: &str = "<s>";
const EOS_TOKEN: &str = "</s>";

/// Hash-seeded encoder that needs no model files.
///
/// Text is split into identifier runs and single punctuation characters,
/// wrapped in `<s>`/`</s>`, and each token maps to a fixed pseudo-random
/// vector. Identical inputs give identical hidden states; inputs sharing
/// tokens give correlated ones.
#[derive(Debug, Clone)]
pub struct StubEncoder {
    hidden_size: usize,
    max_seq_len: usize,
    device: Device,
}

impl Default for StubEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_HIDDEN_SIZE)
    }
}

impl StubEncoder {
    /// Creates a CPU stub with the given hidden size.
    pub fn new(hidden_size: usize) -> Self {
        Self {
            hidden_size,
            max_seq_len: DEFAULT_MAX_SEQ_LEN,
            device: Device::Cpu,
        }
    }

    /// Overrides the truncation limit (clamped to at least the two special tokens).
    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len.max(2);
        self
    }

    /// Splits text the way the stub tokenizer sees it, including special tokens.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut tokens = vec![BOS_TOKEN];
        let body_limit = self.max_seq_len - 2;
        let mut start: Option<usize> = None;

        for (idx, c) in text.char_indices() {
            if tokens.len() - 1 >= body_limit {
                break;
            }
            if c.is_alphanumeric() || c == '_' {
                start.get_or_insert(idx);
                continue;
            }
            if let Some(s) = start.take() {
                tokens.push(&text[s..idx]);
                if tokens.len() - 1 >= body_limit {
                    break;
                }
            }
            if !c.is_whitespace() {
                tokens.push(&text[idx..idx + c.len_utf8()]);
            }
        }

        if let Some(s) = start
            && tokens.len() - 1 < body_limit
        {
            tokens.push(&text[s..]);
        }

        tokens.push(EOS_TOKEN);
        tokens
    }

    fn token_vector(&self, token: &str, out: &mut Vec<f32>) {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        let mut state = hasher.finish();

        for _ in 0..self.hidden_size {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            out.push(value);
        }
    }
}

impl TokenEncoder for StubEncoder {
    fn encode(&self, text: &str) -> Result<EncoderOutput, EmbeddingError> {
        let tokens = self.tokenize(text);
        let seq_len = tokens.len();

        debug!(
            text_len = text.len(),
            token_count = seq_len,
            "Generating stub hidden states"
        );

        let mut data = Vec::with_capacity(seq_len * self.hidden_size);
        for token in &tokens {
            self.token_vector(token, &mut data);
        }

        let hidden_states = Tensor::from_vec(data, (1, seq_len, self.hidden_size), &self.device)?;
        let attention_mask = Tensor::from_vec(vec![1u32; seq_len], (1, seq_len), &self.device)?;

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

    fn is_stub(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_wraps_in_special_tokens() {
        let stub = StubEncoder::default();
        assert_eq!(stub.tokenize(""), vec!["<s>", "</s>"]);
        assert_eq!(
            stub.tokenize("x=1"),
            vec!["<s>", "x", "=", "1", "</s>"]
        );
    }

    #[test]
    fn test_tokenize_splits_identifiers_and_punctuation() {
        let stub = StubEncoder::default();
        assert_eq!(
            stub.tokenize("def add_one(a):\n    return a+1"),
            vec![
                "<s>", "def", "add_one", "(", "a", ")", ":", "return", "a", "+", "1", "</s>"
            ]
        );
    }

    #[test]
    fn test_tokenize_truncates_to_max_seq_len() {
        let stub = StubEncoder::default().with_max_seq_len(6);
        let tokens = stub.tokenize("a b c d e f g h");
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens, vec!["<s>", "a", "b", "c", "d", "</s>"]);
    }

    #[test]
    fn test_long_input_capped_at_default_limit() {
        let stub = StubEncoder::default();
        let text = "tok ".repeat(2000);
        assert_eq!(stub.tokenize(&text).len(), DEFAULT_MAX_SEQ_LEN);
    }

    #[test]
    fn test_encode_shapes() {
        let stub = StubEncoder::new(16);
        let out = stub.encode("x = 1").expect("stub encode");
        assert_eq!(out.hidden_states.dims(), &[1, 5, 16]);
        assert_eq!(out.attention_mask.dims(), &[1, 5]);
        assert_eq!(out.seq_len(), 5);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let stub = StubEncoder::new(32);
        let a = stub.encode("return 42").unwrap().hidden_states;
        let b = stub.encode("return 42").unwrap().hidden_states;
        let a: Vec<Vec<Vec<f32>>> = a.to_vec3().unwrap();
        let b: Vec<Vec<Vec<f32>>> = b.to_vec3().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stub_flags() {
        let stub = StubEncoder::default();
        assert!(stub.is_stub());
        assert_eq!(stub.hidden_size(), DEFAULT_HIDDEN_SIZE);
        assert_eq!(stub.device_label(), "cpu");
    }
}
