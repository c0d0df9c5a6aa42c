use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config, XLMRobertaModel};
use std::path::Path;

/// Keys CodeBERT's `config.json` may omit, with the values RoBERTa assumes.
fn config_defaults() -> [(&'static str, serde_json::Value); 6] {
    [
        ("position_embedding_type", serde_json::json!("absolute")),
        ("pad_token_id", serde_json::json!(1)),
        ("type_vocab_size", serde_json::json!(1)),
        ("layer_norm_eps", serde_json::json!(1e-5)),
        ("hidden_dropout_prob", serde_json::json!(0.1)),
        ("attention_probs_dropout_prob", serde_json::json!(0.1)),
    ]
}

#[derive(serde::Deserialize)]
struct HiddenDims {
    hidden_size: usize,
}

/// Parses a Hugging Face RoBERTa `config.json`, filling keys older exports leave out.
pub fn parse_config(raw: &str) -> Result<Config> {
    let mut value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

    let object = value
        .as_object_mut()
        .ok_or_else(|| candle::Error::Msg("config.json is not an object".to_string()))?;
    for (key, default) in config_defaults() {
        object.entry(key).or_insert(default);
    }

    serde_json::from_value(value)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))
}

/// RoBERTa-family encoder (CodeBERT) returning the last hidden state.
///
/// Position ids start at `pad_token_id + 1` and skip padding, as in RoBERTa.
/// Checkpoints exported with a `roberta.` prefix and unprefixed ones both load.
pub struct RobertaEncoderModel {
    encoder: XLMRobertaModel,
    hidden_size: usize,
}

impl RobertaEncoderModel {
    /// Loads `config.json` and `model.safetensors` from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let config_content = std::fs::read_to_string(config_path)?;
        let config = parse_config(&config_content)?;
        let dims: HiddenDims = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))?;

        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        let encoder = if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            XLMRobertaModel::new(&config, vb.pp("roberta"))?
        } else {
            XLMRobertaModel::new(&config, vb)?
        };

        Ok(Self {
            encoder,
            hidden_size: dims.hidden_size,
        })
    }

    /// Runs the encoder; output shape is `[batch, seq_len, hidden_size]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        self.encoder
            .forward(input_ids, attention_mask, token_type_ids, None, None, None)
    }

    /// Width of each hidden state.
    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }
}
