//! BERT sentence embeddings on CPU via candle.
//!
//! The model directory must contain `config.json`, `tokenizer.json` and
//! `model.safetensors`. Each text is encoded with special tokens; encodings
//! longer than `max_length` keep their first `max_length - 1` tokens plus the
//! final `[SEP]`, and the dropped tokens are reported as unmatched. The
//! sentence vector is the last hidden state mean-pooled over the attention
//! mask.

use std::path::Path;

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use tokenizers::Tokenizer;
use tracing::{error, info};

use crate::config::{BertConfig, EmbeddingBackend};
use crate::error::{EmbeddingError, EmbeddingResult};
use crate::provider::{EmbeddingProvider, TextEmbedding};

const BACKEND: &str = "bert";

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    max_length: usize,
    hidden_size: usize,
    device: Device,
}

impl BertEmbedder {
    /// Load model, tokenizer and weights from `config.model_dir`.
    pub fn load(config: &BertConfig) -> EmbeddingResult<Self> {
        config.validate()?;
        let model_dir = config
            .model_dir
            .as_deref()
            .ok_or_else(|| EmbeddingError::config("[bert] model_dir is not set"))?;

        let result = Self::load_from_dir(model_dir, config.max_length);
        match &result {
            Ok(embedder) => info!(
                target: "framed_listening_embeddings",
                model_dir = %model_dir.display(),
                hidden_size = embedder.hidden_size,
                max_length = embedder.max_length,
                "Loaded BERT model"
            ),
            Err(e) => error!(
                target: "framed_listening_embeddings",
                model_dir = %model_dir.display(),
                error = %e,
                "Failed to load BERT model"
            ),
        }
        result
    }

    fn load_from_dir(model_dir: &Path, max_length: usize) -> EmbeddingResult<Self> {
        let device = Device::Cpu;
        let load_err = |what: &str, e: &dyn std::fmt::Display| {
            EmbeddingError::model_load(BACKEND, format!("{}: {}", what, e))
        };

        let config_path = model_dir.join("config.json");
        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| load_err(&config_path.display().to_string(), &e))?;
        let config: Config =
            serde_json::from_str(&config_str).map_err(|e| load_err("config.json", &e))?;
        let raw: serde_json::Value =
            serde_json::from_str(&config_str).map_err(|e| load_err("config.json", &e))?;
        let hidden_size = raw
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| EmbeddingError::model_load(BACKEND, "config.json has no hidden_size"))?
            as usize;

        let tokenizer_path = model_dir.join("tokenizer.json");
        let mut tokenizer =
            Tokenizer::from_file(&tokenizer_path).map_err(|e| load_err("tokenizer.json", &e))?;
        tokenizer
            .with_truncation(None)
            .map_err(|e| load_err("tokenizer.json", &e))?;
        tokenizer.with_padding(None);

        let weights_path = model_dir.join("model.safetensors");
        if !weights_path.exists() {
            return Err(EmbeddingError::model_load(
                BACKEND,
                format!("{} not found", weights_path.display()),
            ));
        }
        // SAFETY: the weights file is memory-mapped read-only and not modified
        // while the model is alive.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device) }
            .map_err(|e| load_err("model.safetensors", &e))?;
        let model = BertModel::load(vb, &config).map_err(|e| load_err("model", &e))?;

        Ok(Self {
            model,
            tokenizer,
            max_length,
            hidden_size,
            device,
        })
    }

    fn forward(&self, ids: &[u32]) -> candle_core::Result<Vec<f32>> {
        let token_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = token_ids.zeros_like()?;
        let attention_mask = token_ids.ones_like()?;

        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;

        let mask = attention_mask.to_dtype(DTYPE)?.unsqueeze(2)?;
        let pooled = hidden.broadcast_mul(&mask)?.sum(1)?;
        let pooled = pooled.broadcast_div(&mask.sum(1)?)?;
        pooled.squeeze(0)?.to_vec1::<f32>()
    }
}

impl EmbeddingProvider for BertEmbedder {
    fn backend(&self) -> EmbeddingBackend {
        EmbeddingBackend::Bert
    }

    fn dimension(&self) -> usize {
        self.hidden_size
    }

    fn embed(&self, text: &str) -> EmbeddingResult<TextEmbedding> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingError::GenerationError(format!("tokenization: {}", e)))?;
        let ids = encoding.get_ids();
        let tokens = encoding.get_tokens();

        let (ids, unmatched) = if ids.len() > self.max_length {
            let keep = self.max_length - 1;
            let mut kept = ids[..keep].to_vec();
            kept.push(ids[ids.len() - 1]);
            (kept, tokens[keep..tokens.len() - 1].to_vec())
        } else {
            (ids.to_vec(), Vec::new())
        };

        let vector = self
            .forward(&ids)
            .map_err(|e| EmbeddingError::GenerationError(e.to_string()))?;
        if vector.len() != self.hidden_size {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.hidden_size,
                actual: vector.len(),
            });
        }
        Ok(TextEmbedding { vector, unmatched })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_missing_model_dir_is_model_load_error() {
        let config = BertConfig {
            model_dir: Some(PathBuf::from("/nonexistent/bert")),
            max_length: 512,
        };
        let err = BertEmbedder::load(&config).err().unwrap();
        assert!(
            matches!(err, EmbeddingError::ModelLoadError { ref backend, .. } if backend == "bert")
        );
    }

    #[test]
    fn test_unset_model_dir_is_config_error() {
        let err = BertEmbedder::load(&BertConfig::default()).err().unwrap();
        assert!(matches!(err, EmbeddingError::ConfigError { .. }));
    }

    #[test]
    fn test_config_without_weights_fails() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        let config = BertConfig {
            model_dir: Some(dir.path().to_path_buf()),
            max_length: 16,
        };
        assert!(matches!(
            BertEmbedder::load(&config),
            Err(EmbeddingError::ModelLoadError { .. })
        ));
    }
}
