//! Deck embedder (BERT safetensors + tokenizer).
//!
//! Use [`EmbedderConfig::stub`] for tests/servers without model files: stub
//! mode produces deterministic token-bag embeddings, so texts sharing
//! vocabulary still score as similar.

/// Embedder configuration.
pub mod config;
mod error;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_EMBEDDING_DIM, DEFAULT_MAX_SEQ_LEN, EmbedderConfig};
pub use error::EmbeddingError;

use candle_core::{DType, Device, Tensor};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use super::device::select_device;
use super::error::BackendError;
use super::EmbedBackend;

enum EncoderBackend {
    Model {
        model: BertModel,
        tokenizer: Tokenizer,
        device: Device,
        hidden_size: usize,
    },
    Stub,
}

/// Sentence embedder for semantic relevance scoring (supports stub mode).
pub struct DeckEmbedder {
    backend: EncoderBackend,
    config: EmbedderConfig,
}

impl std::fmt::Debug for DeckEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckEmbedder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({device:?})"),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.embedding_dim())
            .finish()
    }
}

impl DeckEmbedder {
    /// Loads the embedder from a config (stub mode is supported).
    pub fn load(config: EmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Deck embedder running in STUB mode (deterministic token-bag embeddings)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
            });
        }

        let device = select_device();
        debug!(?device, "Selected compute device for deck embedder");

        let (model, tokenizer, hidden_size) = Self::load_model(&config, &device)?;

        info!(
            model_dir = %config.model_dir.display(),
            hidden_size,
            max_seq_len = config.max_seq_len,
            "Embedding model loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer,
                device,
                hidden_size,
            },
            config,
        })
    }

    fn load_model(
        config: &EmbedderConfig,
        device: &Device,
    ) -> Result<(BertModel, Tokenizer, usize), EmbeddingError> {
        let config_path = config.model_dir.join("config.json");
        let weights_path = config.model_dir.join("model.safetensors");
        let tokenizer_path = config.model_dir.join("tokenizer.json");

        for path in [&config_path, &weights_path, &tokenizer_path] {
            if !path.exists() {
                return Err(EmbeddingError::ModelNotFound { path: path.clone() });
            }
        }

        let config_content = std::fs::read_to_string(&config_path)?;
        let bert_config: BertConfig =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to parse config.json: {e}"),
            })?;
        let hidden_size = bert_config.hidden_size;

        let vb = unsafe {
            candle_nn::VarBuilder::from_mmaped_safetensors(&[&weights_path], DType::F32, device)
                .map_err(|e| EmbeddingError::ModelLoadFailed {
                    reason: format!("Failed to map safetensors: {e}"),
                })?
        };

        // Sentence-encoder checkpoints sometimes prefix weights with "bert.".
        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &bert_config)
        } else {
            BertModel::load(vb, &bert_config)
        }
        .map_err(|e| EmbeddingError::ModelLoadFailed {
            reason: format!("Failed to load BERT model: {e}"),
        })?;

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {e}"),
            }
        })?;

        let truncation = tokenizers::TruncationParams {
            max_length: config.max_seq_len,
            ..Default::default()
        };
        tokenizer
            .with_truncation(Some(truncation))
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("Failed to configure truncation: {e}"),
            })?;

        Ok((model, tokenizer, hidden_size))
    }

    /// Generates an L2-normalized embedding for a single string.
    pub fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match &self.backend {
            EncoderBackend::Model {
                model,
                tokenizer,
                device,
                hidden_size,
            } => Self::embed_with_model(text, model, tokenizer, device, *hidden_size),
            EncoderBackend::Stub => Ok(self.embed_stub(text)),
        }
    }

    fn embed_with_model(
        text: &str,
        model: &BertModel,
        tokenizer: &Tokenizer,
        device: &Device,
        hidden_size: usize,
    ) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let tokens = encoding.get_ids();
        if tokens.is_empty() {
            return Ok(vec![0.0; hidden_size]);
        }

        debug!(
            text_len = text.len(),
            token_count = tokens.len(),
            "Generating embedding (encoder forward pass)"
        );

        // Shape [1, seq_len]; single sequence, so no padding mask is needed.
        let input_ids = Tensor::new(tokens, device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;

        let hidden_states = model.forward(&input_ids, &token_type_ids, None)?;

        // Mean pooling over the sequence dimension.
        let pooled = hidden_states.mean(1)?.squeeze(0)?.to_vec1::<f32>()?;

        Ok(normalize(pooled))
    }

    // Token-bag stub: each whitespace-delimited token hashes to one slot.
    // Deterministic, and cosine similarity tracks vocabulary overlap.
    fn embed_stub(&self, text: &str) -> Vec<f32> {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let dim = self.config.embedding_dim;
        let mut embedding = vec![0.0f32; dim];

        for token in text.split_whitespace() {
            let token: String = token
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            if token.is_empty() {
                continue;
            }

            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let slot = (hasher.finish() % dim as u64) as usize;
            embedding[slot] += 1.0;
        }

        normalize(embedding)
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    /// Returns the output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        match &self.backend {
            EncoderBackend::Model { hidden_size, .. } => *hidden_size,
            EncoderBackend::Stub => self.config.embedding_dim,
        }
    }
}

impl EmbedBackend for DeckEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, BackendError> {
        Ok(self.embed_text(text)?)
    }

    fn embedding_dim(&self) -> usize {
        DeckEmbedder::embedding_dim(self)
    }
}

fn normalize(mut embedding: Vec<f32>) -> Vec<f32> {
    let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm > 0.0 {
        for x in &mut embedding {
            *x /= norm;
        }
    }

    embedding
}
