//! Averaged pretrained word vectors.
//!
//! A document's embedding is the mean of the vectors of its in-vocabulary
//! tokens. Lookup is case-sensitive. Documents with no known token embed to
//! the zero vector.

mod tokenize;
mod vectors;

pub use tokenize::word_tokenize;
pub use vectors::KeyedVectors;

use tracing::debug;

use crate::config::{EmbeddingBackend, Word2VecConfig};
use crate::error::{EmbeddingError, EmbeddingResult};
use crate::provider::{EmbeddingProvider, TextEmbedding};

pub struct Word2VecEmbedder {
    vectors: KeyedVectors,
}

impl Word2VecEmbedder {
    pub fn new(vectors: KeyedVectors) -> Self {
        Self { vectors }
    }

    /// Load the vectors file named in `config`.
    ///
    /// # Errors
    /// - `ConfigError` when `vectors_path` is unset
    /// - `ModelLoadError` when the file cannot be read or parsed
    pub fn load(config: &Word2VecConfig) -> EmbeddingResult<Self> {
        let path = config
            .vectors_path
            .as_deref()
            .ok_or_else(|| EmbeddingError::config("[word2vec] vectors_path is not set"))?;
        KeyedVectors::load(path, config.is_binary()).map(Self::new)
    }

    pub fn vectors(&self) -> &KeyedVectors {
        &self.vectors
    }
}

impl EmbeddingProvider for Word2VecEmbedder {
    fn backend(&self) -> EmbeddingBackend {
        EmbeddingBackend::Word2vec
    }

    fn dimension(&self) -> usize {
        self.vectors.dimension()
    }

    fn embed(&self, text: &str) -> EmbeddingResult<TextEmbedding> {
        let dim = self.vectors.dimension();
        let mut sum = vec![0.0f64; dim];
        let mut matched = 0usize;
        let mut unmatched = Vec::new();

        for token in word_tokenize(text) {
            match self.vectors.get(&token) {
                Some(vector) => {
                    for (acc, v) in sum.iter_mut().zip(vector) {
                        *acc += *v as f64;
                    }
                    matched += 1;
                }
                None => unmatched.push(token),
            }
        }

        if matched == 0 {
            debug!(
                target: "framed_listening_embeddings",
                unmatched = unmatched.len(),
                "No known words, using zero vector"
            );
        }

        let vector = sum
            .into_iter()
            .map(|v| if matched == 0 { 0.0 } else { (v / matched as f64) as f32 })
            .collect();
        Ok(TextEmbedding { vector, unmatched })
    }
}
