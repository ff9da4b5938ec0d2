//! The embedding provider seam.
//!
//! ```text
//! EmbeddingProvider (trait)
//! ├── backend() -> EmbeddingBackend
//! ├── dimension() -> usize
//! ├── embed(&str) -> TextEmbedding          // vector + unmatched items
//! └── embed_corpus(&[&str]) -> CorpusEmbedding
//! ```
//!
//! Unmatched items depend on the backend: out-of-vocabulary terms for
//! TF-IDF and Word2Vec, truncated tokens for BERT.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EmbeddingBackend;
use crate::error::{EmbeddingError, EmbeddingResult};

/// One document's embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEmbedding {
    pub vector: Vec<f32>,
    pub unmatched: Vec<String>,
}

/// Embeddings for a whole corpus, in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEmbedding {
    pub vectors: Vec<Vec<f32>>,
    /// Every unmatched item across the corpus, duplicates kept.
    pub unmatched: Vec<String>,
    /// Fraction of zero entries across all vectors.
    pub sparsity: f64,
}

impl CorpusEmbedding {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn unique_unmatched(&self) -> usize {
        self.unmatched.iter().collect::<HashSet<_>>().len()
    }
}

/// Fraction of exactly-zero entries. Zero for an empty input.
pub fn sparsity(vectors: &[Vec<f32>]) -> f64 {
    let total: usize = vectors.iter().map(Vec::len).sum();
    if total == 0 {
        return 0.0;
    }
    let zeros = vectors
        .iter()
        .flat_map(|v| v.iter())
        .filter(|&&x| x == 0.0)
        .count();
    zeros as f64 / total as f64
}

/// Trait for embedding backends.
///
/// Implementations are synchronous and hold any fitted state or loaded model.
pub trait EmbeddingProvider: Send + Sync {
    fn backend(&self) -> EmbeddingBackend;

    /// Output dimension of every vector.
    fn dimension(&self) -> usize;

    /// Embed a single text.
    fn embed(&self, text: &str) -> EmbeddingResult<TextEmbedding>;

    /// Embed every text, collecting unmatched items.
    ///
    /// Default implementation calls `embed` for each text.
    fn embed_corpus(&self, texts: &[&str]) -> EmbeddingResult<CorpusEmbedding> {
        let mut vectors = Vec::with_capacity(texts.len());
        let mut unmatched = Vec::new();

        for text in texts {
            let embedding = self.embed(text)?;
            if embedding.vector.len() != self.dimension() {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: self.dimension(),
                    actual: embedding.vector.len(),
                });
            }
            vectors.push(embedding.vector);
            unmatched.extend(embedding.unmatched);
        }

        let corpus = CorpusEmbedding {
            sparsity: sparsity(&vectors),
            vectors,
            unmatched,
        };

        info!(
            target: "framed_listening_embeddings",
            backend = %self.backend(),
            documents = corpus.len(),
            dimension = self.dimension(),
            unmatched = corpus.unmatched.len(),
            unique_unmatched = corpus.unique_unmatched(),
            sparsity = corpus.sparsity,
            "Embeddings computed"
        );

        Ok(corpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts letters a and b; anything else is unmatched.
    struct LetterCounter;

    impl EmbeddingProvider for LetterCounter {
        fn backend(&self) -> EmbeddingBackend {
            EmbeddingBackend::Tfidf
        }

        fn dimension(&self) -> usize {
            2
        }

        fn embed(&self, text: &str) -> EmbeddingResult<TextEmbedding> {
            let a = text.matches('a').count() as f32;
            let b = text.matches('b').count() as f32;
            let unmatched = text
                .chars()
                .filter(|c| *c != 'a' && *c != 'b')
                .map(String::from)
                .collect();
            Ok(TextEmbedding {
                vector: vec![a, b],
                unmatched,
            })
        }
    }

    #[test]
    fn test_embed_corpus_preserves_order_and_collects_unmatched() {
        let corpus = LetterCounter.embed_corpus(&["aab", "bc", "cc"]).unwrap();
        assert_eq!(corpus.vectors, vec![vec![2.0, 1.0], vec![0.0, 1.0], vec![0.0, 0.0]]);
        assert_eq!(corpus.unmatched, vec!["c", "c", "c"]);
        assert_eq!(corpus.unique_unmatched(), 1);
        assert!((corpus.sparsity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sparsity_of_empty_input_is_zero() {
        assert_eq!(sparsity(&[]), 0.0);
        assert_eq!(sparsity(&[vec![]]), 0.0);
    }
}
