//! Embedding backends for framed-listening.
//!
//! Every backend implements [`EmbeddingProvider`], turning transcripts into
//! fixed-length vectors and reporting the items it could not represent:
//!
//! - [`TfidfVectorizer`]: fitted on the analysed corpus
//! - [`Word2VecEmbedder`]: averaged pretrained word vectors
//! - `BertEmbedder`: mean-pooled BERT hidden states (feature `bert`)
//!
//! [`build_provider`] selects and prepares a backend from an
//! [`EmbeddingConfig`].

pub mod config;
pub mod error;
pub mod factory;
pub mod provider;
pub mod tfidf;
pub mod word2vec;

#[cfg(feature = "bert")]
pub mod bert;

pub use config::{BertConfig, EmbeddingBackend, EmbeddingConfig, TfidfConfig, Word2VecConfig};
pub use error::{EmbeddingError, EmbeddingResult};
pub use factory::build_provider;
pub use provider::{sparsity, CorpusEmbedding, EmbeddingProvider, TextEmbedding};
pub use tfidf::{TfidfVectorizer, VocabularyInfo};
pub use word2vec::{KeyedVectors, Word2VecEmbedder};

#[cfg(feature = "bert")]
pub use bert::BertEmbedder;
