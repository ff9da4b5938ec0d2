//! Builds the configured embedding backend.

use tracing::info;

use crate::config::{EmbeddingBackend, EmbeddingConfig};
#[cfg(not(feature = "bert"))]
use crate::error::EmbeddingError;
use crate::error::EmbeddingResult;
use crate::provider::EmbeddingProvider;
use crate::tfidf::TfidfVectorizer;
use crate::word2vec::Word2VecEmbedder;

/// Create the provider selected by `config.backend`.
///
/// TF-IDF is fitted on `corpus`; the other backends ignore it and load their
/// pretrained models.
///
/// # Errors
/// - `ConfigError` if the configuration is invalid
/// - `ModelLoadError` if vectors or model files cannot be loaded, or if BERT
///   is requested from a build without the `bert` feature
/// - any fitting error from TF-IDF
pub fn build_provider(
    config: &EmbeddingConfig,
    corpus: &[&str],
) -> EmbeddingResult<Box<dyn EmbeddingProvider>> {
    config.validate()?;
    info!(
        target: "framed_listening_embeddings",
        backend = %config.backend,
        documents = corpus.len(),
        "Building embedding provider"
    );

    match config.backend {
        EmbeddingBackend::Tfidf => Ok(Box::new(TfidfVectorizer::fit(
            config.tfidf.clone(),
            corpus,
        )?)),
        EmbeddingBackend::Word2vec => Ok(Box::new(Word2VecEmbedder::load(&config.word2vec)?)),
        EmbeddingBackend::Bert => build_bert(config),
    }
}

#[cfg(feature = "bert")]
fn build_bert(config: &EmbeddingConfig) -> EmbeddingResult<Box<dyn EmbeddingProvider>> {
    Ok(Box::new(crate::bert::BertEmbedder::load(&config.bert)?))
}

#[cfg(not(feature = "bert"))]
fn build_bert(_config: &EmbeddingConfig) -> EmbeddingResult<Box<dyn EmbeddingProvider>> {
    Err(EmbeddingError::model_load(
        EmbeddingBackend::Bert.as_str(),
        "this build does not include the `bert` feature",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmbeddingError;
    use std::io::Write;

    const CORPUS: [&str; 3] = ["ocean waves", "ocean breeze", "city waves"];

    #[test]
    fn test_builds_fitted_tfidf() {
        let mut config = EmbeddingConfig::default();
        config.tfidf.min_df = 1;
        config.tfidf.max_df = 1.0;
        let provider = build_provider(&config, &CORPUS).unwrap();
        assert_eq!(provider.backend(), EmbeddingBackend::Tfidf);
        assert_eq!(provider.dimension(), 4);
    }

    #[test]
    fn test_builds_word2vec_from_text_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"ocean 1 0 0\nwaves 0 1 0\n").unwrap();
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::Word2vec,
            word2vec: crate::config::Word2VecConfig {
                vectors_path: Some(file.path().to_path_buf()),
                binary: None,
            },
            ..EmbeddingConfig::default()
        };
        let provider = build_provider(&config, &CORPUS).unwrap();
        assert_eq!(provider.backend(), EmbeddingBackend::Word2vec);
        assert_eq!(provider.dimension(), 3);
    }

    #[test]
    fn test_word2vec_without_path_rejected() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::Word2vec,
            ..EmbeddingConfig::default()
        };
        assert!(matches!(
            build_provider(&config, &CORPUS),
            Err(EmbeddingError::ConfigError { .. })
        ));
    }

    #[cfg(not(feature = "bert"))]
    #[test]
    fn test_bert_requires_feature() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::Bert,
            bert: crate::config::BertConfig {
                model_dir: Some("models/bert".into()),
                max_length: 512,
            },
            ..EmbeddingConfig::default()
        };
        let err = build_provider(&config, &CORPUS).err().unwrap();
        assert!(err.to_string().contains("bert"));
        assert!(matches!(err, EmbeddingError::ModelLoadError { .. }));
    }
}
