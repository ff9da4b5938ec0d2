//! Error types for embedding backends.

use thiserror::Error;

/// Embedding-specific errors.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// A backend could not load its model or vectors. Not retried.
    #[error("Failed to load {backend} model: {message}")]
    ModelLoadError { backend: String, message: String },

    /// Embedding generation failed.
    #[error("Failed to generate embedding: {0}")]
    GenerationError(String),

    /// Input validation failed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// TF-IDF pruning left no terms.
    #[error("Empty vocabulary: no terms remain after pruning; try a lower min_df or a higher max_df")]
    EmptyVocabulary,

    /// Dimension mismatch.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl EmbeddingError {
    pub(crate) fn model_load(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModelLoadError {
            backend: backend.into(),
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

/// Result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_load_error_names_backend() {
        let err = EmbeddingError::model_load("word2vec", "file not found");
        let msg = err.to_string();
        assert!(msg.contains("word2vec"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EmbeddingError = io.into();
        assert!(matches!(err, EmbeddingError::IoError(_)));
    }

    #[test]
    fn test_empty_vocabulary_message_suggests_fix() {
        assert!(EmbeddingError::EmptyVocabulary.to_string().contains("min_df"));
    }
}
