//! Error types for framed-listening-core.

use thiserror::Error;

/// Top-level error type for framed-listening-core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Document load error at line {line}: {message}")]
    DocumentLoadError { line: usize, message: String },

    #[error("Validation error: {field} - {message}")]
    ValidationError { field: String, message: String },

    #[error("Metadata mismatch: {documents} documents but similarity matrix is {matrix}x{matrix}")]
    MetadataMismatch { documents: usize, matrix: usize },

    #[error("Invalid embedding dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Similarity matrix is not symmetric at ({i}, {j})")]
    AsymmetricMatrix { i: usize, j: usize },

    #[error("Invalid similarity value {value} at ({i}, {j})")]
    InvalidSimilarity { i: usize, j: usize, value: f64 },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CoreError {
    /// Shorthand for a [`CoreError::ValidationError`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`CoreError::DocumentLoadError`].
    pub fn document_load(line: usize, message: impl Into<String>) -> Self {
        Self::DocumentLoadError {
            line,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::ConfigError(err.to_string())
    }
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_load_display() {
        let err = CoreError::document_load(7, "missing field `clip`");
        let msg = err.to_string();
        assert!(msg.contains("line 7"));
        assert!(msg.contains("clip"));
    }

    #[test]
    fn test_metadata_mismatch_display() {
        let err = CoreError::MetadataMismatch {
            documents: 10,
            matrix: 9,
        };
        assert!(err.to_string().contains("10 documents"));
        assert!(err.to_string().contains("9x9"));
    }

    #[test]
    fn test_io_error_from() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::IoError(_)));
    }
}
