//! Configuration for the embedding backends.
//!
//! # TOML Structure
//!
//! ```toml
//! backend = "tfidf"
//!
//! [tfidf]
//! max_features = 5000
//! ngram_min = 1
//! ngram_max = 1
//! min_df = 2
//! max_df = 0.95
//! stop_words = true
//! lowercase = true
//!
//! [word2vec]
//! vectors_path = "models/GoogleNews-vectors-negative300.bin"
//!
//! [bert]
//! model_dir = "models/bert-base-uncased"
//! max_length = 512
//! ```
//!
//! Invalid values are rejected by [`EmbeddingConfig::validate`]; nothing is
//! silently clamped.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EmbeddingError, EmbeddingResult};

/// Prefix for environment overrides, e.g. `FRAMED_LISTENING_EMBEDDING_BACKEND`.
pub const ENV_PREFIX: &str = "FRAMED_LISTENING_EMBEDDING_";

// ============================================================================
// BACKEND
// ============================================================================

/// Which embedding method turns documents into vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    #[default]
    Tfidf,
    Word2vec,
    Bert,
}

impl EmbeddingBackend {
    pub const ALL: [EmbeddingBackend; 3] = [
        EmbeddingBackend::Tfidf,
        EmbeddingBackend::Word2vec,
        EmbeddingBackend::Bert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingBackend::Tfidf => "tfidf",
            EmbeddingBackend::Word2vec => "word2vec",
            EmbeddingBackend::Bert => "bert",
        }
    }

    /// Default file prefix for this backend's outputs.
    pub fn output_prefix(&self) -> &'static str {
        match self {
            EmbeddingBackend::Tfidf => "TFIDF",
            EmbeddingBackend::Word2vec => "W2V",
            EmbeddingBackend::Bert => "BERT",
        }
    }
}

impl fmt::Display for EmbeddingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmbeddingBackend {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "tfidf" => Ok(EmbeddingBackend::Tfidf),
            "word2vec" | "w2v" => Ok(EmbeddingBackend::Word2vec),
            "bert" => Ok(EmbeddingBackend::Bert),
            other => Err(EmbeddingError::config(format!(
                "unknown backend '{}', expected one of tfidf, word2vec, bert",
                other
            ))),
        }
    }
}

// ============================================================================
// TF-IDF
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfConfig {
    /// Vocabulary cap, keeping the most frequent terms.
    #[serde(default = "default_max_features")]
    pub max_features: usize,

    #[serde(default = "default_ngram")]
    pub ngram_min: usize,

    #[serde(default = "default_ngram")]
    pub ngram_max: usize,

    /// Minimum number of documents a term must occur in.
    #[serde(default = "default_min_df")]
    pub min_df: usize,

    /// Maximum proportion of documents a term may occur in.
    #[serde(default = "default_max_df")]
    pub max_df: f64,

    /// Remove English stop words before building n-grams.
    #[serde(default = "default_true")]
    pub stop_words: bool,

    #[serde(default = "default_true")]
    pub lowercase: bool,
}

fn default_max_features() -> usize {
    5000
}

fn default_ngram() -> usize {
    1
}

fn default_min_df() -> usize {
    2
}

fn default_max_df() -> f64 {
    0.95
}

fn default_true() -> bool {
    true
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            ngram_min: default_ngram(),
            ngram_max: default_ngram(),
            min_df: default_min_df(),
            max_df: default_max_df(),
            stop_words: true,
            lowercase: true,
        }
    }
}

impl TfidfConfig {
    pub fn validate(&self) -> EmbeddingResult<()> {
        if self.max_features == 0 {
            return Err(EmbeddingError::config("max_features must be > 0"));
        }
        if self.ngram_min == 0 || self.ngram_max < self.ngram_min {
            return Err(EmbeddingError::config(format!(
                "invalid ngram range ({}, {})",
                self.ngram_min, self.ngram_max
            )));
        }
        if self.min_df == 0 {
            return Err(EmbeddingError::config("min_df must be >= 1"));
        }
        if !(self.max_df > 0.0 && self.max_df <= 1.0) {
            return Err(EmbeddingError::config(format!(
                "max_df must be in (0, 1], got {}",
                self.max_df
            )));
        }
        Ok(())
    }
}

// ============================================================================
// WORD2VEC
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Word2VecConfig {
    /// Pretrained vectors in word2vec text, GloVe or binary format.
    #[serde(default)]
    pub vectors_path: Option<PathBuf>,

    /// Force the binary loader. When unset, `.bin` files are read as binary.
    #[serde(default)]
    pub binary: Option<bool>,
}

impl Word2VecConfig {
    /// Whether the configured file should be read with the binary loader.
    pub fn is_binary(&self) -> bool {
        match (self.binary, &self.vectors_path) {
            (Some(flag), _) => flag,
            (None, Some(path)) => path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("bin"))
                .unwrap_or(false),
            (None, None) => false,
        }
    }
}

// ============================================================================
// BERT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BertConfig {
    /// Directory holding `config.json`, `tokenizer.json` and `model.safetensors`.
    #[serde(default)]
    pub model_dir: Option<PathBuf>,

    /// Token limit including special tokens.
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_max_length() -> usize {
    512
}

impl Default for BertConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_length: default_max_length(),
        }
    }
}

impl BertConfig {
    pub fn validate(&self) -> EmbeddingResult<()> {
        // Room for [CLS] and [SEP] plus at least one content token.
        if self.max_length < 3 {
            return Err(EmbeddingError::config(format!(
                "max_length must be >= 3, got {}",
                self.max_length
            )));
        }
        Ok(())
    }
}

// ============================================================================
// ROOT CONFIG
// ============================================================================

/// Root configuration for the embedding stage.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub backend: EmbeddingBackend,

    #[serde(default)]
    pub tfidf: TfidfConfig,

    #[serde(default)]
    pub word2vec: Word2VecConfig,

    #[serde(default)]
    pub bert: BertConfig,
}

impl EmbeddingConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// - `EmbeddingError::ConfigError` if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> EmbeddingResult<Self> {
        let path = path.as_ref();

        let contents = std::fs::read_to_string(path).map_err(|e| {
            EmbeddingError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&contents).map_err(|e| {
            EmbeddingError::config(format!(
                "Failed to parse TOML in '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Validate every section, returning the first error found.
    ///
    /// The section for the selected backend must be usable: Word2Vec needs
    /// `vectors_path` and BERT needs `model_dir`.
    pub fn validate(&self) -> EmbeddingResult<()> {
        self.tfidf
            .validate()
            .map_err(|e| EmbeddingError::config(format!("[tfidf] {}", e)))?;
        self.bert
            .validate()
            .map_err(|e| EmbeddingError::config(format!("[bert] {}", e)))?;

        match self.backend {
            EmbeddingBackend::Word2vec if self.word2vec.vectors_path.is_none() => Err(
                EmbeddingError::config("[word2vec] vectors_path is required for the word2vec backend"),
            ),
            EmbeddingBackend::Bert if self.bert.model_dir.is_none() => Err(EmbeddingError::config(
                "[bert] model_dir is required for the bert backend",
            )),
            _ => Ok(()),
        }
    }

    /// Apply `FRAMED_LISTENING_EMBEDDING_*` environment overrides.
    ///
    /// Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = env::var(format!("{ENV_PREFIX}BACKEND")) {
            if let Ok(backend) = val.parse::<EmbeddingBackend>() {
                self.backend = backend;
            }
        }

        // TF-IDF
        if let Ok(val) = env::var(format!("{ENV_PREFIX}TFIDF_MAX_FEATURES")) {
            if let Ok(n) = val.parse::<usize>() {
                self.tfidf.max_features = n;
            }
        }
        if let Ok(val) = env::var(format!("{ENV_PREFIX}TFIDF_MIN_DF")) {
            if let Ok(n) = val.parse::<usize>() {
                self.tfidf.min_df = n;
            }
        }
        if let Ok(val) = env::var(format!("{ENV_PREFIX}TFIDF_MAX_DF")) {
            if let Ok(x) = val.parse::<f64>() {
                self.tfidf.max_df = x;
            }
        }

        // Word2Vec
        if let Ok(val) = env::var(format!("{ENV_PREFIX}WORD2VEC_PATH")) {
            self.word2vec.vectors_path = Some(PathBuf::from(val));
        }
        if let Ok(val) = env::var(format!("{ENV_PREFIX}WORD2VEC_BINARY")) {
            if let Ok(b) = val.parse::<bool>() {
                self.word2vec.binary = Some(b);
            }
        }

        // BERT
        if let Ok(val) = env::var(format!("{ENV_PREFIX}BERT_MODEL_DIR")) {
            self.bert.model_dir = Some(PathBuf::from(val));
        }
        if let Ok(val) = env::var(format!("{ENV_PREFIX}BERT_MAX_LENGTH")) {
            if let Ok(n) = val.parse::<usize>() {
                self.bert.max_length = n;
            }
        }

        self
    }

    pub fn from_toml_str(toml: &str) -> EmbeddingResult<Self> {
        toml::from_str(toml)
            .map_err(|e| EmbeddingError::config(format!("Failed to parse TOML: {}", e)))
    }

    pub fn to_toml_string(&self) -> EmbeddingResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| EmbeddingError::config(format!("Failed to serialize to TOML: {}", e)))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn clear_env() {
        for key in [
            "BACKEND",
            "TFIDF_MAX_FEATURES",
            "TFIDF_MIN_DF",
            "TFIDF_MAX_DF",
            "WORD2VEC_PATH",
            "WORD2VEC_BINARY",
            "BERT_MODEL_DIR",
            "BERT_MAX_LENGTH",
        ] {
            env::remove_var(format!("{ENV_PREFIX}{key}"));
        }
    }

    #[test]
    fn test_defaults_match_vectorizer_settings() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.backend, EmbeddingBackend::Tfidf);
        assert_eq!(config.tfidf.max_features, 5000);
        assert_eq!((config.tfidf.ngram_min, config.tfidf.ngram_max), (1, 1));
        assert_eq!(config.tfidf.min_df, 2);
        assert!((config.tfidf.max_df - 0.95).abs() < 1e-12);
        assert!(config.tfidf.stop_words);
        assert_eq!(config.bert.max_length, 512);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_backend_parse_and_prefix() {
        assert_eq!("W2V".parse::<EmbeddingBackend>().unwrap(), EmbeddingBackend::Word2vec);
        assert_eq!("tf-idf".parse::<EmbeddingBackend>().unwrap(), EmbeddingBackend::Tfidf);
        assert_eq!(EmbeddingBackend::Bert.output_prefix(), "BERT");
        assert!("glove".parse::<EmbeddingBackend>().is_err());
    }

    #[test]
    fn test_invalid_ngram_range_rejected() {
        let mut config = EmbeddingConfig::default();
        config.tfidf.ngram_min = 2;
        config.tfidf.ngram_max = 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[tfidf]"));
    }

    #[test]
    fn test_max_df_out_of_range_rejected() {
        let mut config = EmbeddingConfig::default();
        config.tfidf.max_df = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_word2vec_backend_requires_path() {
        let config = EmbeddingConfig {
            backend: EmbeddingBackend::Word2vec,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("vectors_path"));
    }

    #[test]
    fn test_binary_inferred_from_extension() {
        let mut w2v = Word2VecConfig {
            vectors_path: Some(PathBuf::from("vectors.BIN")),
            binary: None,
        };
        assert!(w2v.is_binary());
        w2v.vectors_path = Some(PathBuf::from("glove.6B.300d.txt"));
        assert!(!w2v.is_binary());
        w2v.binary = Some(true);
        assert!(w2v.is_binary());
    }

    #[test]
    fn test_from_file_partial_toml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "backend = \"bert\"\n\n[bert]\nmodel_dir = \"models/bert\"").unwrap();
        let config = EmbeddingConfig::from_file(file.path()).unwrap();
        assert_eq!(config.backend, EmbeddingBackend::Bert);
        assert_eq!(config.bert.max_length, 512);
        assert_eq!(config.tfidf, TfidfConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_missing() {
        let err = EmbeddingConfig::from_file("/nonexistent/embedding.toml").unwrap_err();
        assert!(matches!(err, EmbeddingError::ConfigError { .. }));
    }

    #[test]
    fn test_toml_roundtrip_preserves_values() {
        let mut config = EmbeddingConfig::default();
        config.tfidf.ngram_max = 2;
        config.tfidf.max_features = 10000;
        let toml = config.to_toml_string().unwrap();
        assert_eq!(EmbeddingConfig::from_toml_str(&toml).unwrap(), config);
    }

    #[test]
    #[serial]
    fn test_env_overrides_applied() {
        clear_env();
        env::set_var(format!("{ENV_PREFIX}BACKEND"), "word2vec");
        env::set_var(format!("{ENV_PREFIX}WORD2VEC_PATH"), "/models/vectors.bin");
        env::set_var(format!("{ENV_PREFIX}TFIDF_MIN_DF"), "3");

        let config = EmbeddingConfig::default().with_env_overrides();
        clear_env();

        assert_eq!(config.backend, EmbeddingBackend::Word2vec);
        assert_eq!(
            config.word2vec.vectors_path.as_deref(),
            Some(Path::new("/models/vectors.bin"))
        );
        assert_eq!(config.tfidf.min_df, 3);
    }

    #[test]
    #[serial]
    fn test_env_overrides_ignore_unparseable() {
        clear_env();
        env::set_var(format!("{ENV_PREFIX}TFIDF_MAX_FEATURES"), "lots");
        env::set_var(format!("{ENV_PREFIX}BACKEND"), "glove");

        let config = EmbeddingConfig::default().with_env_overrides();
        clear_env();

        assert_eq!(config.tfidf.max_features, 5000);
        assert_eq!(config.backend, EmbeddingBackend::Tfidf);
    }
}
