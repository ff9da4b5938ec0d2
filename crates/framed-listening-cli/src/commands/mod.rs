//! CLI command handlers
//!
//! Each handler returns a process exit code: 0 on success, 1 on error.

pub mod analyze;
pub mod classify;
pub mod compare_tfidf;
pub mod vocab;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use framed_listening_core::{AppConfig, DocumentSet, PairTable, SimilarityMatrix};
use framed_listening_embeddings::{
    build_provider, CorpusEmbedding, EmbeddingBackend, EmbeddingConfig,
};
use tracing::{error, info};

/// Configuration shared by every command.
#[derive(Debug, Clone, Default)]
pub struct CliContext {
    pub app: AppConfig,
    /// File the embedding sections are read from, if any.
    pub config_path: Option<PathBuf>,
}

impl CliContext {
    /// Embedding configuration from the config file (or defaults), then
    /// `FRAMED_LISTENING_EMBEDDING_*` variables, then `backend` if given.
    pub fn embedding_config(&self, backend: Option<EmbeddingBackend>) -> Result<EmbeddingConfig> {
        let config = match &self.config_path {
            Some(path) => EmbeddingConfig::from_file(path)
                .with_context(|| format!("reading embedding settings from {}", path.display()))?,
            None => EmbeddingConfig::default(),
        };
        let mut config = config.with_env_overrides();
        if let Some(backend) = backend {
            config.backend = backend;
        }
        config.validate().context("invalid embedding configuration")?;
        Ok(config)
    }
}

/// Documents and backend selection.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Documents JSONL file, one object per line with id, clip, context,
    /// genre and text
    #[arg(short, long)]
    pub documents: PathBuf,

    /// Embedding backend: tfidf, word2vec or bert
    #[arg(short, long)]
    pub backend: Option<EmbeddingBackend>,
}

pub fn load_documents(path: &Path) -> Result<DocumentSet> {
    DocumentSet::from_jsonl_file(path)
        .with_context(|| format!("loading documents from {}", path.display()))
}

/// Pair table for `documents` under the configured backend.
pub struct Embedded {
    pub backend: EmbeddingBackend,
    pub corpus: CorpusEmbedding,
    pub table: PairTable,
}

/// Embed every document, build the similarity matrix and label all pairs.
pub fn embed_and_classify(documents: &DocumentSet, config: &EmbeddingConfig) -> Result<Embedded> {
    let texts = documents.texts();
    let provider = build_provider(config, &texts)
        .with_context(|| format!("preparing the {} backend", config.backend))?;
    let corpus = provider
        .embed_corpus(&texts)
        .context("embedding documents")?;
    let matrix =
        SimilarityMatrix::from_embeddings(&corpus.vectors).context("building similarity matrix")?;
    let table = PairTable::build(&matrix, documents).context("classifying document pairs")?;

    info!(
        target: "framed_listening_cli",
        backend = %config.backend,
        documents = documents.len(),
        pairs = table.len(),
        "Pairs extracted"
    );

    Ok(Embedded {
        backend: config.backend,
        corpus,
        table,
    })
}

/// Log and print a failed command, returning exit code 1.
pub fn fail(command: &str, err: &anyhow::Error) -> i32 {
    error!(target: "framed_listening_cli", error = %format!("{:#}", err), "{} failed", command);
    eprintln!("Error: {:#}", err);
    1
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_config_backend_override() {
        let ctx = CliContext::default();
        let config = ctx.embedding_config(Some(EmbeddingBackend::Tfidf)).unwrap();
        assert_eq!(config.backend, EmbeddingBackend::Tfidf);
    }

    #[test]
    fn test_embedding_config_reads_shared_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "backend = \"tfidf\"\n\n[tfidf]\nmin_df = 1\n\n[output]\nprefix = \"RUN\"\n",
        )
        .unwrap();
        let ctx = CliContext {
            app: AppConfig::default(),
            config_path: Some(path),
        };
        let config = ctx.embedding_config(None).unwrap();
        assert_eq!(config.tfidf.min_df, 1);
    }

    #[test]
    fn test_word2vec_without_vectors_is_rejected() {
        let ctx = CliContext::default();
        assert!(ctx.embedding_config(Some(EmbeddingBackend::Word2vec)).is_err());
    }

    #[test]
    fn test_embed_and_classify_counts_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let documents = load_documents(&test_support::write_corpus(dir.path())).unwrap();
        let config = CliContext::default().embedding_config(None).unwrap();
        let embedded = embed_and_classify(&documents, &config).unwrap();
        let n = documents.len();
        assert_eq!(n, 12);
        assert_eq!(embedded.table.len(), n * (n - 1) / 2);
        assert_eq!(embedded.corpus.len(), n);
    }

    #[test]
    fn test_missing_documents_file() {
        let err = load_documents(Path::new("/nonexistent/docs.jsonl")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/docs.jsonl"));
    }
}
