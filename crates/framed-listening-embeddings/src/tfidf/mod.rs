//! TF-IDF vectorizer fitted on the analysed corpus.
//!
//! Weighting follows the usual smoothed scheme:
//! - idf(t) = ln((1 + n) / (1 + df(t))) + 1
//! - a row is raw term counts times idf, then L2-normalized
//!
//! Pruning order: `min_df` (absolute document count), `max_df` (proportion of
//! documents), then `max_features` keeps the terms with the highest corpus
//! counts. The remaining vocabulary is indexed alphabetically.

mod analysis;
mod tokenize;

pub use analysis::{
    compare_settings, default_settings_grid, top_terms, SettingComparison, TfidfSetting,
    VocabularyInfo,
};
pub use tokenize::{is_stop_word, ngrams, word_tokens};

use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::config::{EmbeddingBackend, TfidfConfig};
use crate::error::{EmbeddingError, EmbeddingResult};
use crate::provider::{EmbeddingProvider, TextEmbedding};

/// Fitted TF-IDF model.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    config: TfidfConfig,
    /// Vocabulary in alphabetical order; a term's position is its column.
    terms: Vec<String>,
    index: HashMap<String, usize>,
    idf: Vec<f64>,
    n_documents: usize,
}

impl TfidfVectorizer {
    /// Learn vocabulary and IDF weights from `corpus`.
    ///
    /// # Errors
    /// - `ConfigError` for invalid settings or when `max_df` admits fewer
    ///   documents than `min_df`
    /// - `InvalidInput` for an empty corpus
    /// - `EmptyVocabulary` when pruning removes every term
    pub fn fit(config: TfidfConfig, corpus: &[&str]) -> EmbeddingResult<Self> {
        config.validate()?;
        if corpus.is_empty() {
            return Err(EmbeddingError::InvalidInput(
                "cannot fit TF-IDF on an empty corpus".into(),
            ));
        }

        let n = corpus.len();
        let max_doc_count = config.max_df * n as f64;
        if max_doc_count < config.min_df as f64 {
            return Err(EmbeddingError::config(format!(
                "max_df={} corresponds to fewer documents than min_df={}",
                config.max_df, config.min_df
            )));
        }

        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut corpus_count: HashMap<String, usize> = HashMap::new();
        for text in corpus {
            let terms = Self::analyze(&config, text);
            let unique: HashSet<&String> = terms.iter().collect();
            for term in unique {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
            for term in terms {
                *corpus_count.entry(term).or_insert(0) += 1;
            }
        }

        let mut kept: Vec<(String, usize)> = document_frequency
            .into_iter()
            .filter(|(_, df)| *df >= config.min_df && (*df as f64) <= max_doc_count)
            .collect();

        if kept.len() > config.max_features {
            kept.sort_by(|(a, _), (b, _)| {
                corpus_count[b]
                    .cmp(&corpus_count[a])
                    .then_with(|| a.cmp(b))
            });
            kept.truncate(config.max_features);
        }

        if kept.is_empty() {
            warn!(
                target: "framed_listening_embeddings",
                documents = n,
                min_df = config.min_df,
                max_df = config.max_df,
                "No terms survive pruning"
            );
            return Err(EmbeddingError::EmptyVocabulary);
        }

        kept.sort_by(|(a, _), (b, _)| a.cmp(b));
        let idf: Vec<f64> = kept
            .iter()
            .map(|(_, df)| ((1.0 + n as f64) / (1.0 + *df as f64)).ln() + 1.0)
            .collect();
        let terms: Vec<String> = kept.into_iter().map(|(term, _)| term).collect();
        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        info!(
            target: "framed_listening_embeddings",
            documents = n,
            vocabulary = terms.len(),
            ngram_min = config.ngram_min,
            ngram_max = config.ngram_max,
            "TF-IDF vectorizer fitted"
        );

        Ok(Self {
            config,
            terms,
            index,
            idf,
            n_documents: n,
        })
    }

    fn analyze(config: &TfidfConfig, text: &str) -> Vec<String> {
        let tokens = word_tokens(text, config.lowercase);
        ngrams(&tokens, config.ngram_min, config.ngram_max, config.stop_words)
    }

    pub fn config(&self) -> &TfidfConfig {
        &self.config
    }

    /// Vocabulary terms in column order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// L2-normalized TF-IDF row for `text`. All zeros when no term is known.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut row = vec![0.0f64; self.terms.len()];
        for term in Self::analyze(&self.config, text) {
            if let Some(&col) = self.index.get(&term) {
                row[col] += 1.0;
            }
        }
        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            row.iter_mut().for_each(|v| *v /= norm);
        }
        row.into_iter().map(|v| v as f32).collect()
    }

    /// Unigrams of `text` missing from the vocabulary, first occurrence
    /// order, without duplicates. Stop words count as missing.
    pub fn out_of_vocabulary(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        word_tokens(text, self.config.lowercase)
            .into_iter()
            .filter(|t| !self.index.contains_key(t))
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }
}

impl EmbeddingProvider for TfidfVectorizer {
    fn backend(&self) -> EmbeddingBackend {
        EmbeddingBackend::Tfidf
    }

    fn dimension(&self) -> usize {
        self.terms.len()
    }

    fn embed(&self, text: &str) -> EmbeddingResult<TextEmbedding> {
        Ok(TextEmbedding {
            vector: self.transform(text),
            unmatched: self.out_of_vocabulary(text),
        })
    }
}
