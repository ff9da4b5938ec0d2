//! Vocabulary inspection and hyperparameter comparison for TF-IDF.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::TfidfVectorizer;
use crate::config::TfidfConfig;
use crate::error::EmbeddingResult;
use crate::provider::sparsity;

/// Number of terms listed at each end of the IDF ranking.
const LISTED_TERMS: usize = 20;

/// Summary of a fitted vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyInfo {
    pub vocab_size: usize,
    pub min_idf: f64,
    pub max_idf: f64,
    pub mean_idf: f64,
    /// Lowest IDF first.
    pub most_common_terms: Vec<String>,
    /// Highest IDF last.
    pub rarest_terms: Vec<String>,
}

impl TfidfVectorizer {
    pub fn vocabulary_info(&self) -> VocabularyInfo {
        let mut ranked: Vec<(&str, f64)> = self
            .terms()
            .iter()
            .map(String::as_str)
            .zip(self.idf().iter().copied())
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)));

        let idf = self.idf();
        let most_common_terms = ranked
            .iter()
            .take(LISTED_TERMS)
            .map(|(t, _)| t.to_string())
            .collect();
        let rarest_terms = ranked[ranked.len().saturating_sub(LISTED_TERMS)..]
            .iter()
            .map(|(t, _)| t.to_string())
            .collect();

        VocabularyInfo {
            vocab_size: self.vocabulary_size(),
            min_idf: idf.iter().copied().fold(f64::INFINITY, f64::min),
            max_idf: idf.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_idf: idf.iter().sum::<f64>() / idf.len() as f64,
            most_common_terms,
            rarest_terms,
        }
    }
}

/// The `n` highest-weighted terms of a TF-IDF row, zero weights excluded.
pub fn top_terms(vectorizer: &TfidfVectorizer, vector: &[f32], n: usize) -> Vec<(String, f32)> {
    let mut weighted: Vec<(usize, f32)> = vector
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, w)| *w > 0.0)
        .collect();
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    weighted
        .into_iter()
        .take(n)
        .filter_map(|(col, w)| vectorizer.terms().get(col).map(|t| (t.clone(), w)))
        .collect()
}

/// One point of a settings comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfidfSetting {
    pub max_features: usize,
    pub ngram_min: usize,
    pub ngram_max: usize,
}

impl TfidfSetting {
    pub const fn new(max_features: usize, ngram_min: usize, ngram_max: usize) -> Self {
        Self {
            max_features,
            ngram_min,
            ngram_max,
        }
    }

    fn apply(&self, base: &TfidfConfig) -> TfidfConfig {
        TfidfConfig {
            max_features: self.max_features,
            ngram_min: self.ngram_min,
            ngram_max: self.ngram_max,
            ..base.clone()
        }
    }
}

/// Unigrams at 1000 and 5000 features, uni+bigrams at 5000 and 10000.
pub fn default_settings_grid() -> Vec<TfidfSetting> {
    vec![
        TfidfSetting::new(1000, 1, 1),
        TfidfSetting::new(5000, 1, 1),
        TfidfSetting::new(5000, 1, 2),
        TfidfSetting::new(10000, 1, 2),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingComparison {
    pub setting: TfidfSetting,
    pub vocab_size: usize,
    pub sparsity: f64,
    /// Mean of the non-zero entries; `None` if every entry is zero.
    pub mean_nonzero: Option<f64>,
}

/// Fit one vectorizer per setting on `corpus`, keeping the other options of
/// `base`.
pub fn compare_settings(
    corpus: &[&str],
    base: &TfidfConfig,
    settings: &[TfidfSetting],
) -> EmbeddingResult<Vec<SettingComparison>> {
    let mut results = Vec::with_capacity(settings.len());
    for setting in settings {
        let vectorizer = TfidfVectorizer::fit(setting.apply(base), corpus)?;
        let rows: Vec<Vec<f32>> = corpus.iter().map(|t| vectorizer.transform(t)).collect();
        let nonzero: Vec<f64> = rows
            .iter()
            .flatten()
            .filter(|v| **v > 0.0)
            .map(|v| *v as f64)
            .collect();
        let comparison = SettingComparison {
            setting: *setting,
            vocab_size: vectorizer.vocabulary_size(),
            sparsity: sparsity(&rows),
            mean_nonzero: (!nonzero.is_empty())
                .then(|| nonzero.iter().sum::<f64>() / nonzero.len() as f64),
        };
        info!(
            target: "framed_listening_embeddings",
            max_features = setting.max_features,
            ngram_max = setting.ngram_max,
            vocab_size = comparison.vocab_size,
            sparsity = comparison.sparsity,
            "TF-IDF setting evaluated"
        );
        results.push(comparison);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORPUS: [&str; 4] = [
        "ocean waves at night",
        "ocean breeze and waves",
        "city lights at night",
        "ocean city",
    ];

    fn base() -> TfidfConfig {
        TfidfConfig {
            min_df: 1,
            max_df: 1.0,
            ..TfidfConfig::default()
        }
    }

    #[test]
    fn test_vocabulary_info_orders_by_idf() {
        let v = TfidfVectorizer::fit(base(), &CORPUS).unwrap();
        let info = v.vocabulary_info();
        assert_eq!(info.vocab_size, 6);
        assert_eq!(info.most_common_terms[0], "ocean");
        assert_eq!(info.rarest_terms.last().map(String::as_str), Some("lights"));
        assert!(info.min_idf < info.mean_idf && info.mean_idf < info.max_idf);
    }

    #[test]
    fn test_top_terms_skip_zero_weights() {
        let v = TfidfVectorizer::fit(base(), &CORPUS).unwrap();
        let row = v.transform("breeze over the ocean");
        let top = top_terms(&v, &row, 5);
        assert_eq!(top.len(), 2);
        // breeze is rarer, so weighted higher
        assert_eq!(top[0].0, "breeze");
        assert_eq!(top[1].0, "ocean");
    }

    #[test]
    fn test_compare_settings_grid() {
        let grid = [TfidfSetting::new(1000, 1, 1), TfidfSetting::new(1000, 1, 2)];
        let results = compare_settings(&CORPUS, &base(), &grid).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].vocab_size, 6);
        // bigrams add ocean waves, waves night, ocean breeze, breeze waves,
        // city lights, lights night and ocean city
        assert_eq!(results[1].vocab_size, 13);
        assert!(results[1].sparsity > results[0].sparsity);
        assert!(results[0].mean_nonzero.unwrap() > 0.0);
    }

    #[test]
    fn test_default_grid() {
        let grid = default_settings_grid();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[3], TfidfSetting::new(10000, 1, 2));
    }
}
