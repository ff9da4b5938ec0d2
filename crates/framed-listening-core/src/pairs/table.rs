use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::PairRecord;
use crate::error::{CoreError, CoreResult};
use crate::similarity::SimilarityMatrix;
use crate::stats::SampleSummary;
use crate::types::{Condition, DocumentLabels, DocumentSet, LevelFactor};

/// Per-condition descriptive statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSummary {
    pub condition: Condition,
    #[serde(flatten)]
    pub summary: SampleSummary,
}

/// All labeled pairs of a corpus, plus the labels of each document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairTable {
    records: Vec<PairRecord>,
    labels: Vec<DocumentLabels>,
}

impl PairTable {
    /// Classify every unordered pair of `documents`.
    ///
    /// Fails fast when the matrix size does not match the document count.
    pub fn build(matrix: &SimilarityMatrix, documents: &DocumentSet) -> CoreResult<Self> {
        Self::from_labels(matrix, documents.labels())
    }

    /// Classify every unordered pair given the labels directly.
    pub fn from_labels(matrix: &SimilarityMatrix, labels: Vec<DocumentLabels>) -> CoreResult<Self> {
        let n = labels.len();
        if matrix.len() != n {
            return Err(CoreError::MetadataMismatch {
                documents: n,
                matrix: matrix.len(),
            });
        }
        for (index, l) in labels.iter().enumerate() {
            if l.clip.is_empty() || l.context.is_empty() || l.genre.is_empty() {
                return Err(CoreError::validation(
                    "labels",
                    format!("document {} has an empty label", index),
                ));
            }
        }

        let mut records = Vec::with_capacity(matrix.pair_count());
        for i in 0..n {
            for j in (i + 1)..n {
                records.push(PairRecord::classify(
                    i,
                    j,
                    matrix.get(i, j),
                    &labels[i],
                    &labels[j],
                ));
            }
        }

        info!(
            target: "framed_listening_core",
            documents = n,
            pairs = records.len(),
            "Extracted document pairs"
        );
        let table = Self { records, labels };
        for (condition, count) in table.condition_counts() {
            debug!(target: "framed_listening_core", %condition, count, "Condition count");
        }
        Ok(table)
    }

    pub fn records(&self) -> &[PairRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn document_count(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self, doc: usize) -> &DocumentLabels {
        &self.labels[doc]
    }

    /// Factor label of document `doc`.
    pub fn level_of(&self, factor: LevelFactor, doc: usize) -> &str {
        self.labels[doc].level(factor)
    }

    /// Distinct levels of a factor, in order of first appearance.
    pub fn levels(&self, factor: LevelFactor) -> Vec<&str> {
        let mut levels: Vec<&str> = Vec::new();
        for l in &self.labels {
            let level = l.level(factor);
            if !levels.contains(&level) {
                levels.push(level);
            }
        }
        levels
    }

    /// Similarities of all pairs matching `predicate`, in table order.
    pub fn similarities_where<F>(&self, predicate: F) -> Vec<f64>
    where
        F: Fn(&PairRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|r| predicate(r))
            .map(|r| r.similarity)
            .collect()
    }

    pub fn similarities_for(&self, condition: Condition) -> Vec<f64> {
        self.similarities_where(|r| r.condition == condition)
    }

    /// Pair counts per condition in canonical order, zeros included.
    pub fn condition_counts(&self) -> Vec<(Condition, usize)> {
        Condition::ALL
            .into_iter()
            .map(|c| (c, self.records.iter().filter(|r| r.condition == c).count()))
            .collect()
    }

    /// Descriptive statistics per condition in canonical order.
    pub fn condition_summary(&self) -> Vec<ConditionSummary> {
        Condition::ALL
            .into_iter()
            .map(|condition| ConditionSummary {
                condition,
                summary: SampleSummary::of(&self.similarities_for(condition)),
            })
            .collect()
    }
}
