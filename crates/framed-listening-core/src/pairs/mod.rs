//! Pairwise condition classification.
//!
//! Turns an n x n similarity matrix plus per-document labels into one
//! [`PairRecord`] per unordered pair (i < j), emitted in row-major order.

mod table;

pub use table::{ConditionSummary, PairTable};

use serde::{Deserialize, Serialize};

use crate::types::{Condition, DocumentLabels};

/// One unordered document pair with its similarity and condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairRecord {
    pub doc_i: usize,
    pub doc_j: usize,
    pub similarity: f64,
    pub same_clip: bool,
    pub same_context: bool,
    pub same_genre: bool,
    pub condition: Condition,
}

impl PairRecord {
    /// Label a pair from the two documents' metadata.
    pub fn classify(
        doc_i: usize,
        doc_j: usize,
        similarity: f64,
        labels_i: &DocumentLabels,
        labels_j: &DocumentLabels,
    ) -> Self {
        let same_clip = labels_i.clip == labels_j.clip;
        let same_context = labels_i.context == labels_j.context;
        let same_genre = labels_i.genre == labels_j.genre;
        Self {
            doc_i,
            doc_j,
            similarity,
            same_clip,
            same_context,
            same_genre,
            condition: Condition::classify(same_clip, same_context, same_genre),
        }
    }
}
