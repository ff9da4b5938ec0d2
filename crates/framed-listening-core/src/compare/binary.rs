use serde::{Deserialize, Serialize};
use tracing::info;

use super::result::{by_abs_effect_desc, ComparisonResult};
use crate::pairs::PairTable;
use crate::types::BinaryFactor;

/// Compare pairs sharing `factor` against pairs that do not.
pub fn compare_binary(table: &PairTable, factor: BinaryFactor) -> ComparisonResult {
    let same = table.similarities_where(|r| factor.is_same(r));
    let different = table.similarities_where(|r| !factor.is_same(r));
    ComparisonResult::between(
        factor.comparison_label(),
        format!("Same {}", factor.label()),
        &same,
        format!("Different {}", factor.label()),
        &different,
    )
}

/// Binary comparison for a single factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryEffect {
    pub factor: BinaryFactor,
    pub result: ComparisonResult,
}

/// Binary comparisons for clip, context and genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryComparisons {
    /// In factor order: clip, context, genre.
    pub effects: Vec<BinaryEffect>,
}

impl BinaryComparisons {
    /// Effects ordered by |d| descending, undefined d last.
    pub fn ranked_by_effect(&self) -> Vec<&BinaryEffect> {
        let mut ranked: Vec<&BinaryEffect> = self.effects.iter().collect();
        ranked.sort_by(|a, b| by_abs_effect_desc(a.result.abs_effect(), b.result.abs_effect()));
        ranked
    }

    /// Factor with the largest defined |d|.
    pub fn largest_effect(&self) -> Option<&BinaryEffect> {
        self.ranked_by_effect()
            .into_iter()
            .next()
            .filter(|e| e.result.cohens_d.is_some())
    }

    pub fn get(&self, factor: BinaryFactor) -> Option<&ComparisonResult> {
        self.effects
            .iter()
            .find(|e| e.factor == factor)
            .map(|e| &e.result)
    }
}

pub fn run_binary_comparisons(table: &PairTable) -> BinaryComparisons {
    let effects: Vec<BinaryEffect> = BinaryFactor::ALL
        .into_iter()
        .map(|factor| BinaryEffect {
            factor,
            result: compare_binary(table, factor),
        })
        .collect();
    let comparisons = BinaryComparisons { effects };
    if let Some(top) = comparisons.largest_effect() {
        info!(
            target: "framed_listening_core",
            factor = %top.factor,
            d = top.result.cohens_d.unwrap_or_default(),
            "Largest binary effect"
        );
    }
    comparisons
}
