use serde::{Deserialize, Serialize};

use super::within_level_similarities;
use crate::compare::{by_abs_effect_desc, ComparisonResult};
use crate::pairs::PairTable;
use crate::types::LevelFactor;

/// Within-level similarity of one level contrasted with another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelPairComparison {
    pub level_a: String,
    pub level_b: String,
    pub result: ComparisonResult,
}

/// Compare every unordered pair of non-empty levels, largest |d| first.
pub fn pairwise_level_comparisons(
    table: &PairTable,
    factor: LevelFactor,
) -> Vec<LevelPairComparison> {
    let levels: Vec<(&str, Vec<f64>)> = table
        .levels(factor)
        .into_iter()
        .map(|level| (level, within_level_similarities(table, factor, level)))
        .collect();

    let mut comparisons = Vec::new();
    for (i, (level_a, sims_a)) in levels.iter().enumerate() {
        for (level_b, sims_b) in &levels[i + 1..] {
            if sims_a.is_empty() || sims_b.is_empty() {
                continue;
            }
            comparisons.push(LevelPairComparison {
                level_a: level_a.to_string(),
                level_b: level_b.to_string(),
                result: ComparisonResult::between(
                    format!("{} vs {}", level_a, level_b),
                    *level_a,
                    sims_a,
                    *level_b,
                    sims_b,
                ),
            });
        }
    }

    comparisons.sort_by(|a, b| by_abs_effect_desc(a.result.abs_effect(), b.result.abs_effect()));
    comparisons
}
