//! Per-level analysis of a [`LevelFactor`] (context or genre).
//!
//! For each level: within-level similarity and its consistency, pairwise
//! level contrasts, and whether clip or context drives similarity inside
//! that level.

mod consistency;
mod moderator;
mod pairwise;
mod within;

pub use consistency::{
    compare_factor_consistency, consistency_by_level, FactorConsistency,
    FactorConsistencyComparison, LevelConsistency,
};
pub use moderator::{clip_vs_context_by_level, LevelModerator, ModeratorAnalysis, ModeratorSummary};
pub use pairwise::{pairwise_level_comparisons, LevelPairComparison};
pub use within::{within_level_stats, LevelStats, WithinFactorStats};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pairs::PairTable;
use crate::types::{Condition, LevelFactor};

/// All per-level analyses of one factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAnalysis {
    pub factor: LevelFactor,
    pub within: WithinFactorStats,
    pub pairwise: Vec<LevelPairComparison>,
    pub moderator: ModeratorAnalysis,
    pub consistency: Vec<LevelConsistency>,
}

pub fn run_factor_analysis(table: &PairTable, factor: LevelFactor) -> FactorAnalysis {
    let within = within_level_stats(table, factor);
    let pairwise = pairwise_level_comparisons(table, factor);
    let moderator = clip_vs_context_by_level(table, factor);
    let consistency = consistency_by_level(table, factor);

    info!(
        target: "framed_listening_core",
        factor = %factor,
        levels = within.levels.len(),
        level_pairs = pairwise.len(),
        "Factor analysis complete"
    );

    FactorAnalysis {
        factor,
        within,
        pairwise,
        moderator,
        consistency,
    }
}

/// Within-level similarities: the factor's within filter with both
/// documents at `level`.
pub(crate) fn within_level_similarities(
    table: &PairTable,
    factor: LevelFactor,
    level: &str,
) -> Vec<f64> {
    table.similarities_where(|r| {
        factor.is_within(r)
            && table.level_of(factor, r.doc_i) == level
            && table.level_of(factor, r.doc_j) == level
    })
}

/// Same clip heard in different contexts, matched to `level` with the
/// factor's clip-driven rule.
pub(crate) fn clip_driven_similarities(
    table: &PairTable,
    factor: LevelFactor,
    level: &str,
) -> Vec<f64> {
    let rule = factor.clip_driven_match();
    table.similarities_where(|r| {
        r.condition == Condition::SameClipDiffContext
            && rule.matches(
                table.level_of(factor, r.doc_i),
                table.level_of(factor, r.doc_j),
                level,
            )
    })
}

/// Different clips heard in the same context, both documents at `level`.
pub(crate) fn context_driven_similarities(
    table: &PairTable,
    factor: LevelFactor,
    level: &str,
) -> Vec<f64> {
    let rule = factor.context_driven_match();
    table.similarities_where(|r| {
        r.condition == Condition::DiffClipSameContext
            && rule.matches(
                table.level_of(factor, r.doc_i),
                table.level_of(factor, r.doc_j),
                level,
            )
    })
}
