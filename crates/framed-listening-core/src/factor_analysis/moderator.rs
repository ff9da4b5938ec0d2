use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{clip_driven_similarities, context_driven_similarities};
use crate::compare::ComparisonResult;
use crate::pairs::PairTable;
use crate::types::LevelFactor;

/// Clip-driven vs context-driven similarity inside one level.
///
/// Group A is clip-driven (same clip, different context), group B is
/// context-driven (different clip, same context).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelModerator {
    pub level: String,
    pub result: ComparisonResult,
}

impl LevelModerator {
    pub fn is_clip_dominant(&self) -> bool {
        self.result.significance.is_significant() && self.result.difference.is_some_and(|d| d > 0.0)
    }

    pub fn is_context_dominant(&self) -> bool {
        self.result.significance.is_significant() && self.result.difference.is_some_and(|d| d < 0.0)
    }
}

/// Which levels favour clip or context, and how strongly overall.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeratorSummary {
    pub clip_dominant: Vec<String>,
    pub context_dominant: Vec<String>,
    pub no_difference: Vec<String>,
    /// Mean |d| over levels with a defined d.
    pub mean_abs_d: Option<f64>,
    pub min_d: Option<f64>,
    pub max_d: Option<f64>,
}

impl ModeratorSummary {
    fn from_levels(levels: &[LevelModerator]) -> Self {
        let mut summary = ModeratorSummary::default();
        for m in levels {
            if m.is_clip_dominant() {
                summary.clip_dominant.push(m.level.clone());
            } else if m.is_context_dominant() {
                summary.context_dominant.push(m.level.clone());
            } else if !m.result.significance.is_significant() {
                summary.no_difference.push(m.level.clone());
            }
        }
        let ds: Vec<f64> = levels.iter().filter_map(|m| m.result.cohens_d).collect();
        if !ds.is_empty() {
            summary.mean_abs_d = Some(ds.iter().map(|d| d.abs()).sum::<f64>() / ds.len() as f64);
            summary.min_d = ds.iter().copied().reduce(f64::min);
            summary.max_d = ds.iter().copied().reduce(f64::max);
        }
        summary
    }
}

/// Moderator analysis of a factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeratorAnalysis {
    pub factor: LevelFactor,
    /// Levels where both groups are non-empty, in first-appearance order.
    pub levels: Vec<LevelModerator>,
    pub summary: ModeratorSummary,
}

/// Per level, t-test clip-driven against context-driven similarity.
pub fn clip_vs_context_by_level(table: &PairTable, factor: LevelFactor) -> ModeratorAnalysis {
    let mut levels = Vec::new();
    for level in table.levels(factor) {
        let clip = clip_driven_similarities(table, factor, level);
        let context = context_driven_similarities(table, factor, level);
        if clip.is_empty() || context.is_empty() {
            debug!(
                target: "framed_listening_core",
                factor = %factor,
                level,
                n_clip = clip.len(),
                n_context = context.len(),
                "Skipping level without both groups"
            );
            continue;
        }
        levels.push(LevelModerator {
            level: level.to_string(),
            result: ComparisonResult::between(
                format!("Clip vs Context ({})", level),
                "Clip-driven",
                &clip,
                "Context-driven",
                &context,
            ),
        });
    }
    let summary = ModeratorSummary::from_levels(&levels);
    ModeratorAnalysis {
        factor,
        levels,
        summary,
    }
}
