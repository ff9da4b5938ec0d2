use serde::{Deserialize, Serialize};
use tracing::warn;

use super::result::ComparisonResult;
use crate::pairs::PairTable;
use crate::types::Condition;

/// Smallest group size for which a named-condition t-test is attempted.
pub const MIN_CONDITION_GROUP: usize = 2;

/// Outcome of a named-condition comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConditionComparison {
    Compared(ComparisonResult),
    InsufficientData {
        comparison: String,
        n1: usize,
        n2: usize,
    },
}

impl ConditionComparison {
    pub fn result(&self) -> Option<&ComparisonResult> {
        match self {
            ConditionComparison::Compared(r) => Some(r),
            ConditionComparison::InsufficientData { .. } => None,
        }
    }

    pub fn comparison(&self) -> &str {
        match self {
            ConditionComparison::Compared(r) => &r.comparison,
            ConditionComparison::InsufficientData { comparison, .. } => comparison,
        }
    }
}

/// Compare the similarities of two conditions directly.
pub fn compare_conditions(
    table: &PairTable,
    first: Condition,
    second: Condition,
    first_label: &str,
    second_label: &str,
) -> ConditionComparison {
    compare_conditions_with_min(
        table,
        first,
        second,
        first_label,
        second_label,
        MIN_CONDITION_GROUP,
    )
}

/// As [`compare_conditions`] with a custom minimum group size.
pub fn compare_conditions_with_min(
    table: &PairTable,
    first: Condition,
    second: Condition,
    first_label: &str,
    second_label: &str,
    min_group: usize,
) -> ConditionComparison {
    let a = table.similarities_for(first);
    let b = table.similarities_for(second);
    let comparison = format!("{} vs {}", first_label, second_label);

    if a.len() < min_group || b.len() < min_group {
        warn!(
            target: "framed_listening_core",
            comparison = %comparison,
            n1 = a.len(),
            n2 = b.len(),
            "Insufficient data for comparison"
        );
        return ConditionComparison::InsufficientData {
            comparison,
            n1: a.len(),
            n2: b.len(),
        };
    }

    ConditionComparison::Compared(ComparisonResult::between(
        comparison,
        first_label,
        &a,
        second_label,
        &b,
    ))
}

/// The two headline condition contrasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedComparisons {
    /// Same clip in a different context vs a different clip in the same context.
    pub primary: ConditionComparison,
    /// Different clip and context, same genre vs different genre.
    pub genre: ConditionComparison,
}

pub fn run_combined_comparisons(table: &PairTable, min_group: usize) -> CombinedComparisons {
    CombinedComparisons {
        primary: compare_conditions_with_min(
            table,
            Condition::SameClipDiffContext,
            Condition::DiffClipSameContext,
            "Same Clip, Different Context",
            "Different Clip, Same Context",
            min_group,
        ),
        genre: compare_conditions_with_min(
            table,
            Condition::DiffClipDiffContextSameGenre,
            Condition::DiffClipDiffContextDiffGenre,
            "Both Different, Same Genre",
            "Both Different, Different Genre",
            min_group,
        ),
    }
}
