//! Two-group comparisons over the pair table.

mod binary;
mod conditions;
mod result;

pub use binary::{compare_binary, run_binary_comparisons, BinaryComparisons, BinaryEffect};
pub use conditions::{
    compare_conditions, compare_conditions_with_min, run_combined_comparisons,
    CombinedComparisons, ConditionComparison, MIN_CONDITION_GROUP,
};
pub use result::{ComparisonResult, GroupStats};

pub(crate) use result::by_abs_effect_desc;
