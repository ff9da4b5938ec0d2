use serde::{Deserialize, Serialize};

use crate::stats::{cohens_d, mean, sample_std, student_t_test, Significance, TTestResult};

/// Descriptive statistics of one side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub label: String,
    pub n: usize,
    pub mean: Option<f64>,
    pub sd: Option<f64>,
}

impl GroupStats {
    pub fn of(label: impl Into<String>, values: &[f64]) -> Self {
        Self {
            label: label.into(),
            n: values.len(),
            mean: mean(values),
            sd: sample_std(values),
        }
    }
}

/// Independent two-sample comparison: t-test, Cohen's d and significance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub comparison: String,
    pub group_a: GroupStats,
    pub group_b: GroupStats,
    /// mean_a - mean_b.
    pub difference: Option<f64>,
    pub t_test: TTestResult,
    pub cohens_d: Option<f64>,
    pub significance: Significance,
}

impl ComparisonResult {
    /// Compare sample `a` against sample `b`.
    pub fn between(
        comparison: impl Into<String>,
        label_a: impl Into<String>,
        a: &[f64],
        label_b: impl Into<String>,
        b: &[f64],
    ) -> Self {
        let group_a = GroupStats::of(label_a, a);
        let group_b = GroupStats::of(label_b, b);
        let difference = match (group_a.mean, group_b.mean) {
            (Some(ma), Some(mb)) => Some(ma - mb),
            _ => None,
        };
        let t_test = student_t_test(a, b);
        Self {
            comparison: comparison.into(),
            group_a,
            group_b,
            difference,
            t_test,
            cohens_d: cohens_d(a, b),
            significance: Significance::from_p(t_test.p_value),
        }
    }

    /// |d|, used for ranking. Undefined d ranks last.
    pub fn abs_effect(&self) -> Option<f64> {
        self.cohens_d.map(f64::abs)
    }
}

/// Order by |d| descending with undefined effects last.
pub(crate) fn by_abs_effect_desc(a: Option<f64>, b: Option<f64>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
