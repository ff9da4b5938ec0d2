//! Two-sample t-test, Levene's test and one-way ANOVA.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

use super::descriptive::{mean, median};

/// Student's independent two-sample t-test (pooled variance).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TTestResult {
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
    /// n1 + n2 - 2, may be zero or negative for tiny samples.
    pub df: f64,
}

impl TTestResult {
    fn undefined(df: f64) -> Self {
        Self {
            statistic: None,
            p_value: None,
            df,
        }
    }
}

/// Student's t-test with pooled variance and a two-sided p-value.
///
/// Statistic and p are `None` when df <= 0 or the standard error is zero.
pub fn student_t_test(a: &[f64], b: &[f64]) -> TTestResult {
    let (n1, n2) = (a.len(), b.len());
    let df = n1 as f64 + n2 as f64 - 2.0;
    let (Some(m1), Some(m2)) = (mean(a), mean(b)) else {
        return TTestResult::undefined(df);
    };
    if df <= 0.0 {
        return TTestResult::undefined(df);
    }

    let ss: f64 = a.iter().map(|x| (x - m1).powi(2)).sum::<f64>()
        + b.iter().map(|x| (x - m2).powi(2)).sum::<f64>();
    let pooled_var = ss / df;
    let se = (pooled_var * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
    if se == 0.0 || !se.is_finite() {
        return TTestResult::undefined(df);
    }

    let t = (m1 - m2) / se;
    let p = StudentsT::new(0.0, 1.0, df)
        .ok()
        .map(|dist| (2.0 * dist.sf(t.abs())).min(1.0));
    TTestResult {
        statistic: Some(t),
        p_value: p,
        df,
    }
}

/// Levene's test for equal variances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeveneResult {
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub df_between: f64,
    pub df_within: f64,
}

/// Levene's test centred on the group medians (Brown-Forsythe variant).
///
/// W follows F(k - 1, N - k). `None` when k < 2, a group is empty, N - k <= 0
/// or all absolute deviations equal their group means.
pub fn levene_median(groups: &[&[f64]]) -> LeveneResult {
    let k = groups.len();
    let total: usize = groups.iter().map(|g| g.len()).sum();
    let df_between = k as f64 - 1.0;
    let df_within = total as f64 - k as f64;
    let undefined = LeveneResult {
        statistic: None,
        p_value: None,
        df_between,
        df_within,
    };
    if k < 2 || df_within <= 0.0 || groups.iter().any(|g| g.is_empty()) {
        return undefined;
    }

    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| {
            let centre = median(g).unwrap_or(0.0);
            g.iter().map(|x| (x - centre).abs()).collect()
        })
        .collect();
    let group_means: Vec<f64> = deviations
        .iter()
        .map(|z| mean(z).unwrap_or(0.0))
        .collect();
    let grand_mean = deviations.iter().flatten().sum::<f64>() / total as f64;

    let between: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, zm)| z.len() as f64 * (zm - grand_mean).powi(2))
        .sum();
    let within: f64 = deviations
        .iter()
        .zip(&group_means)
        .map(|(z, zm)| z.iter().map(|x| (x - zm).powi(2)).sum::<f64>())
        .sum();
    if within == 0.0 {
        return undefined;
    }

    let w = (df_within / df_between) * between / within;
    LeveneResult {
        statistic: Some(w),
        p_value: f_survival(w, df_between, df_within),
        df_between,
        df_within,
    }
}

/// One-way ANOVA with eta-squared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnovaResult {
    pub f_statistic: Option<f64>,
    pub p_value: Option<f64>,
    pub df_between: f64,
    pub df_within: f64,
    pub ss_between: f64,
    pub ss_within: f64,
    pub ss_total: f64,
    /// SS_between / SS_total.
    pub eta_squared: Option<f64>,
}

/// One-way ANOVA over the non-empty groups.
pub fn one_way_anova(groups: &[&[f64]]) -> AnovaResult {
    let groups: Vec<&[f64]> = groups.iter().copied().filter(|g| !g.is_empty()).collect();
    let k = groups.len();
    let total: usize = groups.iter().map(|g| g.len()).sum();
    let df_between = k as f64 - 1.0;
    let df_within = total as f64 - k as f64;

    let grand_mean = if total > 0 {
        groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total as f64
    } else {
        0.0
    };
    let ss_between: f64 = groups
        .iter()
        .map(|g| g.len() as f64 * (mean(g).unwrap_or(grand_mean) - grand_mean).powi(2))
        .sum();
    let ss_total: f64 = groups
        .iter()
        .flat_map(|g| g.iter())
        .map(|x| (x - grand_mean).powi(2))
        .sum();
    let ss_within = (ss_total - ss_between).max(0.0);

    let eta_squared = (ss_total > 0.0).then(|| ss_between / ss_total);
    let f_statistic = if df_between > 0.0 && df_within > 0.0 && ss_within > 0.0 {
        Some((ss_between / df_between) / (ss_within / df_within))
    } else {
        None
    };
    let p_value = f_statistic.and_then(|f| f_survival(f, df_between, df_within));

    AnovaResult {
        f_statistic,
        p_value,
        df_between,
        df_within,
        ss_between,
        ss_within,
        ss_total,
        eta_squared,
    }
}

fn f_survival(f: f64, d1: f64, d2: f64) -> Option<f64> {
    FisherSnedecor::new(d1, d2).ok().map(|dist| dist.sf(f))
}
