use serde::{Deserialize, Serialize};

use super::within::{LevelStats, WithinFactorStats};
use super::{clip_driven_similarities, context_driven_similarities};
use crate::compare::GroupStats;
use crate::pairs::PairTable;
use crate::stats::{
    coefficient_of_variation, levene_median, student_t_test, LeveneResult, Significance,
    TTestResult,
};
use crate::types::LevelFactor;

/// Variability of clip-driven vs context-driven similarity inside one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConsistency {
    pub level: String,
    pub clip: GroupStats,
    pub clip_cv: Option<f64>,
    pub context: GroupStats,
    pub context_cv: Option<f64>,
    /// clip_cv - context_cv.
    pub cv_difference: Option<f64>,
    pub levene: LeveneResult,
    pub significance: Significance,
}

/// Levene's test of clip-driven against context-driven similarity per level.
pub fn consistency_by_level(table: &PairTable, factor: LevelFactor) -> Vec<LevelConsistency> {
    let mut results = Vec::new();
    for level in table.levels(factor) {
        let clip = clip_driven_similarities(table, factor, level);
        let context = context_driven_similarities(table, factor, level);
        if clip.is_empty() || context.is_empty() {
            continue;
        }
        let clip_stats = GroupStats::of("Clip-driven", &clip);
        let context_stats = GroupStats::of("Context-driven", &context);
        let clip_cv = clip_stats
            .mean
            .and_then(|m| coefficient_of_variation(clip_stats.sd, m));
        let context_cv = context_stats
            .mean
            .and_then(|m| coefficient_of_variation(context_stats.sd, m));
        let levene = levene_median(&[&clip, &context]);
        results.push(LevelConsistency {
            level: level.to_string(),
            clip: clip_stats,
            clip_cv,
            context: context_stats,
            context_cv,
            cv_difference: clip_cv.zip(context_cv).map(|(a, b)| a - b),
            levene,
            significance: Significance::from_p(levene.p_value),
        });
    }
    results
}

/// Consistency overview of one factor's levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorConsistency {
    pub factor: LevelFactor,
    pub most_consistent: Option<LevelStats>,
    pub least_consistent: Option<LevelStats>,
    /// max CV - min CV over levels with a defined CV.
    pub cv_range: Option<f64>,
    pub mean_cv: Option<f64>,
}

impl FactorConsistency {
    pub fn of(within: &WithinFactorStats) -> Self {
        let defined: Vec<&LevelStats> = within
            .by_cv_asc()
            .into_iter()
            .filter(|l| l.cv.is_some())
            .collect();
        let cvs = within.cvs();
        let mean_cv = (!cvs.is_empty()).then(|| cvs.iter().sum::<f64>() / cvs.len() as f64);
        let cv_range = match (defined.first(), defined.last()) {
            (Some(lo), Some(hi)) => lo.cv.zip(hi.cv).map(|(lo, hi)| hi - lo),
            _ => None,
        };
        Self {
            factor: within.factor,
            most_consistent: defined.first().map(|l| (*l).clone()),
            least_consistent: defined.last().map(|l| (*l).clone()),
            cv_range,
            mean_cv,
        }
    }
}

/// Genre consistency against context consistency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorConsistencyComparison {
    pub genre: FactorConsistency,
    pub context: FactorConsistency,
    /// |mean genre CV - mean context CV|.
    pub mean_cv_difference: Option<f64>,
    /// t-test of genre CVs against context CVs, when both have two or more.
    pub t_test: Option<TTestResult>,
    pub significance: Significance,
    /// Factor with the lower mean CV when the t-test is significant.
    pub more_consistent: Option<LevelFactor>,
}

pub fn compare_factor_consistency(
    genre: &WithinFactorStats,
    context: &WithinFactorStats,
) -> FactorConsistencyComparison {
    let genre_summary = FactorConsistency::of(genre);
    let context_summary = FactorConsistency::of(context);
    let mean_cv_difference = genre_summary
        .mean_cv
        .zip(context_summary.mean_cv)
        .map(|(g, c)| (g - c).abs());

    let (genre_cvs, context_cvs) = (genre.cvs(), context.cvs());
    let t_test = (genre_cvs.len() >= 2 && context_cvs.len() >= 2)
        .then(|| student_t_test(&genre_cvs, &context_cvs));
    let significance = Significance::from_p(t_test.and_then(|t| t.p_value));

    let more_consistent = if significance.is_significant() {
        match (genre_summary.mean_cv, context_summary.mean_cv) {
            (Some(g), Some(c)) if g < c => Some(LevelFactor::Genre),
            (Some(_), Some(_)) => Some(LevelFactor::Context),
            _ => None,
        }
    } else {
        None
    };

    FactorConsistencyComparison {
        genre: genre_summary,
        context: context_summary,
        mean_cv_difference,
        t_test,
        significance,
        more_consistent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::SimilarityMatrix;
    use crate::types::DocumentLabels;

    fn level(level: &str, cv: Option<f64>) -> LevelStats {
        LevelStats {
            level: level.to_string(),
            n: 3,
            mean: 0.5,
            sd: cv.map(|c| c * 0.5),
            cv,
        }
    }

    fn within(factor: LevelFactor, levels: Vec<LevelStats>) -> WithinFactorStats {
        WithinFactorStats { factor, levels }
    }

    #[test]
    fn test_factor_consistency_ignores_undefined_cv() {
        let stats = within(
            LevelFactor::Genre,
            vec![level("J", Some(0.3)), level("R", None), level("C", Some(0.1))],
        );
        let summary = FactorConsistency::of(&stats);
        assert_eq!(summary.most_consistent.unwrap().level, "C");
        assert_eq!(summary.least_consistent.unwrap().level, "J");
        assert!((summary.cv_range.unwrap() - 0.2).abs() < 1e-12);
        assert!((summary.mean_cv.unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_compare_factor_consistency() {
        let genre = within(
            LevelFactor::Genre,
            vec![level("J", Some(0.10)), level("R", Some(0.11)), level("C", Some(0.12))],
        );
        let context = within(
            LevelFactor::Context,
            vec![level("calm", Some(0.40)), level("party", Some(0.42)), level("sad", Some(0.41))],
        );
        let cmp = compare_factor_consistency(&genre, &context);
        assert!(cmp.t_test.is_some());
        assert!(cmp.significance.is_significant());
        assert_eq!(cmp.more_consistent, Some(LevelFactor::Genre));
        assert!((cmp.mean_cv_difference.unwrap() - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_no_t_test_with_single_level() {
        let genre = within(LevelFactor::Genre, vec![level("J", Some(0.1))]);
        let context = within(
            LevelFactor::Context,
            vec![level("calm", Some(0.4)), level("party", Some(0.5))],
        );
        let cmp = compare_factor_consistency(&genre, &context);
        assert!(cmp.t_test.is_none());
        assert_eq!(cmp.significance, Significance::NotSignificant);
        assert_eq!(cmp.more_consistent, None);
    }

    #[test]
    fn test_consistency_by_level_runs_levene() {
        let mut labels = Vec::new();
        for clip in ["A", "B", "C"] {
            for context in ["calm", "party"] {
                labels.push(DocumentLabels::new(clip, context, "J"));
            }
        }
        let n = labels.len();
        let rows = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            1.0
                        } else if labels[i].clip == labels[j].clip {
                            0.5 + 0.1 * (i.min(j) % 3) as f64
                        } else {
                            0.3 + 0.01 * ((i + j) % 3) as f64
                        }
                    })
                    .collect()
            })
            .collect();
        let matrix = SimilarityMatrix::from_rows(rows).unwrap();
        let table = PairTable::from_labels(&matrix, labels).unwrap();

        let results = consistency_by_level(&table, LevelFactor::Context);
        assert_eq!(results.len(), 2);
        let calm = &results[0];
        assert_eq!(calm.level, "calm");
        assert_eq!(calm.clip.n, 3);
        assert_eq!(calm.context.n, 3);
        assert!(calm.clip_cv.is_some() && calm.context_cv.is_some());
        assert!(calm.cv_difference.unwrap() > 0.0);
        assert_eq!(calm.levene.df_within, 4.0);
    }
}
