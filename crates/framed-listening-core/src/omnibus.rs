//! One-way ANOVA of similarity across pair conditions.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pairs::{ConditionSummary, PairTable};
use crate::stats::{one_way_anova, AnovaResult, SampleSummary, Significance};
use crate::types::Condition;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmnibusResult {
    pub anova: AnovaResult,
    pub significance: Significance,
    /// Number of non-empty conditions entering the test.
    pub n_conditions: usize,
    pub n_pairs: usize,
    pub groups: Vec<ConditionSummary>,
}

/// ANOVA over every condition present in the table.
pub fn run_omnibus_test(table: &PairTable) -> OmnibusResult {
    let samples: Vec<(Condition, Vec<f64>)> = Condition::ALL
        .into_iter()
        .map(|c| (c, table.similarities_for(c)))
        .filter(|(_, sims)| !sims.is_empty())
        .collect();
    let slices: Vec<&[f64]> = samples.iter().map(|(_, s)| s.as_slice()).collect();
    let anova = one_way_anova(&slices);

    info!(
        target: "framed_listening_core",
        conditions = samples.len(),
        f = anova.f_statistic.unwrap_or(f64::NAN),
        eta_squared = anova.eta_squared.unwrap_or(f64::NAN),
        "Omnibus ANOVA complete"
    );

    OmnibusResult {
        significance: Significance::from_p(anova.p_value),
        n_conditions: samples.len(),
        n_pairs: table.len(),
        groups: samples
            .iter()
            .map(|(condition, sims)| ConditionSummary {
                condition: *condition,
                summary: SampleSummary::of(sims),
            })
            .collect(),
        anova,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::SimilarityMatrix;
    use crate::types::DocumentLabels;

    #[test]
    fn test_anova_uses_present_conditions_only() {
        // no pair shares clip and context, and every genre differs across clips
        let labels = vec![
            DocumentLabels::new("A", "x", "g1"),
            DocumentLabels::new("A", "y", "g1"),
            DocumentLabels::new("B", "x", "g2"),
            DocumentLabels::new("B", "y", "g2"),
            DocumentLabels::new("C", "x", "g3"),
            DocumentLabels::new("C", "y", "g3"),
        ];
        let n = labels.len();
        let rows = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            1.0
                        } else if labels[i].clip == labels[j].clip {
                            0.8 + 0.01 * (i + j) as f64
                        } else {
                            0.2 + 0.01 * (i + j) as f64
                        }
                    })
                    .collect()
            })
            .collect();
        let matrix = SimilarityMatrix::from_rows(rows).unwrap();
        let table = PairTable::from_labels(&matrix, labels).unwrap();

        let result = run_omnibus_test(&table);
        assert_eq!(result.n_conditions, 3);
        assert_eq!(result.n_pairs, 15);
        assert_eq!(result.anova.df_between, 2.0);
        assert_eq!(result.anova.df_within, 12.0);
        let eta = result.anova.eta_squared.unwrap();
        assert!(eta > 0.5 && eta <= 1.0);
        assert!(result.significance.is_significant());
        let conditions: Vec<Condition> = result.groups.iter().map(|g| g.condition).collect();
        assert_eq!(
            conditions,
            vec![
                Condition::SameClipDiffContext,
                Condition::DiffClipSameContext,
                Condition::DiffClipDiffContextDiffGenre,
            ]
        );
    }
}
