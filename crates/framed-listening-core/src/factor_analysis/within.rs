use serde::{Deserialize, Serialize};
use tracing::debug;

use super::within_level_similarities;
use crate::pairs::PairTable;
use crate::stats::{coefficient_of_variation, sample_std};
use crate::types::LevelFactor;

/// Within-level similarity of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub level: String,
    pub n: usize,
    pub mean: f64,
    pub sd: Option<f64>,
    /// Lower is more consistent.
    pub cv: Option<f64>,
}

/// Within-level statistics for every non-empty level of a factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithinFactorStats {
    pub factor: LevelFactor,
    /// In order of first appearance.
    pub levels: Vec<LevelStats>,
}

impl WithinFactorStats {
    /// Most convergent level first.
    pub fn by_mean_desc(&self) -> Vec<&LevelStats> {
        let mut ranked: Vec<&LevelStats> = self.levels.iter().collect();
        ranked.sort_by(|a, b| b.mean.total_cmp(&a.mean));
        ranked
    }

    /// Most consistent level first; undefined CV last.
    pub fn by_cv_asc(&self) -> Vec<&LevelStats> {
        let mut ranked: Vec<&LevelStats> = self.levels.iter().collect();
        ranked.sort_by(|a, b| match (a.cv, b.cv) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        ranked
    }

    pub fn most_convergent(&self) -> Option<&LevelStats> {
        self.by_mean_desc().first().copied()
    }

    pub fn most_diverse(&self) -> Option<&LevelStats> {
        self.by_mean_desc().last().copied()
    }

    /// Defined CVs in level order.
    pub fn cvs(&self) -> Vec<f64> {
        self.levels.iter().filter_map(|l| l.cv).collect()
    }
}

pub fn within_level_stats(table: &PairTable, factor: LevelFactor) -> WithinFactorStats {
    let mut levels = Vec::new();
    for level in table.levels(factor) {
        let sims = within_level_similarities(table, factor, level);
        if sims.is_empty() {
            continue;
        }
        let mean = sims.iter().sum::<f64>() / sims.len() as f64;
        let sd = sample_std(&sims);
        let stats = LevelStats {
            level: level.to_string(),
            n: sims.len(),
            mean,
            sd,
            cv: coefficient_of_variation(sd, mean),
        };
        debug!(
            target: "framed_listening_core",
            factor = %factor,
            level,
            n = stats.n,
            mean = stats.mean,
            "Within-level similarity"
        );
        levels.push(stats);
    }
    WithinFactorStats { factor, levels }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::SimilarityMatrix;
    use crate::types::DocumentLabels;

    fn table(labels: Vec<DocumentLabels>, sim: impl Fn(usize, usize) -> f64) -> PairTable {
        let n = labels.len();
        let rows = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { sim(i.min(j), i.max(j)) }).collect())
            .collect();
        let matrix = SimilarityMatrix::from_rows(rows).unwrap();
        PairTable::from_labels(&matrix, labels).unwrap()
    }

    #[test]
    fn test_single_pair_level_has_mean_but_no_sd() {
        let t = table(
            vec![
                DocumentLabels::new("A", "calm", "J"),
                DocumentLabels::new("B", "calm", "J"),
                DocumentLabels::new("C", "party", "R"),
            ],
            |_, _| 0.4,
        );
        let stats = within_level_stats(&t, LevelFactor::Context);
        assert_eq!(stats.levels.len(), 1);
        let calm = &stats.levels[0];
        assert_eq!(calm.level, "calm");
        assert_eq!(calm.n, 1);
        assert_eq!(calm.mean, 0.4);
        assert_eq!(calm.sd, None);
        assert_eq!(calm.cv, None);
    }

    #[test]
    fn test_rankings() {
        // calm pairs: (0,1),(0,2),(1,2); party pairs: (3,4),(3,5),(4,5)
        let t = table(
            vec![
                DocumentLabels::new("A", "calm", "J"),
                DocumentLabels::new("B", "calm", "J"),
                DocumentLabels::new("C", "calm", "J"),
                DocumentLabels::new("D", "party", "R"),
                DocumentLabels::new("E", "party", "R"),
                DocumentLabels::new("F", "party", "R"),
            ],
            |i, j| match (i, j) {
                (0, 1) => 0.30,
                (0, 2) => 0.50,
                (1, 2) => 0.70,
                (3, 4) => 0.40,
                (3, 5) => 0.41,
                (4, 5) => 0.42,
                _ => 0.1,
            },
        );
        let stats = within_level_stats(&t, LevelFactor::Context);
        assert_eq!(stats.most_convergent().unwrap().level, "calm");
        assert_eq!(stats.most_diverse().unwrap().level, "party");
        let by_cv: Vec<&str> = stats.by_cv_asc().iter().map(|l| l.level.as_str()).collect();
        assert_eq!(by_cv, vec!["party", "calm"]);
        assert_eq!(stats.cvs().len(), 2);
    }

    #[test]
    fn test_genre_within_excludes_same_clip() {
        let t = table(
            vec![
                DocumentLabels::new("A", "calm", "J"),
                DocumentLabels::new("A", "party", "J"),
                DocumentLabels::new("B", "party", "J"),
            ],
            |_, _| 0.5,
        );
        let stats = within_level_stats(&t, LevelFactor::Genre);
        // (0,1) is the same clip; (0,2) and (1,2) count
        assert_eq!(stats.levels[0].n, 2);
    }
}
