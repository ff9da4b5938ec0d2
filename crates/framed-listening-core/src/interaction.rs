//! Genre x context interaction of context-driven similarity.

use serde::{Deserialize, Serialize};

use crate::pairs::PairTable;
use crate::stats::sample_std;
use crate::types::{Condition, LevelFactor};

/// Default number of combinations listed at each end of the ranking.
pub const DEFAULT_INTERACTION_TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionCell {
    pub genre: String,
    pub context: String,
    pub n: usize,
    pub mean: f64,
    pub sd: Option<f64>,
}

/// Non-empty (genre, context) cells in first-appearance order, genre-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionTable {
    pub cells: Vec<InteractionCell>,
    pub top_k: usize,
}

impl InteractionTable {
    /// Highest-mean cells, at most `top_k`.
    pub fn top(&self) -> Vec<&InteractionCell> {
        let mut ranked: Vec<&InteractionCell> = self.cells.iter().collect();
        ranked.sort_by(|a, b| b.mean.total_cmp(&a.mean));
        ranked.truncate(self.top_k);
        ranked
    }

    /// Lowest-mean cells, at most `top_k`.
    pub fn bottom(&self) -> Vec<&InteractionCell> {
        let mut ranked: Vec<&InteractionCell> = self.cells.iter().collect();
        ranked.sort_by(|a, b| a.mean.total_cmp(&b.mean));
        ranked.truncate(self.top_k);
        ranked
    }
}

/// Context-driven pairs (different clip, same context) grouped by the genre
/// and context of the first document of the pair.
pub fn genre_context_interaction(table: &PairTable, top_k: usize) -> InteractionTable {
    let mut cells = Vec::new();
    for genre in table.levels(LevelFactor::Genre) {
        for context in table.levels(LevelFactor::Context) {
            let sims = table.similarities_where(|r| {
                r.condition == Condition::DiffClipSameContext
                    && table.level_of(LevelFactor::Genre, r.doc_i) == genre
                    && table.level_of(LevelFactor::Context, r.doc_i) == context
            });
            if sims.is_empty() {
                continue;
            }
            cells.push(InteractionCell {
                genre: genre.to_string(),
                context: context.to_string(),
                n: sims.len(),
                mean: sims.iter().sum::<f64>() / sims.len() as f64,
                sd: sample_std(&sims),
            });
        }
    }
    InteractionTable { cells, top_k }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::SimilarityMatrix;
    use crate::types::DocumentLabels;

    fn table() -> PairTable {
        let labels = vec![
            DocumentLabels::new("A", "calm", "J"),
            DocumentLabels::new("B", "calm", "R"),
            DocumentLabels::new("C", "calm", "J"),
            DocumentLabels::new("D", "party", "R"),
            DocumentLabels::new("E", "party", "J"),
        ];
        let n = labels.len();
        let rows = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { 1.0 } else { 0.125 * (i + j) as f64 })
                    .collect()
            })
            .collect();
        let matrix = SimilarityMatrix::from_rows(rows).unwrap();
        PairTable::from_labels(&matrix, labels).unwrap()
    }

    #[test]
    fn test_cells_keyed_on_first_document() {
        let interaction = genre_context_interaction(&table(), DEFAULT_INTERACTION_TOP_K);
        // calm pairs: (0,1) J, (0,2) J, (1,2) R; party pair: (3,4) R
        let cells: Vec<(&str, &str, usize)> = interaction
            .cells
            .iter()
            .map(|c| (c.genre.as_str(), c.context.as_str(), c.n))
            .collect();
        assert_eq!(cells, vec![("J", "calm", 2), ("R", "calm", 1), ("R", "party", 1)]);
        assert_eq!(interaction.cells[0].mean, 0.1875);
        assert_eq!(interaction.cells[1].sd, None);
    }

    #[test]
    fn test_top_and_bottom() {
        let mut interaction = genre_context_interaction(&table(), 2);
        assert_eq!(interaction.top().len(), 2);
        assert_eq!(interaction.top()[0].context, "party");
        assert_eq!(interaction.bottom()[0].genre, "J");
        interaction.top_k = 10;
        assert_eq!(interaction.bottom().len(), 3);
    }
}
