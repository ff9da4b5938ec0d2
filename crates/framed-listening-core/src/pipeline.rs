//! End-to-end analysis of a pair table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::compare::{
    run_binary_comparisons, run_combined_comparisons, BinaryComparisons, CombinedComparisons,
};
use crate::config::AnalysisConfig;
use crate::error::{CoreError, CoreResult};
use crate::factor_analysis::{
    compare_factor_consistency, run_factor_analysis, FactorAnalysis, FactorConsistencyComparison,
};
use crate::interaction::{genre_context_interaction, InteractionTable};
use crate::omnibus::{run_omnibus_test, OmnibusResult};
use crate::pairs::{ConditionSummary, PairTable};
use crate::types::LevelFactor;

/// Every result of one analysis run. Pure data; see [`crate::report`] for
/// the text rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Embedding backend that produced the similarities.
    pub backend: String,
    pub n_documents: usize,
    pub n_pairs: usize,
    pub condition_summary: Vec<ConditionSummary>,
    pub binary: BinaryComparisons,
    pub combined: CombinedComparisons,
    pub omnibus: OmnibusResult,
    pub context: FactorAnalysis,
    pub genre: FactorAnalysis,
    pub consistency: FactorConsistencyComparison,
    pub interaction: InteractionTable,
}

impl AnalysisReport {
    pub fn factor(&self, factor: LevelFactor) -> &FactorAnalysis {
        match factor {
            LevelFactor::Context => &self.context,
            LevelFactor::Genre => &self.genre,
        }
    }
}

/// Runs every analysis over a pair table.
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    backend: String,
    settings: AnalysisConfig,
}

impl AnalysisPipeline {
    pub fn new(backend: impl Into<String>, settings: AnalysisConfig) -> Self {
        Self {
            backend: backend.into(),
            settings,
        }
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Fails only when the table has no pairs.
    pub fn run(&self, table: &PairTable) -> CoreResult<AnalysisReport> {
        if table.is_empty() {
            return Err(CoreError::validation(
                "pairs",
                "at least two documents are required",
            ));
        }

        let run_id = Uuid::new_v4();
        info!(
            target: "framed_listening_core",
            %run_id,
            backend = %self.backend,
            pairs = table.len(),
            "Starting analysis"
        );

        let binary = run_binary_comparisons(table);
        let combined = run_combined_comparisons(table, self.settings.min_condition_group);
        let omnibus = run_omnibus_test(table);
        let context = run_factor_analysis(table, LevelFactor::Context);
        let genre = run_factor_analysis(table, LevelFactor::Genre);
        let consistency = compare_factor_consistency(&genre.within, &context.within);
        let interaction = genre_context_interaction(table, self.settings.interaction_top_k);

        info!(target: "framed_listening_core", %run_id, "Analysis complete");

        Ok(AnalysisReport {
            run_id,
            generated_at: Utc::now(),
            backend: self.backend.clone(),
            n_documents: table.document_count(),
            n_pairs: table.len(),
            condition_summary: table.condition_summary(),
            binary,
            combined,
            omnibus,
            context,
            genre,
            consistency,
            interaction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::SimilarityMatrix;
    use crate::types::DocumentLabels;

    #[test]
    fn test_empty_table_rejected() {
        let matrix = SimilarityMatrix::from_rows(vec![vec![1.0]]).unwrap();
        let table =
            PairTable::from_labels(&matrix, vec![DocumentLabels::new("A", "x", "g")]).unwrap();
        let pipeline = AnalysisPipeline::new("tfidf", AnalysisConfig::default());
        assert!(pipeline.run(&table).is_err());
    }
}
