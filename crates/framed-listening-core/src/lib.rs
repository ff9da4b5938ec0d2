//! Framed Listening Core Library
//!
//! Statistical core for comparing music-evoked thought transcripts: does
//! thought similarity follow the music clip, the verbal context, or the genre?
//!
//! # Architecture
//!
//! This crate defines:
//! - Domain types (`Document`, `Condition`, `BinaryFactor`, `LevelFactor`)
//! - The cosine `SimilarityMatrix` and the pairwise condition classifier (`PairTable`)
//! - Statistics primitives (t-test, Levene, ANOVA, Cohen's d, CV)
//! - Comparators and analyzers over the pair table
//! - `AnalysisPipeline`, text rendering and CSV/JSON export
//! - Error types and configuration
//!
//! # Example
//!
//! ```
//! use framed_listening_core::{DocumentLabels, PairTable, SimilarityMatrix, Condition};
//!
//! let matrix = SimilarityMatrix::from_rows(vec![
//!     vec![1.0, 0.6],
//!     vec![0.6, 1.0],
//! ]).unwrap();
//! let labels = vec![
//!     DocumentLabels::new("clip-1", "calm", "jazz"),
//!     DocumentLabels::new("clip-1", "party", "jazz"),
//! ];
//! let table = PairTable::from_labels(&matrix, labels).unwrap();
//! assert_eq!(table.records()[0].condition, Condition::SameClipDiffContext);
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod factor_analysis;
pub mod interaction;
pub mod omnibus;
pub mod pairs;
pub mod pipeline;
pub mod report;
pub mod similarity;
pub mod stats;
pub mod types;

// Re-exports for convenience
pub use compare::{ComparisonResult, ConditionComparison};
pub use config::AppConfig;
pub use error::{CoreError, CoreResult};
pub use pairs::{PairRecord, PairTable};
pub use pipeline::{AnalysisPipeline, AnalysisReport};
pub use similarity::SimilarityMatrix;
pub use stats::Significance;
pub use types::{BinaryFactor, Condition, Document, DocumentLabels, DocumentSet, LevelFactor};
