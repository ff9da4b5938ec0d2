use serde::{Deserialize, Serialize};
use tracing::info;

use super::cosine_similarity_f64;
use crate::error::{CoreError, CoreResult};

/// Tolerance for symmetry and range checks on supplied matrices.
pub const SYMMETRY_TOLERANCE: f64 = 1e-6;

/// Square, symmetric matrix of pairwise cosine similarities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Compute all pairwise cosine similarities of equal-length embeddings.
    ///
    /// The diagonal is 1.0. A zero-norm embedding has similarity 0.0 with
    /// every other embedding.
    pub fn from_embeddings(embeddings: &[Vec<f32>]) -> CoreResult<Self> {
        let size = embeddings.len();
        if let Some(first) = embeddings.first() {
            let expected = first.len();
            if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
                return Err(CoreError::DimensionMismatch {
                    expected,
                    actual: bad.len(),
                });
            }
        }

        let mut values = vec![0.0; size * size];
        for i in 0..size {
            values[i * size + i] = 1.0;
            for j in (i + 1)..size {
                let sim = cosine_similarity_f64(&embeddings[i], &embeddings[j]);
                values[i * size + j] = sim;
                values[j * size + i] = sim;
            }
        }

        info!(
            target: "framed_listening_core",
            documents = size,
            "Computed similarity matrix"
        );
        Ok(Self { size, values })
    }

    /// Validate an externally supplied matrix given as rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> CoreResult<Self> {
        let size = rows.len();
        if let Some(row) = rows.iter().find(|r| r.len() != size) {
            return Err(CoreError::DimensionMismatch {
                expected: size,
                actual: row.len(),
            });
        }
        let values: Vec<f64> = rows.into_iter().flatten().collect();

        let lower = -1.0 - SYMMETRY_TOLERANCE;
        let upper = 1.0 + SYMMETRY_TOLERANCE;
        for i in 0..size {
            for j in 0..size {
                let value = values[i * size + j];
                if !value.is_finite() || value < lower || value > upper {
                    return Err(CoreError::InvalidSimilarity { i, j, value });
                }
                if j > i && (value - values[j * size + i]).abs() > SYMMETRY_TOLERANCE {
                    return Err(CoreError::AsymmetricMatrix { i, j });
                }
            }
        }
        Ok(Self { size, values })
    }

    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Similarity at (i, j). Panics if out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size && j < self.size, "index out of bounds");
        self.values[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }

    /// Number of unordered off-diagonal pairs, n(n-1)/2.
    pub fn pair_count(&self) -> usize {
        self.size * self.size.saturating_sub(1) / 2
    }
}
