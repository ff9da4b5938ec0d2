//! Cosine similarity between embeddings and the dense similarity matrix.

mod matrix;

pub use matrix::{SimilarityMatrix, SYMMETRY_TOLERANCE};

/// Cosine similarity with f64 accumulation, in [-1, 1].
///
/// Returns 0.0 if the vectors have different lengths or either has zero norm.
pub fn cosine_similarity_f64(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a > 0.0 && norm_b > 0.0 {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let v = vec![0.3, -0.2, 0.9];
        assert!((cosine_similarity_f64(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert_eq!(cosine_similarity_f64(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((cosine_similarity_f64(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_norm_is_zero() {
        assert_eq!(cosine_similarity_f64(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity_f64(&[], &[]), 0.0);
    }
}
