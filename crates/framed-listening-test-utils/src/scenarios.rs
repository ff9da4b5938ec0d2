//! Small hand-built scenarios with known pair conditions.

use framed_listening_core::{DocumentLabels, SimilarityMatrix};

/// Build labels from `(clip, context, genre)` triples.
pub fn labels_from(triples: &[(&str, &str, &str)]) -> Vec<DocumentLabels> {
    triples
        .iter()
        .map(|(clip, context, genre)| DocumentLabels::new(*clip, *context, *genre))
        .collect()
}

/// Clips A,A,B,B in contexts X,Y,X,Y; genres rock,rock,jazz,jazz; every
/// off-diagonal similarity is 0.5.
pub fn four_document_scenario() -> (Vec<DocumentLabels>, SimilarityMatrix) {
    let labels = labels_from(&[
        ("A", "X", "rock"),
        ("A", "Y", "rock"),
        ("B", "X", "jazz"),
        ("B", "Y", "jazz"),
    ]);
    let rows = (0..4)
        .map(|i| (0..4).map(|j| if i == j { 1.0 } else { 0.5 }).collect())
        .collect();
    let matrix = SimilarityMatrix::from_rows(rows).expect("constant matrix is valid");
    (labels, matrix)
}
