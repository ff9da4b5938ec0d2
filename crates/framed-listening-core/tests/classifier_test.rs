//! Pair classifier properties over hand-built and synthetic corpora.

use std::collections::HashSet;

use framed_listening_core::factor_analysis::within_level_stats;
use framed_listening_core::{Condition, LevelFactor, PairRecord, PairTable};
use framed_listening_test_utils::{
    four_document_scenario, labels_from, SyntheticCorpusConfig, SyntheticCorpusGenerator,
};

#[test]
fn test_four_document_scenario() {
    let (labels, matrix) = four_document_scenario();
    let table = PairTable::from_labels(&matrix, labels).unwrap();
    assert_eq!(table.len(), 6);

    let find = |i: usize, j: usize| -> PairRecord {
        *table
            .records()
            .iter()
            .find(|r| r.doc_i == i && r.doc_j == j)
            .unwrap()
    };

    let p01 = find(0, 1);
    assert!(p01.same_clip && !p01.same_context);
    assert_eq!(p01.condition, Condition::SameClipDiffContext);

    let p02 = find(0, 2);
    assert!(!p02.same_clip && p02.same_context);
    assert_eq!(p02.condition, Condition::DiffClipSameContext);

    let p03 = find(0, 3);
    assert!(!p03.same_clip && !p03.same_context && !p03.same_genre);
    assert_eq!(p03.condition, Condition::DiffClipDiffContextDiffGenre);

    let p23 = find(2, 3);
    assert!(p23.same_clip && !p23.same_context);
    assert_eq!(p23.condition, Condition::SameClipDiffContext);

    assert!(table.records().iter().all(|r| r.similarity == 0.5));
}

#[test]
fn test_every_unordered_pair_exactly_once() {
    let corpus = SyntheticCorpusGenerator::new(SyntheticCorpusConfig::default()).generate();
    let n = corpus.documents.len();
    let table = PairTable::build(&corpus.matrix, &corpus.documents).unwrap();

    assert_eq!(table.len(), n * (n - 1) / 2);
    let pairs: HashSet<(usize, usize)> = table.records().iter().map(|r| (r.doc_i, r.doc_j)).collect();
    assert_eq!(pairs.len(), table.len());
    assert!(table.records().iter().all(|r| r.doc_i < r.doc_j && r.doc_j < n));

    // row-major order
    let order: Vec<(usize, usize)> = table.records().iter().map(|r| (r.doc_i, r.doc_j)).collect();
    let mut sorted = order.clone();
    sorted.sort();
    assert_eq!(order, sorted);

    let total: usize = table.condition_counts().iter().map(|(_, c)| c).sum();
    assert_eq!(total, table.len());
}

#[test]
fn test_labels_are_order_invariant() {
    let corpus = SyntheticCorpusGenerator::new(SyntheticCorpusConfig::default()).generate();
    let labels = corpus.labels();
    for r in PairTable::from_labels(&corpus.matrix, labels.clone()).unwrap().records() {
        let swapped = PairRecord::classify(r.doc_j, r.doc_i, r.similarity, &labels[r.doc_j], &labels[r.doc_i]);
        assert_eq!(swapped.condition, r.condition);
        if labels[r.doc_i].clip == labels[r.doc_j].clip && labels[r.doc_i].context == labels[r.doc_j].context {
            assert_eq!(r.condition, Condition::SameClipSameContext);
        }
    }
}

#[test]
fn test_classifier_is_deterministic() {
    let corpus = SyntheticCorpusGenerator::new(SyntheticCorpusConfig::default()).generate();
    let first = PairTable::build(&corpus.matrix, &corpus.documents).unwrap();
    let second = PairTable::build(&corpus.matrix, &corpus.documents).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_single_pair_level_reports_mean_without_sd() {
    let labels = labels_from(&[
        ("A", "calm", "J"),
        ("B", "calm", "J"),
        ("C", "party", "R"),
        ("D", "sad", "R"),
    ]);
    let rows = (0..4)
        .map(|i| (0..4).map(|j| if i == j { 1.0 } else { 0.3 }).collect())
        .collect();
    let matrix = framed_listening_core::SimilarityMatrix::from_rows(rows).unwrap();
    let table = PairTable::from_labels(&matrix, labels).unwrap();

    let within = within_level_stats(&table, LevelFactor::Context);
    assert_eq!(within.levels.len(), 1);
    let calm = &within.levels[0];
    assert_eq!((calm.n, calm.mean), (1, 0.3));
    assert!(calm.sd.is_none() && calm.cv.is_none());
}
