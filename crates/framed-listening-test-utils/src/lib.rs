//! Seeded fixtures for framed-listening tests.
//!
//! Every generator takes an explicit seed so tests are reproducible.

pub mod corpus;
pub mod scenarios;

pub use corpus::{SyntheticCorpus, SyntheticCorpusConfig, SyntheticCorpusGenerator};
pub use scenarios::{four_document_scenario, labels_from};
