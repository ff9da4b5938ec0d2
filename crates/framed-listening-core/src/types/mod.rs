//! Domain types: documents, pair conditions and analysis factors.

mod condition;
mod document;
mod factor;

pub use condition::Condition;
pub use document::{Document, DocumentLabels, DocumentSet};
pub use factor::{BinaryFactor, LevelFactor, LevelMatch};
