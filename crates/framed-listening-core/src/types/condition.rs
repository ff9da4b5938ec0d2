//! Mutually exclusive experimental condition of a document pair.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Condition assigned to an unordered document pair.
///
/// The five conditions partition every pair: the first matching rule wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    SameClipSameContext,
    SameClipDiffContext,
    DiffClipSameContext,
    DiffClipDiffContextSameGenre,
    DiffClipDiffContextDiffGenre,
}

impl Condition {
    /// All conditions in canonical order.
    pub const ALL: [Condition; 5] = [
        Condition::SameClipSameContext,
        Condition::SameClipDiffContext,
        Condition::DiffClipSameContext,
        Condition::DiffClipDiffContextSameGenre,
        Condition::DiffClipDiffContextDiffGenre,
    ];

    /// Classify a pair from its three equality flags.
    pub fn classify(same_clip: bool, same_context: bool, same_genre: bool) -> Self {
        match (same_clip, same_context, same_genre) {
            (true, true, _) => Condition::SameClipSameContext,
            (true, false, _) => Condition::SameClipDiffContext,
            (false, true, _) => Condition::DiffClipSameContext,
            (false, false, true) => Condition::DiffClipDiffContextSameGenre,
            (false, false, false) => Condition::DiffClipDiffContextDiffGenre,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::SameClipSameContext => "same_clip_same_context",
            Condition::SameClipDiffContext => "same_clip_diff_context",
            Condition::DiffClipSameContext => "diff_clip_same_context",
            Condition::DiffClipDiffContextSameGenre => "diff_clip_diff_context_same_genre",
            Condition::DiffClipDiffContextDiffGenre => "diff_clip_diff_context_diff_genre",
        }
    }

    /// Parse the snake_case label used in reports and CSV files.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
