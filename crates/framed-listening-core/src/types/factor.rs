//! Factor descriptors.
//!
//! A [`BinaryFactor`] splits pairs into same-X and different-X groups. A
//! [`LevelFactor`] has named levels and knows which pairs count as within a
//! level and how clip-driven pairs are matched to a level.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pairs::PairRecord;
use crate::types::Condition;

/// Metadata field compared as same vs different.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryFactor {
    Clip,
    Context,
    Genre,
}

impl BinaryFactor {
    pub const ALL: [BinaryFactor; 3] = [
        BinaryFactor::Clip,
        BinaryFactor::Context,
        BinaryFactor::Genre,
    ];

    /// Display label, e.g. "Clip".
    pub fn label(&self) -> &'static str {
        match self {
            BinaryFactor::Clip => "Clip",
            BinaryFactor::Context => "Context",
            BinaryFactor::Genre => "Genre",
        }
    }

    /// Whether the pair shares this field.
    pub fn is_same(&self, record: &PairRecord) -> bool {
        match self {
            BinaryFactor::Clip => record.same_clip,
            BinaryFactor::Context => record.same_context,
            BinaryFactor::Genre => record.same_genre,
        }
    }

    /// "Same {Label} vs Different {Label}".
    pub fn comparison_label(&self) -> String {
        format!("Same {0} vs Different {0}", self.label())
    }
}

impl fmt::Display for BinaryFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a pair is matched to a level: one side or both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelMatch {
    /// At least one document is at the level.
    Either,
    /// Both documents are at the level.
    Both,
}

impl LevelMatch {
    pub fn matches(&self, level_i: &str, level_j: &str, level: &str) -> bool {
        match self {
            LevelMatch::Either => level_i == level || level_j == level,
            LevelMatch::Both => level_i == level && level_j == level,
        }
    }
}

/// Factor with named levels, analyzed level by level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelFactor {
    Context,
    Genre,
}

impl LevelFactor {
    pub const ALL: [LevelFactor; 2] = [LevelFactor::Context, LevelFactor::Genre];

    /// Display label, e.g. "Genre".
    pub fn label(&self) -> &'static str {
        match self {
            LevelFactor::Context => "Context",
            LevelFactor::Genre => "Genre",
        }
    }

    /// Lowercase key used in file names and config.
    pub fn key(&self) -> &'static str {
        match self {
            LevelFactor::Context => "context",
            LevelFactor::Genre => "genre",
        }
    }

    /// Pairs that count as "within a level" for this factor.
    ///
    /// Context: different clips sharing a context. Genre: different clips
    /// sharing a genre, whatever their context.
    pub fn is_within(&self, record: &PairRecord) -> bool {
        match self {
            LevelFactor::Context => record.condition == Condition::DiffClipSameContext,
            LevelFactor::Genre => record.same_genre && !record.same_clip,
        }
    }

    /// Level matching rule for the clip-driven group of the moderator and
    /// consistency analyses.
    pub fn clip_driven_match(&self) -> LevelMatch {
        match self {
            LevelFactor::Context => LevelMatch::Either,
            LevelFactor::Genre => LevelMatch::Both,
        }
    }

    /// Level matching rule for the context-driven group.
    pub fn context_driven_match(&self) -> LevelMatch {
        LevelMatch::Both
    }
}

impl fmt::Display for LevelFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
