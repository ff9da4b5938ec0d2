use serde::{Deserialize, Serialize};
use std::fmt;

use super::descriptive::{mean, sample_std};

/// Conventional significance marker for a p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Significance {
    #[serde(rename = "***")]
    PBelow001,
    #[serde(rename = "**")]
    PBelow01,
    #[serde(rename = "*")]
    PBelow05,
    #[serde(rename = "n.s.")]
    NotSignificant,
}

impl Significance {
    /// Map a p-value to a marker. An undefined p is not significant.
    pub fn from_p(p: Option<f64>) -> Self {
        match p {
            Some(p) if p < 0.001 => Significance::PBelow001,
            Some(p) if p < 0.01 => Significance::PBelow01,
            Some(p) if p < 0.05 => Significance::PBelow05,
            _ => Significance::NotSignificant,
        }
    }

    pub fn is_significant(&self) -> bool {
        !matches!(self, Significance::NotSignificant)
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Significance::PBelow001 => "***",
            Significance::PBelow01 => "**",
            Significance::PBelow05 => "*",
            Significance::NotSignificant => "n.s.",
        }
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Cohen's d with the simple pooled SD `sqrt((sd_a^2 + sd_b^2) / 2)`.
///
/// `None` when either SD is undefined or the pooled SD is exactly zero.
pub fn cohens_d(a: &[f64], b: &[f64]) -> Option<f64> {
    let sd_a = sample_std(a)?;
    let sd_b = sample_std(b)?;
    let pooled = ((sd_a.powi(2) + sd_b.powi(2)) / 2.0).sqrt();
    if pooled == 0.0 {
        return None;
    }
    Some((mean(a)? - mean(b)?) / pooled)
}
