use super::domain::{
    PercentileScores, FT_PERCENT, GM_PERCENT, ION_PERCENT, VTH_SCORE_PERCENT,
};
use serde::{Deserialize, Serialize};

/// Percentile fields feeding the suitability score, equally weighted.
pub const WEIGHTED_FIELDS: [&str; 4] = [ION_PERCENT, GM_PERCENT, FT_PERCENT, VTH_SCORE_PERCENT];
pub const FIELD_WEIGHT: f64 = 0.25;

pub const SUITABLE_THRESHOLD: f64 = 70.0;
pub const UNSURE_THRESHOLD: f64 = 50.0;

/// Categorical screening verdict derived from the suitability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Suitable,
    Unsure,
    Unsuitable,
}

impl Decision {
    pub fn classify(score: f64) -> Self {
        if score >= SUITABLE_THRESHOLD {
            Self::Suitable
        } else if score >= UNSURE_THRESHOLD {
            Self::Unsure
        } else {
            Self::Unsuitable
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Suitable => "suitable",
            Self::Unsure => "unsure",
            Self::Unsuitable => "unsuitable",
        }
    }
}

/// Equally-weighted mean of the four weighted percentile fields. A field
/// absent from the scores contributes 0.0; that is the defined fallback,
/// not error recovery. No clamping: out-of-range percentiles pass through.
pub fn suitability_score(percentiles: &PercentileScores) -> f64 {
    WEIGHTED_FIELDS
        .iter()
        .map(|field| FIELD_WEIGHT * percentiles.get(field).unwrap_or(0.0))
        .sum()
}
