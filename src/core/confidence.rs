use serde::{Deserialize, Serialize};

/// Weights applied when fusing the temporal and semantic scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceWeights {
    pub temporal: f64,
    pub semantic: f64,
}

impl ConfidenceWeights {
    pub fn new(temporal: f64, semantic: f64) -> Self {
        Self { temporal, semantic }
    }
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            temporal: 0.6,
            semantic: 0.4,
        }
    }
}

/// Weighted sum of both scores, rounded to 4 decimals.
///
/// No renormalisation happens here; weights are validated by the settings layer.
pub fn fuse(temporal: f64, semantic: f64, weights: ConfidenceWeights) -> f64 {
    round4(weights.temporal * temporal + weights.semantic * semantic)
}

pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
