//! Demonstration scoring of the four function values.
//!
//! These formulas only populate the derived fields of a record so it can be
//! checked for conformance. They are not a production scoring model.

use crate::core::record::Functions;

/// Absolute tolerance used when comparing a declared score to a re-derived one.
pub const SCORE_EPSILON: f64 = 1e-9;

/// Per-function weights of the stability score.
///
/// `risk_score` is the complement of `stability_score`, so one table drives
/// both scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub baseline: f64,
    pub norm: f64,
    pub stability: f64,
    pub meta_control: f64,
}

impl ScoringWeights {
    /// Equal weights (arithmetic mean).
    pub const fn reference() -> Self {
        Self {
            baseline: 0.25,
            norm: 0.25,
            stability: 0.25,
            meta_control: 0.25,
        }
    }

    /// Weighted sum of the function values. Inputs are not clamped.
    pub fn stability_score(&self, f: &Functions) -> f64 {
        self.baseline * f.baseline
            + self.norm * f.norm
            + self.stability * f.stability
            + self.meta_control * f.meta_control
    }

    /// `1 - stability_score`. Inputs are not clamped.
    pub fn risk_score(&self, f: &Functions) -> f64 {
        1.0 - self.stability_score(f)
    }
}

/// True if `declared` matches `expected` within [`SCORE_EPSILON`].
///
/// NaN never matches.
pub fn scores_match(declared: f64, expected: f64) -> bool {
    (declared - expected).abs() <= SCORE_EPSILON
}

/// True if `value` lies in the closed unit interval. NaN is out of range.
pub fn in_unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}
