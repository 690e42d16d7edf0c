//! Immutable scoring and classification tables.

use crate::core::classification::ModeBands;
use crate::core::scoring::ScoringWeights;

/// Scoring weights and mode bands shared by the emitter and the validator.
///
/// Built once at startup and passed by reference so both paths derive the
/// same values.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub weights: ScoringWeights,
    pub bands: ModeBands,
}

impl Profile {
    pub const fn reference() -> Self {
        Self {
            weights: ScoringWeights::reference(),
            bands: ModeBands::reference(),
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::reference()
    }
}
