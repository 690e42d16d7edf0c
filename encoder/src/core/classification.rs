//! Mode and risk level classification.
//!
//! `risk_score` falls into exactly one band: lower bound inclusive, upper bound
//! exclusive, with the topmost band closed at 1.0. Each mode maps to exactly
//! one level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operating mode derived from `risk_score`, ordered from least to most risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mode {
    Optimal,
    Normal,
    Caution,
    Alert,
    Halt,
}

/// Risk level tag derived from [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    L1,
    L2,
    L3,
    L4,
    L5,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Optimal,
        Mode::Normal,
        Mode::Caution,
        Mode::Alert,
        Mode::Halt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Optimal => "Optimal",
            Mode::Normal => "Normal",
            Mode::Caution => "Caution",
            Mode::Alert => "Alert",
            Mode::Halt => "Halt",
        }
    }
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::L1,
        RiskLevel::L2,
        RiskLevel::L3,
        RiskLevel::L4,
        RiskLevel::L5,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::L1 => "L1",
            RiskLevel::L2 => "L2",
            RiskLevel::L3 => "L3",
            RiskLevel::L4 => "L4",
            RiskLevel::L5 => "L5",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown mode '{s}'"))
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("unknown risk_level '{s}'"))
    }
}

/// One band of the threshold map: `risk_score >= lower` selects `mode` unless
/// a higher band also matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub mode: Mode,
    pub level: RiskLevel,
}

/// Ordered threshold map from `risk_score` to mode, plus the mode-to-level table.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeBands {
    bands: [Band; 5],
}

impl ModeBands {
    pub const fn reference() -> Self {
        Self {
            bands: [
                Band {
                    lower: 0.0,
                    mode: Mode::Optimal,
                    level: RiskLevel::L1,
                },
                Band {
                    lower: 0.2,
                    mode: Mode::Normal,
                    level: RiskLevel::L2,
                },
                Band {
                    lower: 0.4,
                    mode: Mode::Caution,
                    level: RiskLevel::L3,
                },
                Band {
                    lower: 0.6,
                    mode: Mode::Alert,
                    level: RiskLevel::L4,
                },
                Band {
                    lower: 0.8,
                    mode: Mode::Halt,
                    level: RiskLevel::L5,
                },
            ],
        }
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Classify `risk_score` into its band.
    ///
    /// Total over `f64`: values below the lowest threshold saturate into the
    /// lowest band, values above 1.0 and NaN into the topmost band.
    pub fn threshold_map(&self, risk_score: f64) -> Mode {
        let top = self.bands[self.bands.len() - 1];
        if risk_score.is_nan() {
            return top.mode;
        }
        self.bands
            .iter()
            .rev()
            .find(|band| risk_score >= band.lower)
            .unwrap_or(&self.bands[0])
            .mode
    }

    /// Level tag of `mode`.
    pub fn level_map(&self, mode: Mode) -> RiskLevel {
        self.bands
            .iter()
            .find(|band| band.mode == mode)
            .map_or(RiskLevel::L5, |band| band.level)
    }

    /// Structural problems with the table (empty on success).
    ///
    /// Thresholds must start at 0.0, be strictly increasing and stay below 1.0;
    /// modes and levels must each appear once.
    pub fn check(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.bands[0].lower != 0.0 {
            errors.push(format!(
                "lowest band must start at 0.0, got {}",
                self.bands[0].lower
            ));
        }
        for pair in self.bands.windows(2) {
            if pair[1].lower <= pair[0].lower {
                errors.push(format!(
                    "band {} lower bound {} must exceed {} lower bound {}",
                    pair[1].mode, pair[1].lower, pair[0].mode, pair[0].lower
                ));
            }
        }
        for band in &self.bands {
            if !(0.0..1.0).contains(&band.lower) {
                errors.push(format!(
                    "band {} lower bound {} outside [0.0, 1.0)",
                    band.mode, band.lower
                ));
            }
        }
        for mode in Mode::ALL {
            let count = self.bands.iter().filter(|band| band.mode == mode).count();
            if count != 1 {
                errors.push(format!("mode {mode} appears {count} times"));
            }
        }
        for level in RiskLevel::ALL {
            let count = self.bands.iter().filter(|band| band.level == level).count();
            if count != 1 {
                errors.push(format!("risk_level {level} appears {count} times"));
            }
        }
        errors
    }
}

impl Default for ModeBands {
    fn default() -> Self {
        Self::reference()
    }
}
