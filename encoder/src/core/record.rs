//! Canonical Runtime State Record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::core::classification::{Mode, RiskLevel};
use crate::core::profile::Profile;

/// Required value of `spec_version`.
pub const SPEC_VERSION: &str = "pmatrix-3.5";

/// `schema_version` written by the emitter.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Top-level keys of a record, in canonical order.
pub const RECORD_FIELDS: [&str; 8] = [
    "spec_version",
    "schema_version",
    "timestamp",
    "functions",
    "stability_score",
    "risk_score",
    "mode",
    "risk_level",
];

/// Keys of the `functions` object, in canonical order.
pub const FUNCTION_FIELDS: [&str; 4] = ["baseline", "norm", "stability", "meta_control"];

/// The four normalized function values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Functions {
    pub baseline: f64,
    pub norm: f64,
    pub stability: f64,
    pub meta_control: f64,
}

/// One Runtime State Record. Field order is the serialization order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub spec_version: String,
    pub schema_version: String,
    pub timestamp: u64,
    pub functions: Functions,
    pub stability_score: f64,
    pub risk_score: f64,
    pub mode: Mode,
    pub risk_level: RiskLevel,
}

impl Record {
    /// Assemble a record, deriving scores and classifications from `profile`.
    ///
    /// Performs no validation: out-of-range inputs produce out-of-range scores.
    pub fn new(functions: Functions, timestamp: u64, profile: &Profile) -> Self {
        let stability_score = profile.weights.stability_score(&functions);
        let risk_score = profile.weights.risk_score(&functions);
        let mode = profile.bands.threshold_map(risk_score);
        let risk_level = profile.bands.level_map(mode);
        Self {
            spec_version: SPEC_VERSION.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            timestamp,
            functions,
            stability_score,
            risk_score,
            mode,
            risk_level,
        }
    }

    /// Untyped view of the record, as the validator receives it.
    ///
    /// Non-finite scores become `null`, since JSON has no representation for them.
    pub fn to_candidate(&self) -> Map<String, Value> {
        let value = json!({
            "spec_version": self.spec_version,
            "schema_version": self.schema_version,
            "timestamp": self.timestamp,
            "functions": {
                "baseline": self.functions.baseline,
                "norm": self.functions.norm,
                "stability": self.functions.stability,
                "meta_control": self.functions.meta_control,
            },
            "stability_score": self.stability_score,
            "risk_score": self.risk_score,
            "mode": self.mode.as_str(),
            "risk_level": self.risk_level.as_str(),
        });
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}
