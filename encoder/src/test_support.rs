//! Test-only helpers for constructing records and candidates.

use serde_json::{Map, Value};

use crate::core::profile::Profile;
use crate::core::record::{Functions, Record};

/// Function values in canonical order.
pub fn functions(baseline: f64, norm: f64, stability: f64, meta_control: f64) -> Functions {
    Functions {
        baseline,
        norm,
        stability,
        meta_control,
    }
}

/// Record derived with the reference profile.
pub fn record(
    baseline: f64,
    norm: f64,
    stability: f64,
    meta_control: f64,
    timestamp: u64,
) -> Record {
    Record::new(
        functions(baseline, norm, stability, meta_control),
        timestamp,
        &Profile::reference(),
    )
}

/// Untyped candidate of a conforming record (useful for mutation tests).
pub fn candidate(
    baseline: f64,
    norm: f64,
    stability: f64,
    meta_control: f64,
    timestamp: u64,
) -> Map<String, Value> {
    record(baseline, norm, stability, meta_control, timestamp).to_candidate()
}

/// Compact JSON text of a conforming record.
pub fn candidate_json(
    baseline: f64,
    norm: f64,
    stability: f64,
    meta_control: f64,
    timestamp: u64,
) -> String {
    Value::Object(candidate(baseline, norm, stability, meta_control, timestamp)).to_string()
}
