//! Published JSON Schema for the record (Draft 2020-12).
//!
//! The schema covers the per-field shape only. Derivation and stream
//! invariants are not expressible in it and stay with the validator.

use anyhow::{Context, Result};
use jsonschema::{Draft, Validator};
use serde_json::{Map, Value};

pub const V1_SCHEMA: &str = include_str!("../../../schemas/runtime_state/v1.schema.json");

/// The compiled record schema; build once and reuse across candidates.
pub struct RecordSchema {
    validator: Validator,
}

impl RecordSchema {
    pub fn compile() -> Result<Self> {
        let schema: Value = serde_json::from_str(V1_SCHEMA).context("parse record schema")?;
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&schema)
            .context("compile record schema")?;
        Ok(Self { validator })
    }

    /// Schema violations of one candidate (empty when it matches).
    ///
    /// `"type": "integer"` admits integral floats such as `1000.0`, which
    /// INV-R4 rejects, so these diagnostics are looser than the invariants.
    pub fn violations(&self, candidate: &Map<String, Value>) -> Vec<String> {
        let instance = Value::Object(candidate.clone());
        self.validator
            .iter_errors(&instance)
            .map(|err| err.to_string())
            .collect()
    }
}
