//! Tagged per-field extraction from an untyped candidate object.
//!
//! Each field is `Valid`, `Invalid` (present with the wrong shape) or `Absent`,
//! so every invariant can report a failure without aborting the others.

use serde_json::{Map, Value};

use crate::core::classification::{Mode, RiskLevel};
use crate::core::record::{FUNCTION_FIELDS, Functions, RECORD_FIELDS};

/// Extraction state of one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Valid(T),
    Invalid(String),
    Absent,
}

impl<T> Field<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Field::Valid(value) => Some(value),
            _ => None,
        }
    }

    /// Explanation of why the field is unusable, naming it as `name`.
    pub fn problem(&self, name: &str) -> Option<String> {
        match self {
            Field::Valid(_) => None,
            Field::Invalid(reason) => Some(format!("{name}: {reason}")),
            Field::Absent => Some(format!("{name} is missing")),
        }
    }
}

/// The four function values, each extracted independently.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionFields {
    pub baseline: Field<f64>,
    pub norm: Field<f64>,
    pub stability: Field<f64>,
    pub meta_control: Field<f64>,
    /// Keys inside `functions` that are not function names.
    pub unknown_keys: Vec<String>,
}

impl FunctionFields {
    pub fn named(&self) -> [(&'static str, &Field<f64>); 4] {
        [
            ("baseline", &self.baseline),
            ("norm", &self.norm),
            ("stability", &self.stability),
            ("meta_control", &self.meta_control),
        ]
    }

    /// All four values, if every one is numeric.
    pub fn values(&self) -> Option<Functions> {
        Some(Functions {
            baseline: *self.baseline.valid()?,
            norm: *self.norm.valid()?,
            stability: *self.stability.valid()?,
            meta_control: *self.meta_control.valid()?,
        })
    }
}

/// Every field of a candidate record, plus its structural deviations.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFields {
    pub spec_version: Field<String>,
    pub schema_version: Field<String>,
    pub timestamp: Field<u64>,
    pub functions: Field<FunctionFields>,
    pub stability_score: Field<f64>,
    pub risk_score: Field<f64>,
    pub mode: Field<Mode>,
    pub risk_level: Field<RiskLevel>,
    /// Required top-level keys that are not present, in canonical order.
    pub missing_keys: Vec<&'static str>,
    /// Top-level keys that are not part of the record, sorted.
    pub unknown_keys: Vec<String>,
}

impl CandidateFields {
    pub fn extract(candidate: &Map<String, Value>) -> Self {
        let missing_keys = RECORD_FIELDS
            .iter()
            .copied()
            .filter(|key| !candidate.contains_key(*key))
            .collect();
        let mut unknown_keys: Vec<String> = candidate
            .keys()
            .filter(|key| !RECORD_FIELDS.contains(&key.as_str()))
            .cloned()
            .collect();
        unknown_keys.sort();

        Self {
            spec_version: extract(candidate, "spec_version", string),
            schema_version: extract(candidate, "schema_version", string),
            timestamp: extract(candidate, "timestamp", timestamp),
            functions: extract(candidate, "functions", functions),
            stability_score: extract(candidate, "stability_score", number),
            risk_score: extract(candidate, "risk_score", number),
            mode: extract(candidate, "mode", |value| parsed(value, str::parse::<Mode>)),
            risk_level: extract(candidate, "risk_level", |value| {
                parsed(value, str::parse::<RiskLevel>)
            }),
            missing_keys,
            unknown_keys,
        }
    }
}

fn extract<T>(
    object: &Map<String, Value>,
    key: &str,
    convert: impl FnOnce(&Value) -> Field<T>,
) -> Field<T> {
    object.get(key).map_or(Field::Absent, convert)
}

fn number(value: &Value) -> Field<f64> {
    match value.as_f64() {
        Some(number) => Field::Valid(number),
        None => Field::Invalid(format!("expected number, got {}", kind(value))),
    }
}

fn string(value: &Value) -> Field<String> {
    match value.as_str() {
        Some(text) => Field::Valid(text.to_string()),
        None => Field::Invalid(format!("expected string, got {}", kind(value))),
    }
}

fn parsed<T>(value: &Value, parse: impl FnOnce(&str) -> Result<T, String>) -> Field<T> {
    match value.as_str() {
        Some(text) => parse(text).map_or_else(Field::Invalid, Field::Valid),
        None => Field::Invalid(format!("expected string, got {}", kind(value))),
    }
}

fn timestamp(value: &Value) -> Field<u64> {
    if let Some(ts) = value.as_u64() {
        return Field::Valid(ts);
    }
    match value.as_i64() {
        Some(ts) => Field::Invalid(format!("{ts} is negative")),
        None => Field::Invalid(format!("expected integer, got {}", kind(value))),
    }
}

fn functions(value: &Value) -> Field<FunctionFields> {
    let Some(object) = value.as_object() else {
        return Field::Invalid(format!("expected object, got {}", kind(value)));
    };
    let mut unknown_keys: Vec<String> = object
        .keys()
        .filter(|key| !FUNCTION_FIELDS.contains(&key.as_str()))
        .cloned()
        .collect();
    unknown_keys.sort();
    Field::Valid(FunctionFields {
        baseline: extract(object, "baseline", number),
        norm: extract(object, "norm", number),
        stability: extract(object, "stability", number),
        meta_control: extract(object, "meta_control", number),
        unknown_keys,
    })
}

fn kind(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(number) => format!("number {number}"),
        Value::String(text) => format!("string {text:?}"),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn extracts_complete_candidate() {
        let fields = CandidateFields::extract(&object(json!({
            "spec_version": "pmatrix-3.5",
            "schema_version": "1.0.0",
            "timestamp": 42,
            "functions": {"baseline": 0.1, "norm": 0.2, "stability": 0.3, "meta_control": 0.4},
            "stability_score": 0.25,
            "risk_score": 0.75,
            "mode": "Alert",
            "risk_level": "L4"
        })));
        assert!(fields.missing_keys.is_empty());
        assert!(fields.unknown_keys.is_empty());
        assert_eq!(fields.timestamp, Field::Valid(42));
        assert_eq!(fields.mode, Field::Valid(Mode::Alert));
        let functions = fields.functions.valid().expect("functions");
        assert_eq!(functions.values().expect("values").meta_control, 0.4);
    }

    #[test]
    fn distinguishes_absent_from_invalid() {
        let fields = CandidateFields::extract(&object(json!({
            "timestamp": -5,
            "mode": "Panic",
            "risk_score": "high",
            "extra": true
        })));
        assert_eq!(fields.spec_version, Field::Absent);
        assert_eq!(fields.timestamp, Field::Invalid("-5 is negative".to_string()));
        assert_eq!(fields.mode, Field::Invalid("unknown mode 'Panic'".to_string()));
        assert_eq!(
            fields.risk_score,
            Field::Invalid("expected number, got string \"high\"".to_string())
        );
        assert_eq!(fields.unknown_keys, vec!["extra".to_string()]);
        assert_eq!(fields.missing_keys.len(), 5);
    }

    #[test]
    fn fractional_timestamp_is_invalid() {
        let fields = CandidateFields::extract(&object(json!({ "timestamp": 1.5 })));
        assert_eq!(
            fields.timestamp,
            Field::Invalid("expected integer, got number 1.5".to_string())
        );
    }

    #[test]
    fn functions_track_missing_and_unknown_keys() {
        let fields = CandidateFields::extract(&object(json!({
            "functions": {"baseline": 0.1, "norm": 0.2, "stability": 0.3, "bonus": 1}
        })));
        let functions = fields.functions.valid().expect("functions");
        assert_eq!(functions.meta_control, Field::Absent);
        assert_eq!(functions.unknown_keys, vec!["bonus".to_string()]);
        assert!(functions.values().is_none());
    }

    #[test]
    fn problem_names_the_field() {
        assert_eq!(Field::<f64>::Absent.problem("norm"), Some("norm is missing".to_string()));
        assert_eq!(Field::Valid(1.0).problem("norm"), None);
    }
}
