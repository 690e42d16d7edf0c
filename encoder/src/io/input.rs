//! Reading and splitting candidate records for `validate`.
//!
//! Input may be a single JSON object, a JSON array of objects, or a sequence
//! of objects separated by whitespace (one per line is typical). Anything else
//! is malformed input and never reaches the validator.

use std::fs;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use tracing::debug;

/// Read the whole input from `path`, or from stdin when `path` is `None`.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "reading candidates from file");
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        }
        None => {
            debug!("reading candidates from stdin");
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read stdin")?;
            Ok(buf)
        }
    }
}

/// Split input text into candidate objects, in stream order.
pub fn parse_candidates(text: &str) -> Result<Vec<Map<String, Value>>> {
    let mut candidates = Vec::new();
    let stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    for value in stream {
        let value = value.with_context(|| format!("parse candidate {}", candidates.len() + 1))?;
        match value {
            Value::Object(object) => candidates.push(object),
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(object) => candidates.push(object),
                        other => bail!(
                            "candidate {} is not a JSON object (got {})",
                            candidates.len() + 1,
                            json_kind(&other)
                        ),
                    }
                }
            }
            other => bail!(
                "candidate {} is not a JSON object (got {})",
                candidates.len() + 1,
                json_kind(&other)
            ),
        }
    }
    if candidates.is_empty() {
        bail!("no candidate records in input");
    }
    debug!(count = candidates.len(), "parsed candidates");
    Ok(candidates)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
