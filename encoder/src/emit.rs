//! Record emission for `pmatrix-encoder emit`.

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::profile::Profile;
use crate::core::record::{Functions, Record};
use crate::io::clock::Clock;

/// Build a record from four function values stamped with `clock`.
///
/// No range enforcement happens here; out-of-range values are emitted as-is so
/// the validator can report them.
pub fn emit(functions: Functions, clock: &dyn Clock, profile: &Profile) -> Record {
    let timestamp = clock.now();
    let record = Record::new(functions, timestamp, profile);
    debug!(
        timestamp,
        stability_score = record.stability_score,
        risk_score = record.risk_score,
        mode = %record.mode,
        risk_level = %record.risk_level,
        "record emitted"
    );
    record
}

/// Serialize `record` in canonical field order, pretty unless `compact`.
pub fn render_record(record: &Record, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(record)
    } else {
        serde_json::to_string_pretty(record)
    };
    rendered.context("serialize record")
}
