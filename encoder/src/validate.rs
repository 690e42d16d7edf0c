//! Candidate validation for `pmatrix-encoder validate`.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::core::invariants::validate_stream;
use crate::core::profile::Profile;
use crate::core::types::{InvariantReport, Verdict};
use crate::io::input::parse_candidates;
use crate::io::schema::RecordSchema;

/// Options for one `validate` invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Timestamps of records that precede the input in its stream.
    pub prior_timestamps: Vec<u64>,
    /// Also check each candidate against the published JSON Schema.
    pub check_schema: bool,
}

/// Report for one candidate of the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateOutcome {
    #[serde(flatten)]
    pub report: InvariantReport,
    /// Advisory schema diagnostics; never affect the verdict.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_violations: Option<Vec<String>>,
}

/// Reports for every candidate of the input, in stream order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidateOutcome {
    pub verdict: Verdict,
    pub records: Vec<CandidateOutcome>,
}

impl ValidateOutcome {
    pub fn is_conforming(&self) -> bool {
        self.verdict == Verdict::Conforming
    }

    pub fn non_conforming_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| !record.report.is_conforming())
            .count()
    }
}

/// Parse `text` into candidates and validate them as one stream.
///
/// Errors only on malformed input; invariant failures are part of the outcome.
pub fn validate_text(
    text: &str,
    options: &ValidateOptions,
    profile: &Profile,
) -> Result<ValidateOutcome> {
    let candidates = parse_candidates(text)?;
    debug!(
        candidates = candidates.len(),
        prior = options.prior_timestamps.len(),
        "validating stream"
    );

    let reports = validate_stream(&candidates, &options.prior_timestamps, profile);
    let schema = if options.check_schema {
        Some(RecordSchema::compile()?)
    } else {
        None
    };
    let mut records = Vec::with_capacity(reports.len());
    for (candidate, report) in candidates.iter().zip(reports) {
        let schema_violations = schema.as_ref().map(|schema| schema.violations(candidate));
        records.push(CandidateOutcome {
            report,
            schema_violations,
        });
    }

    let verdict = if records.iter().all(|record| record.report.is_conforming()) {
        Verdict::Conforming
    } else {
        Verdict::NonConforming
    };
    let outcome = ValidateOutcome { verdict, records };
    info!(
        records = outcome.records.len(),
        non_conforming = outcome.non_conforming_count(),
        verdict = %outcome.verdict,
        "validation finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::InvariantId;
    use crate::test_support::candidate_json;

    fn run(text: &str) -> ValidateOutcome {
        validate_text(text, &ValidateOptions::default(), &Profile::reference()).expect("validate")
    }

    #[test]
    fn single_conforming_record() {
        let text = candidate_json(0.25, 0.70, 0.30, 0.20, 1000);
        let outcome = run(&text);
        assert!(outcome.is_conforming());
        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.records[0].schema_violations.is_none());
    }

    #[test]
    fn prior_timestamps_reach_the_first_record() {
        let text = candidate_json(0.5, 0.5, 0.5, 0.5, 150);
        let options = ValidateOptions {
            prior_timestamps: vec![100, 200],
            check_schema: false,
        };
        let outcome = validate_text(&text, &options, &Profile::reference()).expect("validate");
        assert!(!outcome.is_conforming());
        assert_eq!(outcome.records[0].report.failed(), vec![InvariantId::T1]);
    }

    #[test]
    fn stream_counts_non_conforming_records() {
        let text = [
            candidate_json(0.5, 0.5, 0.5, 0.5, 300),
            candidate_json(0.5, 0.5, 0.5, 0.5, 200),
            candidate_json(0.5, 0.5, 0.5, 0.5, 400),
        ]
        .join("\n");
        let outcome = run(&text);
        assert_eq!(outcome.verdict, Verdict::NonConforming);
        assert_eq!(outcome.non_conforming_count(), 1);
    }

    #[test]
    fn schema_check_is_advisory() {
        let text = candidate_json(0.5, 0.5, 0.5, 0.5, 10);
        let options = ValidateOptions {
            prior_timestamps: Vec::new(),
            check_schema: true,
        };
        let outcome = validate_text(&text, &options, &Profile::reference()).expect("validate");
        assert!(outcome.is_conforming());
        assert_eq!(outcome.records[0].schema_violations, Some(Vec::new()));
    }

    #[test]
    fn schema_diagnostics_cover_every_record_of_a_stream() {
        let mut extra = crate::test_support::candidate(0.5, 0.5, 0.5, 0.5, 20);
        extra.insert("extra".to_string(), serde_json::json!(true));
        let text = format!(
            "{}\n{}",
            candidate_json(0.5, 0.5, 0.5, 0.5, 10),
            serde_json::Value::Object(extra)
        );
        let options = ValidateOptions {
            prior_timestamps: Vec::new(),
            check_schema: true,
        };
        let outcome = validate_text(&text, &options, &Profile::reference()).expect("validate");
        assert_eq!(outcome.records[0].schema_violations, Some(Vec::new()));
        let second = outcome.records[1].schema_violations.as_ref().expect("checked");
        assert_eq!(second.len(), 1, "{second:?}");
    }

    #[test]
    fn malformed_input_is_an_error() {
        let err = validate_text("[1, 2]", &ValidateOptions::default(), &Profile::reference())
            .expect_err("malformed");
        assert!(err.to_string().contains("not a JSON object"));
    }

    #[test]
    fn json_outcome_flattens_report() {
        let text = candidate_json(0.5, 0.5, 0.5, 0.5, 10);
        let outcome = run(&text);
        let value = serde_json::to_value(&outcome).expect("serialize");
        assert_eq!(value["verdict"], "conforming");
        assert_eq!(value["records"][0]["verdict"], "conforming");
        assert_eq!(value["records"][0]["checks"][0]["id"], "INV-R1");
        assert!(value["records"][0].get("schema_violations").is_none());
    }
}
