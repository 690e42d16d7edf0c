//! The twelve Runtime State Record invariants.
//!
//! Every check runs unconditionally against an untyped candidate object. A
//! missing or malformed field fails the checks that depend on it with an
//! explanatory message; validation itself never fails.

use serde_json::{Map, Value};

use crate::core::field::{CandidateFields, Field, FunctionFields};
use crate::core::profile::Profile;
use crate::core::record::SPEC_VERSION;
use crate::core::scoring::{in_unit_interval, scores_match};
use crate::core::types::{InvariantCheck, InvariantId, InvariantReport};
use crate::core::version::is_semver;

/// Validate one candidate against all twelve invariants.
///
/// `prior_timestamps` is the stream history used by INV-T1; an empty slice
/// means the candidate is the first record of its stream.
pub fn validate_candidate(
    candidate: &Map<String, Value>,
    prior_timestamps: &[u64],
    profile: &Profile,
) -> InvariantReport {
    let fields = CandidateFields::extract(candidate);
    let derived = fields.functions.valid().and_then(FunctionFields::values);

    InvariantReport::new(vec![
        check_function_ranges(&fields),
        check_score(
            InvariantId::R2,
            "stability_score",
            &fields.stability_score,
            derived.map(|f| profile.weights.stability_score(&f)),
        ),
        check_score(
            InvariantId::R3,
            "risk_score",
            &fields.risk_score,
            derived.map(|f| profile.weights.risk_score(&f)),
        ),
        check_timestamp_positive(&fields),
        check_mode(&fields, profile),
        check_risk_level(&fields, profile),
        check_joint_classification(&fields, profile),
        check_required_fields(&fields),
        check_no_extra_fields(&fields),
        check_spec_version(&fields),
        check_schema_version(&fields),
        check_monotonic(&fields, prior_timestamps),
    ])
}

/// Validate candidates as one ordered stream.
///
/// Each candidate sees `prior_timestamps` plus every usable timestamp of the
/// candidates before it.
pub fn validate_stream(
    candidates: &[Map<String, Value>],
    prior_timestamps: &[u64],
    profile: &Profile,
) -> Vec<InvariantReport> {
    let mut history = prior_timestamps.to_vec();
    let mut reports = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        reports.push(validate_candidate(candidate, &history, profile));
        if let Field::Valid(ts) = CandidateFields::extract(candidate).timestamp {
            history.push(ts);
        }
    }
    reports
}

fn check_function_ranges(fields: &CandidateFields) -> InvariantCheck {
    let id = InvariantId::R1;
    let functions = match &fields.functions {
        Field::Valid(functions) => functions,
        other => return InvariantCheck::fail(id, problem(other, "functions")),
    };

    let mut problems = Vec::new();
    for (name, value) in functions.named() {
        let label = format!("functions.{name}");
        match value {
            Field::Valid(v) if in_unit_interval(*v) => {}
            Field::Valid(v) => problems.push(format!("{label}={v} outside [0.0, 1.0]")),
            other => problems.push(problem(other, &label)),
        }
    }

    if problems.is_empty() {
        InvariantCheck::pass(id, "all function values in [0.0, 1.0]")
    } else {
        InvariantCheck::fail(id, problems.join("; "))
    }
}

fn check_score(
    id: InvariantId,
    name: &str,
    declared: &Field<f64>,
    derived: Option<f64>,
) -> InvariantCheck {
    let declared = match declared {
        Field::Valid(value) => *value,
        other => return InvariantCheck::fail(id, problem(other, name)),
    };
    if !in_unit_interval(declared) {
        return InvariantCheck::fail(id, format!("{name}={declared} outside [0.0, 1.0]"));
    }
    match derived {
        None => InvariantCheck::fail(
            id,
            format!("{name}={declared} cannot be re-derived: function values incomplete"),
        ),
        Some(expected) if scores_match(declared, expected) => {
            InvariantCheck::pass(id, format!("{name}={declared} matches re-derived value"))
        }
        Some(expected) => InvariantCheck::fail(
            id,
            format!("{name}={declared} but function values derive {expected}"),
        ),
    }
}

fn check_timestamp_positive(fields: &CandidateFields) -> InvariantCheck {
    let id = InvariantId::R4;
    match &fields.timestamp {
        Field::Valid(0) => InvariantCheck::fail(id, "timestamp=0 must be > 0"),
        Field::Valid(ts) => InvariantCheck::pass(id, format!("timestamp={ts}")),
        other => InvariantCheck::fail(id, problem(other, "timestamp")),
    }
}

fn check_mode(fields: &CandidateFields, profile: &Profile) -> InvariantCheck {
    let id = InvariantId::C1;
    let (risk_score, mode) = match (&fields.risk_score, &fields.mode) {
        (Field::Valid(risk_score), Field::Valid(mode)) => (*risk_score, *mode),
        (risk_score, mode) => {
            return InvariantCheck::fail(
                id,
                joined([risk_score.problem("risk_score"), mode.problem("mode")]),
            );
        }
    };
    if let Some(outside) = outside_classification_domain(risk_score) {
        return InvariantCheck::fail(id, outside);
    }
    let expected = profile.bands.threshold_map(risk_score);
    if mode == expected {
        InvariantCheck::pass(id, format!("risk_score={risk_score} -> mode={mode}"))
    } else {
        InvariantCheck::fail(
            id,
            format!("risk_score={risk_score} -> expected mode={expected}, declared mode={mode}"),
        )
    }
}

fn check_risk_level(fields: &CandidateFields, profile: &Profile) -> InvariantCheck {
    let id = InvariantId::C2;
    let (mode, level) = match (&fields.mode, &fields.risk_level) {
        (Field::Valid(mode), Field::Valid(level)) => (*mode, *level),
        (mode, level) => {
            return InvariantCheck::fail(
                id,
                joined([mode.problem("mode"), level.problem("risk_level")]),
            );
        }
    };
    let expected = profile.bands.level_map(mode);
    if level == expected {
        InvariantCheck::pass(id, format!("mode={mode} -> risk_level={level}"))
    } else {
        InvariantCheck::fail(
            id,
            format!("mode={mode} -> expected risk_level={expected}, declared risk_level={level}"),
        )
    }
}

fn check_joint_classification(fields: &CandidateFields, profile: &Profile) -> InvariantCheck {
    let id = InvariantId::C3;
    let (risk_score, mode, level) =
        match (&fields.risk_score, &fields.mode, &fields.risk_level) {
            (Field::Valid(risk_score), Field::Valid(mode), Field::Valid(level)) => {
                (*risk_score, *mode, *level)
            }
            (risk_score, mode, level) => {
                return InvariantCheck::fail(
                    id,
                    joined([
                        risk_score.problem("risk_score"),
                        mode.problem("mode"),
                        level.problem("risk_level"),
                    ]),
                );
            }
        };

    if let Some(outside) = outside_classification_domain(risk_score) {
        return InvariantCheck::fail(id, outside);
    }
    let expected_mode = profile.bands.threshold_map(risk_score);
    let expected_level = profile.bands.level_map(expected_mode);
    if (mode, level) == (expected_mode, expected_level) {
        InvariantCheck::pass(
            id,
            format!("({mode}, {level}) is determined by risk_score={risk_score}"),
        )
    } else {
        InvariantCheck::fail(
            id,
            format!(
                "({mode}, {level}) inconsistent: risk_score={risk_score} determines ({expected_mode}, {expected_level})"
            ),
        )
    }
}

fn check_required_fields(fields: &CandidateFields) -> InvariantCheck {
    let id = InvariantId::S1;
    if fields.missing_keys.is_empty() {
        InvariantCheck::pass(id, "all eight required fields present")
    } else {
        InvariantCheck::fail(
            id,
            format!("missing required field(s): {}", fields.missing_keys.join(", ")),
        )
    }
}

fn check_no_extra_fields(fields: &CandidateFields) -> InvariantCheck {
    let id = InvariantId::S2;
    let mut extra = fields.unknown_keys.clone();
    if let Field::Valid(functions) = &fields.functions {
        extra.extend(
            functions
                .unknown_keys
                .iter()
                .map(|key| format!("functions.{key}")),
        );
    }
    if extra.is_empty() {
        InvariantCheck::pass(id, "no unrecognized fields")
    } else {
        InvariantCheck::fail(id, format!("unrecognized field(s): {}", extra.join(", ")))
    }
}

fn check_spec_version(fields: &CandidateFields) -> InvariantCheck {
    let id = InvariantId::S3;
    match &fields.spec_version {
        Field::Valid(version) if version == SPEC_VERSION => {
            InvariantCheck::pass(id, format!("spec_version={version}"))
        }
        Field::Valid(version) => InvariantCheck::fail(
            id,
            format!("spec_version={version}, expected {SPEC_VERSION}"),
        ),
        other => InvariantCheck::fail(id, problem(other, "spec_version")),
    }
}

fn check_schema_version(fields: &CandidateFields) -> InvariantCheck {
    let id = InvariantId::S4;
    match &fields.schema_version {
        Field::Valid(version) if is_semver(version) => {
            InvariantCheck::pass(id, format!("schema_version={version}"))
        }
        Field::Valid(version) => InvariantCheck::fail(
            id,
            format!("schema_version={version:?} is not a semantic version"),
        ),
        other => InvariantCheck::fail(id, problem(other, "schema_version")),
    }
}

fn check_monotonic(fields: &CandidateFields, prior_timestamps: &[u64]) -> InvariantCheck {
    let id = InvariantId::T1;
    let ts = match &fields.timestamp {
        Field::Valid(ts) => *ts,
        other => return InvariantCheck::fail(id, problem(other, "timestamp")),
    };
    match prior_timestamps.iter().max() {
        None => InvariantCheck::pass(id, format!("timestamp={ts} has no prior timestamps")),
        Some(&latest) if ts >= latest => {
            InvariantCheck::pass(id, format!("timestamp={ts} >= latest prior {latest}"))
        }
        Some(&latest) => InvariantCheck::fail(
            id,
            format!("timestamp={ts} precedes latest prior {latest}: stream is not monotonic"),
        ),
    }
}

/// The band table only classifies scores in [0.0, 1.0]; its saturation is
/// for the emitter, not evidence that a declared pair is consistent.
fn outside_classification_domain(risk_score: f64) -> Option<String> {
    (!in_unit_interval(risk_score))
        .then(|| format!("risk_score={risk_score} outside classification domain [0.0, 1.0]"))
}

fn problem<T>(field: &Field<T>, name: &str) -> String {
    field
        .problem(name)
        .unwrap_or_else(|| format!("{name} is valid"))
}

fn joined<const N: usize>(problems: [Option<String>; N]) -> String {
    problems.into_iter().flatten().collect::<Vec<_>>().join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Record;
    use crate::test_support::{candidate, functions};
    use serde_json::json;

    fn report_for(candidate: &Map<String, Value>, prior: &[u64]) -> InvariantReport {
        validate_candidate(candidate, prior, &Profile::reference())
    }

    fn passed(report: &InvariantReport, id: InvariantId) -> bool {
        report.check(id).expect("check present").passed
    }

    #[test]
    fn report_has_twelve_entries_in_order() {
        let report = report_for(&Map::new(), &[]);
        let ids: Vec<InvariantId> = report.checks.iter().map(|check| check.id).collect();
        assert_eq!(ids, InvariantId::ORDER.to_vec());
    }

    #[test]
    fn emitted_reference_record_conforms() {
        let record = Record::new(
            functions(0.25, 0.70, 0.30, 0.20),
            1_707_500_000,
            &Profile::reference(),
        );
        let report = report_for(&record.to_candidate(), &[]);
        assert!(report.is_conforming(), "{:?}", report.failed());
    }

    #[test]
    fn empty_object_fails_every_field_check_without_panicking() {
        let report = report_for(&Map::new(), &[]);
        let expected: Vec<InvariantId> = InvariantId::ORDER
            .into_iter()
            .filter(|id| *id != InvariantId::S2)
            .collect();
        assert_eq!(report.failed(), expected);
        let s1 = report.check(InvariantId::S1).expect("S1");
        assert!(s1.message.contains("spec_version"));
        assert!(s1.message.contains("risk_level"));
        let r4 = report.check(InvariantId::R4).expect("R4");
        assert_eq!(r4.message, "timestamp is missing");
    }

    #[test]
    fn out_of_range_function_fails_r1_only() {
        let record = Record::new(functions(1.5, 0.5, 0.5, 0.5), 1000, &Profile::reference());
        let report = report_for(&record.to_candidate(), &[]);
        assert_eq!(report.failed(), vec![InvariantId::R1]);
        let r1 = report.check(InvariantId::R1).expect("R1");
        assert!(r1.message.contains("functions.baseline=1.5"));
    }

    #[test]
    fn declared_score_mismatch_fails_rederivation() {
        let mut candidate = candidate(0.5, 0.5, 0.5, 0.5, 1000);
        candidate.insert("stability_score".to_string(), json!(0.58));
        let report = report_for(&candidate, &[]);
        assert!(!passed(&report, InvariantId::R2));
        assert!(passed(&report, InvariantId::R3));
        let r2 = report.check(InvariantId::R2).expect("R2");
        assert!(r2.message.contains("derive 0.5"), "{}", r2.message);
    }

    #[test]
    fn score_out_of_range_fails_before_rederivation() {
        let mut candidate = candidate(0.5, 0.5, 0.5, 0.5, 1000);
        candidate.insert("risk_score".to_string(), json!(1.5));
        let report = report_for(&candidate, &[]);
        let r3 = report.check(InvariantId::R3).expect("R3");
        assert!(!r3.passed);
        assert!(r3.message.contains("outside"));
    }

    #[test]
    fn saturated_classification_does_not_satisfy_c1_or_c3() {
        let mut candidate = candidate(0.5, 0.5, 0.5, 0.5, 1000);
        candidate.insert("risk_score".to_string(), json!(1.5));
        candidate.insert("mode".to_string(), json!("Halt"));
        candidate.insert("risk_level".to_string(), json!("L5"));
        let report = report_for(&candidate, &[]);
        assert_eq!(
            report.failed(),
            vec![InvariantId::R3, InvariantId::C1, InvariantId::C3]
        );
        for id in [InvariantId::C1, InvariantId::C3] {
            let check = report.check(id).expect("classification check");
            assert!(
                check.message.contains("risk_score=1.5 outside classification domain"),
                "{}",
                check.message
            );
        }

        candidate.insert("risk_score".to_string(), json!(-0.5));
        candidate.insert("mode".to_string(), json!("Optimal"));
        candidate.insert("risk_level".to_string(), json!("L1"));
        let report = report_for(&candidate, &[]);
        assert!(!passed(&report, InvariantId::C1));
        assert!(passed(&report, InvariantId::C2));
        assert!(!passed(&report, InvariantId::C3));
    }

    #[test]
    fn zero_and_negative_timestamps_fail_r4() {
        let report = report_for(&candidate(0.5, 0.5, 0.5, 0.5, 0), &[]);
        assert!(!passed(&report, InvariantId::R4));

        let mut negative = candidate(0.5, 0.5, 0.5, 0.5, 1);
        negative.insert("timestamp".to_string(), json!(-3));
        let report = report_for(&negative, &[]);
        assert!(!passed(&report, InvariantId::R4));
        assert!(!passed(&report, InvariantId::T1));
    }

    #[test]
    fn integral_float_timestamp_fails_r4_and_t1() {
        let mut candidate = candidate(0.5, 0.5, 0.5, 0.5, 1);
        candidate.insert("timestamp".to_string(), json!(1000.0));
        let report = report_for(&candidate, &[]);
        assert_eq!(report.failed(), vec![InvariantId::R4, InvariantId::T1]);
        let r4 = report.check(InvariantId::R4).expect("R4");
        assert!(r4.message.contains("expected integer"), "{}", r4.message);
    }

    #[test]
    fn wrong_mode_fails_c1_and_c3() {
        let mut candidate = candidate(0.5, 0.5, 0.5, 0.5, 1000);
        candidate.insert("mode".to_string(), json!("Alert"));
        candidate.insert("risk_level".to_string(), json!("L4"));
        let report = report_for(&candidate, &[]);
        assert!(!passed(&report, InvariantId::C1));
        assert!(passed(&report, InvariantId::C2));
        assert!(!passed(&report, InvariantId::C3));
    }

    #[test]
    fn wrong_level_fails_c2_and_c3() {
        let mut candidate = candidate(0.5, 0.5, 0.5, 0.5, 1000);
        candidate.insert("risk_level".to_string(), json!("L4"));
        let report = report_for(&candidate, &[]);
        assert!(passed(&report, InvariantId::C1));
        assert!(!passed(&report, InvariantId::C2));
        assert!(!passed(&report, InvariantId::C3));
    }

    #[test]
    fn unknown_mode_string_is_reported() {
        let mut candidate = candidate(0.5, 0.5, 0.5, 0.5, 1000);
        candidate.insert("mode".to_string(), json!("Panic"));
        let report = report_for(&candidate, &[]);
        let c1 = report.check(InvariantId::C1).expect("C1");
        assert!(!c1.passed);
        assert!(c1.message.contains("unknown mode 'Panic'"));
    }

    #[test]
    fn extra_field_fails_only_s2() {
        let mut candidate = candidate(0.25, 0.70, 0.30, 0.20, 1000);
        candidate.insert("extra".to_string(), json!(1));
        let report = report_for(&candidate, &[]);
        assert_eq!(report.failed(), vec![InvariantId::S2]);
        assert!(report.check(InvariantId::S2).expect("S2").message.contains("extra"));
    }

    #[test]
    fn extra_function_key_fails_s2() {
        let mut candidate = candidate(0.25, 0.70, 0.30, 0.20, 1000);
        candidate["functions"]["bonus"] = json!(0.1);
        let report = report_for(&candidate, &[]);
        assert_eq!(report.failed(), vec![InvariantId::S2]);
        let s2 = report.check(InvariantId::S2).expect("S2");
        assert!(s2.message.contains("functions.bonus"));
    }

    #[test]
    fn missing_function_value_fails_r1_r2_r3() {
        let mut candidate = candidate(0.25, 0.70, 0.30, 0.20, 1000);
        candidate["functions"]
            .as_object_mut()
            .expect("functions object")
            .remove("norm");
        let report = report_for(&candidate, &[]);
        assert_eq!(
            report.failed(),
            vec![InvariantId::R1, InvariantId::R2, InvariantId::R3]
        );
        let r1 = report.check(InvariantId::R1).expect("R1");
        assert!(r1.message.contains("functions.norm is missing"));
    }

    #[test]
    fn spec_and_schema_versions_are_checked() {
        let mut candidate = candidate(0.5, 0.5, 0.5, 0.5, 1000);
        candidate.insert("spec_version".to_string(), json!("pmatrix-4.0"));
        candidate.insert("schema_version".to_string(), json!("1.0"));
        let report = report_for(&candidate, &[]);
        assert_eq!(report.failed(), vec![InvariantId::S3, InvariantId::S4]);
    }

    #[test]
    fn prerelease_schema_version_passes() {
        let mut candidate = candidate(0.5, 0.5, 0.5, 0.5, 1000);
        candidate.insert("schema_version".to_string(), json!("1.1.0-rc.1+build.7"));
        assert!(report_for(&candidate, &[]).is_conforming());
    }

    #[test]
    fn stream_ordering_against_prior_timestamps() {
        let report = report_for(&candidate(0.5, 0.5, 0.5, 0.5, 150), &[100, 200]);
        let t1 = report.check(InvariantId::T1).expect("T1");
        assert!(!t1.passed);
        assert!(t1.message.contains("not monotonic"));

        let report = report_for(&candidate(0.5, 0.5, 0.5, 0.5, 250), &[100, 200]);
        assert!(passed(&report, InvariantId::T1));

        let report = report_for(&candidate(0.5, 0.5, 0.5, 0.5, 200), &[100, 200]);
        assert!(passed(&report, InvariantId::T1));
    }

    #[test]
    fn validate_stream_accumulates_history() {
        let candidates = vec![
            candidate(0.5, 0.5, 0.5, 0.5, 1000),
            candidate(0.5, 0.5, 0.5, 0.5, 1000),
            candidate(0.5, 0.5, 0.5, 0.5, 999),
            candidate(0.5, 0.5, 0.5, 0.5, 1001),
        ];
        let reports = validate_stream(&candidates, &[], &Profile::reference());
        let t1: Vec<bool> = reports
            .iter()
            .map(|report| passed(report, InvariantId::T1))
            .collect();
        assert_eq!(t1, vec![true, true, false, true]);
    }

    #[test]
    fn revalidation_is_idempotent() {
        let record = Record::new(functions(0.1, 0.9, 0.4, 0.6), 77, &Profile::reference());
        let candidate = record.to_candidate();
        assert_eq!(report_for(&candidate, &[10]), report_for(&candidate, &[10]));
    }
}
