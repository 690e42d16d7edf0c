//! Text rendering of validation outcomes.

use std::fmt::Write;

use crate::core::types::{InvariantReport, Verdict};
use crate::validate::ValidateOutcome;

/// Render `outcome` as `[PASS]`/`[FAIL]` lines followed by summary lines.
///
/// Streams with more than one record get a `record N:` header per record and
/// a final stream summary.
pub fn render_text(outcome: &ValidateOutcome) -> String {
    let mut out = String::new();
    let multiple = outcome.records.len() > 1;
    for (index, record) in outcome.records.iter().enumerate() {
        if multiple {
            if index > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "record {}:", index + 1);
        }
        render_report(&mut out, &record.report);
        if let Some(violations) = &record.schema_violations {
            for violation in violations {
                let _ = writeln!(out, "[SCHEMA] {violation}");
            }
        }
        out.push('\n');
        let _ = writeln!(out, "{}", summary_line(&record.report));
    }
    if multiple {
        out.push('\n');
        let _ = writeln!(
            out,
            "Stream: {} record(s), {} non-conforming — {}",
            outcome.records.len(),
            outcome.non_conforming_count(),
            outcome.verdict
        );
    }
    out
}

fn render_report(out: &mut String, report: &InvariantReport) {
    for check in &report.checks {
        let status = if check.passed { "PASS" } else { "FAIL" };
        let _ = writeln!(out, "[{status}] {} — {}", check.id, check.message);
    }
}

fn summary_line(report: &InvariantReport) -> String {
    match report.verdict {
        Verdict::Conforming => format!(
            "Result: conforming — all {} invariants satisfied.",
            report.checks.len()
        ),
        Verdict::NonConforming => {
            let failed: Vec<&str> = report.failed().into_iter().map(|id| id.as_str()).collect();
            format!(
                "Result: non-conforming — {} of {} invariants violated ({}).",
                failed.len(),
                report.checks.len(),
                failed.join(", ")
            )
        }
    }
}
