//! Shared deterministic types for validation results.
//!
//! These types define the stable contract between the validator and whatever
//! renders its output. Check order is fixed so serialized reports are stable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one of the twelve record invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvariantId {
    #[serde(rename = "INV-R1")]
    R1,
    #[serde(rename = "INV-R2")]
    R2,
    #[serde(rename = "INV-R3")]
    R3,
    #[serde(rename = "INV-R4")]
    R4,
    #[serde(rename = "INV-C1")]
    C1,
    #[serde(rename = "INV-C2")]
    C2,
    #[serde(rename = "INV-C3")]
    C3,
    #[serde(rename = "INV-S1")]
    S1,
    #[serde(rename = "INV-S2")]
    S2,
    #[serde(rename = "INV-S3")]
    S3,
    #[serde(rename = "INV-S4")]
    S4,
    #[serde(rename = "INV-T1")]
    T1,
}

impl InvariantId {
    /// Display order of a report.
    pub const ORDER: [InvariantId; 12] = [
        InvariantId::R1,
        InvariantId::R2,
        InvariantId::R3,
        InvariantId::R4,
        InvariantId::C1,
        InvariantId::C2,
        InvariantId::C3,
        InvariantId::S1,
        InvariantId::S2,
        InvariantId::S3,
        InvariantId::S4,
        InvariantId::T1,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            InvariantId::R1 => "INV-R1",
            InvariantId::R2 => "INV-R2",
            InvariantId::R3 => "INV-R3",
            InvariantId::R4 => "INV-R4",
            InvariantId::C1 => "INV-C1",
            InvariantId::C2 => "INV-C2",
            InvariantId::C3 => "INV-C3",
            InvariantId::S1 => "INV-S1",
            InvariantId::S2 => "INV-S2",
            InvariantId::S3 => "INV-S3",
            InvariantId::S4 => "INV-S4",
            InvariantId::T1 => "INV-T1",
        }
    }
}

impl fmt::Display for InvariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one invariant check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantCheck {
    pub id: InvariantId,
    pub passed: bool,
    pub message: String,
}

impl InvariantCheck {
    pub fn pass(id: InvariantId, message: impl Into<String>) -> Self {
        Self {
            id,
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(id: InvariantId, message: impl Into<String>) -> Self {
        Self {
            id,
            passed: false,
            message: message.into(),
        }
    }
}

/// Overall outcome of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Conforming,
    NonConforming,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Conforming => "conforming",
            Verdict::NonConforming => "non-conforming",
        })
    }
}

/// Full per-invariant report for one candidate, always twelve entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantReport {
    pub verdict: Verdict,
    pub checks: Vec<InvariantCheck>,
}

impl InvariantReport {
    pub fn new(checks: Vec<InvariantCheck>) -> Self {
        let verdict = if checks.iter().all(|check| check.passed) {
            Verdict::Conforming
        } else {
            Verdict::NonConforming
        };
        Self { verdict, checks }
    }

    pub fn is_conforming(&self) -> bool {
        self.verdict == Verdict::Conforming
    }

    pub fn check(&self, id: InvariantId) -> Option<&InvariantCheck> {
        self.checks.iter().find(|check| check.id == id)
    }

    /// Ids of failed checks, in report order.
    pub fn failed(&self) -> Vec<InvariantId> {
        self.checks
            .iter()
            .filter(|check| !check.passed)
            .map(|check| check.id)
            .collect()
    }
}
