//! Semantic version grammar for `schema_version`.

use std::sync::LazyLock;

use regex::Regex;

/// Semantic Versioning 2.0.0: `MAJOR.MINOR.PATCH[-prerelease][+build]`, no
/// leading zeros in numeric identifiers. Digits are ASCII only; `\d` would
/// match any Unicode digit.
static SEMVER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)",
        r"(?:-((?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)",
        r"(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*))?",
        r"(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    ))
    .unwrap()
});

/// True if `version` is a valid semantic version string.
pub fn is_semver(version: &str) -> bool {
    SEMVER_RE.is_match(version)
}
