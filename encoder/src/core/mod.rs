//! Deterministic, pure logic for encoding and validating records.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod classification;
pub mod field;
pub mod invariants;
pub mod profile;
pub mod record;
pub mod scoring;
pub mod types;
pub mod version;
