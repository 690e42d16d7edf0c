//! Reference encoder and validator for Runtime State Records.
//!
//! A record carries four normalized function values, two derived scores and
//! two classifications. The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (scoring, classification, the
//!   record model, the twelve invariants). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting helpers (clock, input reading, schema file).
//!
//! Orchestration modules ([`emit`], [`validate`], [`report`]) coordinate core
//! logic with I/O to implement CLI commands.

pub mod core;
pub mod emit;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod report;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
