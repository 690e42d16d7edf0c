//! Stable exit codes for encoder CLI commands.

/// Command succeeded; every validated record is conforming.
pub const OK: i32 = 0;
/// Malformed input, unreadable file, or other runtime error.
pub const INVALID: i32 = 1;
/// `validate` found at least one non-conforming record.
///
/// Code 2 is left to clap for usage errors.
pub const NONCONFORMING: i32 = 3;
