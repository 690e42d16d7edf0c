//! I/O helpers for encoder commands.

pub mod clock;
pub mod input;
pub mod schema;
