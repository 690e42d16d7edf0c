//! Diagnostic tracing for the encoder binary.
//!
//! Only `main` installs the subscriber; library code just emits `tracing`
//! events (`emit` and `validate` at debug/info, input reading at debug).
//! Records, reports and the schema go to stdout and never pass through the
//! filter, so `RUST_LOG` cannot change what `emit` or `validate` print.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Level used when `RUST_LOG` is unset or unparseable.
const DEFAULT_FILTER: &str = "warn";

/// Install the stderr subscriber for the `pmatrix-encoder` binary.
///
/// ```bash
/// RUST_LOG=pmatrix_encoder=debug pmatrix-encoder validate --input records.jsonl
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
