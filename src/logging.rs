//! Diagnostic logging to stderr.
//!
//! stdout belongs to the MCP transport, so every log line goes to stderr.
//! The filter comes from `RUST_LOG` and defaults to `info`.

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call (tests, embedding) keeps the first subscriber.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
