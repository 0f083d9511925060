//! Logging setup on top of `tracing-subscriber`.
//!
//! The level comes from `RUST_LOG` (default `info`), e.g.
//! `RUST_LOG=tide_estimator_lib=debug` to see cache hits and evictions.
//! Output goes to stderr so `--json` stdout stays machine-readable.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global subscriber for the binary.
///
/// ```no_run
/// tide_estimator_lib::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Verbose subscriber for tests; safe to call more than once.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
