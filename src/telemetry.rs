//! Logging initialization.
//!
//! Structured logs go to stderr so the report stream on stdout stays
//! machine-consumable. Verbosity is controlled by `RUST_LOG` (standard
//! `EnvFilter` syntax); the default level is `warn` so non-fatal conditions
//! are visible without drowning the report.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Call once at program start. A second call is a no-op (the global
/// subscriber can only be set once).
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
