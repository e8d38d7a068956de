//! Diagnostic logging to stderr. Never shares the render or status surface.

use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_VAR: &str = "DEBATE_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn,debate_stream=info,debate_cli=info";

/// Filter from `DEBATE_LOG`, then `RUST_LOG`, then [`DEFAULT_LOG_FILTER`].
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
