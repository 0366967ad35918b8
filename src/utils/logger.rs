//! Logging utilities
//!
//! Diagnostics go to stderr so they never interleave with the report on stdout.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Build the filter; `RUST_LOG` wins over the requested level
fn build_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("llm_stress={level}")))
}

/// Initialize the logger with specified level
pub fn init_logger(level: Level) {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
