//! Diagnostic logging for the CLI.
//!
//! Logs go to stderr so that stdout stays reserved for reports and CSV
//! output. `RUST_LOG` takes precedence over the configured level.

use tracing::Level;
use tracing_subscriber::EnvFilter;

pub fn parse_level(level: &str) -> Level {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" | "WARNING" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_level(level).as_str().to_lowercase()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(level = %parse_level(level), "logging initialized");
    }
}
