//! Logging initialization for the admin tools.
//!
//! Thin wrapper over the observability package so binaries share one setup.

use observability::LogConfig;
use std::path::PathBuf;

/// Initialize the logging system.
///
/// - compact stderr output, level from `RUST_LOG` or `level`
/// - JSONL copy of every event in `log_file`, when given
///
/// ```ignore
/// init_logging("info", None);
/// tracing::info!("admin CLI started");
/// ```
pub fn init_logging(level: &str, log_file: Option<PathBuf>) {
    observability::init_with_config(LogConfig {
        service_name: "cms-admin".into(),
        default_level: parse_level(level).to_string().to_lowercase(),
        log_path: log_file,
        also_stderr: true,
    });
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
