//! Console logging
//!
//! Logs go to stderr so that the panel printed on stdout stays readable.

use stsconfig::Config;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Parses a level name as written in the configuration ("INFO", "debug"...)
pub fn string_to_level(level: &str) -> Option<Level> {
    match level.trim().to_uppercase().as_str() {
        "TRACE" => Some(Level::TRACE),
        "DEBUG" => Some(Level::DEBUG),
        "INFO" => Some(Level::INFO),
        "WARN" | "WARNING" => Some(Level::WARN),
        "ERROR" => Some(Level::ERROR),
        _ => None,
    }
}

/// Installs the global subscriber
///
/// `RUST_LOG` wins over `host.logger.min_level`.
pub fn init_logging(config: &Config) {
    let level = config
        .get_log_min_level()
        .ok()
        .and_then(|l| string_to_level(&l))
        .unwrap_or(Level::INFO);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let ansi = config.get_log_ansi().unwrap_or(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(ansi)
                .with_writer(std::io::stderr),
        )
        .init();
}
