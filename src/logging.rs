//! Structured logging setup
//!
//! Initializes a `tracing` subscriber once per process. Logs go to stderr so
//! that machine-readable command output on stdout stays clean.
//!
//! Configuration sources, highest priority first:
//! - `RUST_LOG` for full filter directives
//! - `--log-level` / `--json-logs` on the command line
//! - `ROBOROCK_MAP_LOG_LEVEL` and `ROBOROCK_MAP_LOG_JSON`

use std::env;
use std::sync::Once;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

pub const LEVEL_ENV: &str = "ROBOROCK_MAP_LOG_LEVEL";
pub const JSON_ENV: &str = "ROBOROCK_MAP_LOG_JSON";

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Minimum level for this crate's own events
    pub level: Level,

    /// Emit JSON lines instead of human-readable text
    pub use_json: bool,

    pub include_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            use_json: false,
            include_target: false,
        }
    }
}

impl LoggingConfig {
    /// Read `ROBOROCK_MAP_LOG_LEVEL` and `ROBOROCK_MAP_LOG_JSON`, falling back
    /// to defaults.
    pub fn from_env() -> Self {
        let level = env::var(LEVEL_ENV)
            .ok()
            .and_then(|v| parse_level(&v))
            .unwrap_or(Level::WARN);
        let use_json = env::var(JSON_ENV)
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            level,
            use_json,
            include_target: level >= Level::DEBUG,
        }
    }
}

/// Parse a level name, case-insensitively.
pub fn parse_level(level_str: &str) -> Option<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" | "warning" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new(format!("roborock_map={}", config.level)),
        };

        if config.use_json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target),
                )
                .init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(config.include_target),
                )
                .init();
        }
    });
}
