//! Structured logging setup for the `vui-source` CLI
//!
//! Initializes a `tracing` subscriber that writes to stderr, so stdout only
//! carries command output (source text, JSON, snippets).
//!
//! # Level selection
//!
//! 1. `--log-level <LEVEL>` on the command line
//! 2. `VUI_SOURCE_LOG` (full `EnvFilter` syntax)
//! 3. `RUST_LOG`
//! 4. `warn`
//!
//! The library itself never installs a subscriber; it only emits events.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Ensures logging is only initialized once
static INIT: Once = Once::new();

/// Environment variables holding a filter, in priority order
pub const LOG_ENV_VARS: &[&str] = &["VUI_SOURCE_LOG", "RUST_LOG"];

/// Configuration for logging initialization
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Explicit level; overrides the environment when set
    pub level: Option<Level>,

    /// Include the module target (e.g. `vui_source::source::resolver`)
    pub include_target: bool,

    /// Use ANSI colors
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            include_target: true,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(level: Level) -> Self {
        Self {
            level: Some(level),
            ..Default::default()
        }
    }
}

/// Parses a log level from a string, case-insensitively.
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

/// Build the filter for `config`, falling back to the environment.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    if let Some(level) = config.level {
        return EnvFilter::new(level.as_str().to_lowercase());
    }

    LOG_ENV_VARS
        .iter()
        .find_map(|var| EnvFilter::try_from_env(var).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

/// Initializes the logging system with the provided configuration
///
/// It can only be called once; subsequent calls are ignored.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = build_filter(&config);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.include_target)
                    .with_ansi(config.ansi),
            )
            .init();
    });
}
