//! Logging setup for the CLI.
//!
//! Responses go to stdout, so every log line goes to stderr. `RUST_LOG`
//! takes precedence over the `[logging]` config section.

use omni_core::config::LoggingConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Resolved logging choices after config and CLI flags are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub json: bool,
}

impl LogSettings {
    /// `--verbose` raises the configured level to at least debug; it never
    /// lowers `trace`.
    pub fn resolve(config: &LoggingConfig, verbose: bool, json_logs: bool) -> Self {
        let configured = config.level.parse().unwrap_or(LevelFilter::INFO);
        let level = if verbose {
            configured.max(LevelFilter::DEBUG)
        } else {
            configured
        };
        Self {
            level,
            json: json_logs || config.format.eq_ignore_ascii_case("json"),
        }
    }
}

/// Install the global subscriber.
pub fn init(settings: LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.to_string()));
    let registry = tracing_subscriber::registry().with(filter);

    if settings.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
