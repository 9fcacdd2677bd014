//! Logging setup.
//!
//! Structured logging via the `tracing` crate. Level and format come from
//! environment variables (`QUAYSIDE_LOG`, `QUAYSIDE_LOG_FORMAT`) or an
//! explicit [`LoggingConfig`], with environment taking precedence.

use crate::error::SettingsError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off.
    pub level: String,
    /// Output format: json or text.
    pub format: String,
    /// Colored output (text format only).
    pub color: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            color: true,
        }
    }
}

/// Initialize the logging system. Diagnostics go to stderr so the settings
/// document on stdout stays machine-readable.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), SettingsError> {
    let filter = build_env_filter(config);
    let format = determine_format(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let base_subscriber = Registry::default().with(filter);

    if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_ansi(use_color)
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    Ok(())
}

fn build_env_filter(config: Option<&LoggingConfig>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env("QUAYSIDE_LOG") {
        return filter;
    }
    let level = config.map(|c| c.level.as_str()).unwrap_or("info");
    EnvFilter::new(level)
}

fn determine_format(config: Option<&LoggingConfig>) -> Result<String, SettingsError> {
    if let Ok(format) = std::env::var("QUAYSIDE_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }
    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    match format {
        "json" | "text" => Ok(format.to_string()),
        other => Err(SettingsError::Validation(format!(
            "invalid log format '{other}': expected json or text"
        ))),
    }
}
