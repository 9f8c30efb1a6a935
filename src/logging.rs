//! Logging System
//!
//! Structured logging using the `tracing` crate. Logs always go to stderr so stdout
//! stays reserved for command results and the legacy console output protocol.
//!
//! Level and format come from `TF_LOG` and `TF_LOG_FORMAT`, with CLI flags on top.

use crate::environment::EnvSource;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::{ChronoLocal, ChronoUtc};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable controlling the log level
pub const ENV_LOG_LEVEL: &str = "TF_LOG";
/// Environment variable controlling the log format
pub const ENV_LOG_FORMAT: &str = "TF_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off, or a filter directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: console, json
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output (console format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "console".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

impl LoggingConfig {
    /// Apply `TF_LOG` and `TF_LOG_FORMAT` when set.
    pub fn apply_env(&mut self, env: &dyn EnvSource) {
        if let Some(level) = env.var(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.level = level;
        }
        if let Some(format) = env.var(ENV_LOG_FORMAT).filter(|v| !v.is_empty()) {
            self.format = format;
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogFormat {
    Console,
    Json,
}

fn parse_format(format: &str) -> Result<LogFormat, ApiError> {
    match format.to_ascii_lowercase().as_str() {
        "console" | "text" => Ok(LogFormat::Console),
        "json" => Ok(LogFormat::Json),
        other => Err(ApiError::ConfigError(format!(
            "Invalid log format: {} (must be 'console' or 'json')",
            other
        ))),
    }
}

/// Map a level name to a filter directive. Unknown names fall back to `info`;
/// anything that looks like a directive list is passed through.
fn level_directive(level: &str) -> String {
    match level.trim().to_ascii_uppercase().as_str() {
        "TRACE" => "trace".to_string(),
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARN" | "WARNING" => "warn".to_string(),
        "ERROR" => "error".to_string(),
        "OFF" => "off".to_string(),
        _ if level.contains('=') || level.contains(',') => level.trim().to_string(),
        _ => "info".to_string(),
    }
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    let directive = level_directive(&config.level);
    EnvFilter::try_new(&directive)
        .map_err(|e| ApiError::ConfigError(format!("Invalid log directive '{}': {}", directive, e)))
}

/// Initialize the global subscriber. Fails if one is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), ApiError> {
    let default_config = LoggingConfig::default();
    let config = config.unwrap_or(&default_config);

    let filter = build_env_filter(config)?;
    let format = parse_format(&config.format)?;
    let base_subscriber = Registry::default().with(filter);

    let result = match format {
        LogFormat::Json => base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Console => base_subscriber
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoLocal::new("%H:%M:%S".to_string()))
                    .with_ansi(config.color)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| ApiError::ConfigError(format!("Failed to initialize logging: {}", e)))
}
