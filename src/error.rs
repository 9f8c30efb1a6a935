//! Error types for the tfci CI output protocol.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stage of the sink lifecycle at which an I/O failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStage {
    Open,
    Write,
    Flush,
}

impl fmt::Display for SinkStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkStage::Open => write!(f, "open"),
            SinkStage::Write => write!(f, "write"),
            SinkStage::Flush => write!(f, "flush"),
        }
    }
}

/// Output sink errors returned from `close_output`
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("No output destination configured: {primary} is not set and no {fallback} fallback is available")]
    SinkUnavailable {
        primary: &'static str,
        fallback: &'static str,
    },

    #[error("Failed to {stage} output destination {path:?}: {source}")]
    SinkWrite {
        path: PathBuf,
        stage: SinkStage,
        #[source]
        source: std::io::Error,
    },

    /// Raised by sink handles that can observe a failed release. The file-backed
    /// handle reports deferred write errors as `SinkWrite` at the flush stage instead.
    #[error("Failed to close output destination {path:?}: {source}")]
    SinkClose {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl OutputError {
    /// Stage at which a write error happened, if this is one.
    pub fn stage(&self) -> Option<SinkStage> {
        match self {
            OutputError::SinkWrite { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Crate-level errors surfaced to the CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
