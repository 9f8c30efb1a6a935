//! Configuration System
//!
//! Layered configuration for the tfci CLI: defaults, a global file, a workspace file,
//! and `TFCI__*` environment overrides, in increasing precedence. An explicit config
//! file replaces both file layers.

use crate::environment::{EnvironmentOptions, PlatformSelection};
use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use merge::merge_policy::ENV_PREFIX;
pub use sources::global_file::global_config_path;
pub use sources::workspace_file::workspace_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfciConfig {
    /// CI output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// CI output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Echo outputs to stdout with `::set-output` lines
    #[serde(default = "default_true")]
    pub echo_stdout: bool,

    /// Force a platform (`github`, `generic`) instead of detecting it
    #[serde(default)]
    pub platform: PlatformSelection,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            echo_stdout: true,
            platform: PlatformSelection::Auto,
        }
    }
}

impl OutputConfig {
    /// Options for the environment factory.
    pub fn environment_options(&self) -> EnvironmentOptions {
        EnvironmentOptions {
            platform: self.platform,
            echo_stdout: self.echo_stdout,
        }
    }
}

impl TfciConfig {
    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::ConfigError(format!("Failed to render configuration: {}", e)))
    }
}
