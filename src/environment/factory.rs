//! Environment factory: picks the context variant for the detected platform.

use crate::environment::console::ConsoleEcho;
use crate::environment::generic::GenericContext;
use crate::environment::github::{GitHubContext, GITHUB_ACTIONS};
use crate::environment::{CiEnvironment, EnvSource, PlatformType};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Platform choice from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformSelection {
    /// Detect from signature environment variables
    #[default]
    Auto,
    Github,
    Generic,
}

impl std::str::FromStr for PlatformSelection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "auto" => Ok(PlatformSelection::Auto),
            "github" | "github-actions" => Ok(PlatformSelection::Github),
            "generic" => Ok(PlatformSelection::Generic),
            other => Err(format!(
                "unknown platform '{}' (expected auto, github or generic)",
                other
            )),
        }
    }
}

/// Options the factory applies to every context it builds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentOptions {
    pub platform: PlatformSelection,
    /// Echo stdout-visible outputs with the legacy console protocol
    pub echo_stdout: bool,
}

impl Default for EnvironmentOptions {
    fn default() -> Self {
        Self {
            platform: PlatformSelection::Auto,
            echo_stdout: true,
        }
    }
}

/// Detect the CI platform from its signature variables.
pub fn detect_platform(env: &dyn EnvSource) -> PlatformType {
    match env.var(GITHUB_ACTIONS).as_deref() {
        Some(value) if value.eq_ignore_ascii_case("true") => PlatformType::GithubActions,
        _ => PlatformType::Generic,
    }
}

/// Build the environment context for this process.
pub fn build_environment(
    env: &dyn EnvSource,
    options: &EnvironmentOptions,
) -> Box<dyn CiEnvironment> {
    let platform = match options.platform {
        PlatformSelection::Auto => detect_platform(env),
        PlatformSelection::Github => PlatformType::GithubActions,
        PlatformSelection::Generic => PlatformType::Generic,
    };
    debug!(platform = %platform, selection = ?options.platform, "Building environment context");

    let console = if options.echo_stdout {
        ConsoleEcho::stdout()
    } else {
        ConsoleEcho::disabled()
    };

    match platform {
        PlatformType::GithubActions => Box::new(GitHubContext::from_env(env, console)),
        PlatformType::Generic => Box::new(GenericContext::new(console)),
    }
}
