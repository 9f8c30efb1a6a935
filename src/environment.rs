//! CI Environment Context
//!
//! The contract a command uses to talk to the CI platform it runs under: an immutable
//! run identity captured at startup, an accumulating set of named outputs, and a
//! platform-specific sink the outputs are flushed to when the command finishes.
//!
//! One context exists per process. It is built once by [`build_environment`] and is
//! not shared across threads.

use crate::error::OutputError;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod console;
pub mod factory;
pub mod generic;
pub mod github;
pub mod identity;
pub mod output;
pub mod sink;

pub use console::{format_set_output, ConsoleEcho};
pub use factory::{build_environment, detect_platform, EnvironmentOptions, PlatformSelection};
pub use generic::GenericContext;
pub use github::GitHubContext;
pub use identity::{IdentityFields, RefType, RunIdentity};
pub use output::{OutputOpts, OutputSet, OutputValue};
pub use sink::{
    encode_entry, DelimiterToken, FileSinkOpener, OutputSinkWriter, SinkHandle, SinkOpener,
    WriteReport,
};

/// Source of environment variables.
///
/// Any `Fn(&str) -> Option<String>` works, which keeps tests free of process-global state.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

impl<F> EnvSource for F
where
    F: Fn(&str) -> Option<String>,
{
    fn var(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Read a variable from the process environment. Empty values count as unset.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// CI platform a context targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformType {
    GithubActions,
    Generic,
}

impl PlatformType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformType::GithubActions => "github-actions",
            PlatformType::Generic => "generic",
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful `close_output` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CloseReport {
    /// Platform file the outputs were appended to, if any
    pub destination: Option<PathBuf>,
    /// Keys written to the platform file, in write order
    pub written: Vec<String>,
    /// Entries not marked for the platform file
    pub skipped: usize,
    /// Entries echoed to the console with the legacy protocol
    pub echoed: usize,
}

impl CloseReport {
    pub fn is_empty(&self) -> bool {
        self.written.is_empty() && self.skipped == 0 && self.echoed == 0
    }
}

/// Capability contract every CI platform variant implements.
pub trait CiEnvironment {
    /// Platform this context writes to.
    fn platform(&self) -> PlatformType;

    /// Immutable snapshot of the run metadata.
    fn identity(&self) -> &RunIdentity;

    /// Resolved output destination, if the platform provided one.
    fn destination(&self) -> Option<&Path>;

    /// Union `values` into the pending outputs. Last write wins per key.
    fn merge_outputs(&mut self, values: OutputSet);

    /// Outputs queued for the next `close_output`.
    fn pending_outputs(&self) -> &OutputSet;

    /// Flush pending outputs to the platform sink and clear them.
    fn close_output(&mut self) -> Result<CloseReport, OutputError>;
}
