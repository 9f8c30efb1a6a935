//! GitHub Actions context
//!
//! Variables sourced from the runner's default environment. Outputs are appended to the
//! file named by `GITHUB_OUTPUT`, falling back to the legacy `GITHUB_ENV` file on older
//! runners.

use crate::environment::console::ConsoleEcho;
use crate::environment::identity::{IdentityFields, RefType, RunIdentity};
use crate::environment::output::OutputSet;
use crate::environment::sink::{DelimiterToken, FileSinkOpener, OutputSinkWriter, SinkOpener};
use crate::environment::{CiEnvironment, CloseReport, EnvSource, PlatformType};
use crate::error::OutputError;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

pub const GITHUB_ACTIONS: &str = "GITHUB_ACTIONS";
pub const GITHUB_RUN_ID: &str = "GITHUB_RUN_ID";
pub const GITHUB_RUN_NUMBER: &str = "GITHUB_RUN_NUMBER";
pub const GITHUB_SHA: &str = "GITHUB_SHA";
pub const GITHUB_ACTOR: &str = "GITHUB_ACTOR";
pub const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
pub const GITHUB_REF_NAME: &str = "GITHUB_REF_NAME";
pub const GITHUB_REF_TYPE: &str = "GITHUB_REF_TYPE";
pub const RUNNER_TEMP: &str = "RUNNER_TEMP";
pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";
pub const GITHUB_ENV: &str = "GITHUB_ENV";

const ID_PREFIX: &str = "gha";
const DELIMITER_PREFIX: &str = "GHDELIM";

/// Environment context for GitHub Actions runners.
pub struct GitHubContext {
    identity: RunIdentity,
    destination: Option<PathBuf>,
    outputs: OutputSet,
    writer: OutputSinkWriter,
    console: ConsoleEcho,
}

impl GitHubContext {
    /// Build from the runner environment, writing to real files.
    pub fn from_env(env: &dyn EnvSource, console: ConsoleEcho) -> Self {
        Self::with_sink(env, console, Box::new(FileSinkOpener))
    }

    /// Build with a custom sink opener.
    pub fn with_sink(
        env: &dyn EnvSource,
        console: ConsoleEcho,
        opener: Box<dyn SinkOpener>,
    ) -> Self {
        let read = |key: &str| env.var(key).unwrap_or_default();

        let fields = IdentityFields {
            run_id: read(GITHUB_RUN_ID),
            run_number: read(GITHUB_RUN_NUMBER),
            commit_sha: read(GITHUB_SHA),
            actor: read(GITHUB_ACTOR),
            repository: read(GITHUB_REPOSITORY),
            ref_name: read(GITHUB_REF_NAME),
            ref_type: RefType::parse(&read(GITHUB_REF_TYPE)),
            scratch_dir: PathBuf::from(read(RUNNER_TEMP)),
        };

        debug!(
            run_id = %fields.run_id,
            run_number = %fields.run_number,
            sha = %fields.commit_sha,
            actor = %fields.actor,
            repository = %fields.repository,
            ref_name = %fields.ref_name,
            ref_type = ?fields.ref_type,
            "GitHub environment"
        );

        let delimiter = DelimiterToken::for_run(
            DELIMITER_PREFIX,
            &fields.run_id,
            &fields.run_number,
            std::process::id(),
        );
        let destination = resolve_destination(env);

        Self {
            identity: RunIdentity::new(ID_PREFIX, fields),
            destination,
            outputs: OutputSet::new(),
            writer: OutputSinkWriter::with_opener(delimiter, opener),
            console,
        }
    }

    pub fn delimiter(&self) -> &DelimiterToken {
        self.writer.delimiter()
    }
}

/// `GITHUB_OUTPUT`, else the legacy `GITHUB_ENV` file, else nothing.
fn resolve_destination(env: &dyn EnvSource) -> Option<PathBuf> {
    let non_empty = |key: &str| env.var(key).filter(|v| !v.is_empty());

    if let Some(path) = non_empty(GITHUB_OUTPUT) {
        debug!(path = %path, "Using GITHUB_OUTPUT for outputs");
        return Some(PathBuf::from(path));
    }

    warn!("GITHUB_OUTPUT environment variable is not set. Outputs will not be available in GitHub Actions.");
    match non_empty(GITHUB_ENV) {
        Some(path) => {
            info!(path = %path, "Using GITHUB_ENV as fallback for outputs");
            Some(PathBuf::from(path))
        }
        None => None,
    }
}

impl CiEnvironment for GitHubContext {
    fn platform(&self) -> PlatformType {
        PlatformType::GithubActions
    }

    fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    fn merge_outputs(&mut self, values: OutputSet) {
        self.outputs.merge(values);
    }

    fn pending_outputs(&self) -> &OutputSet {
        &self.outputs
    }

    fn close_output(&mut self) -> Result<CloseReport, OutputError> {
        if self.outputs.is_empty() {
            debug!("No outputs to write");
            return Ok(CloseReport {
                destination: self.destination.clone(),
                ..Default::default()
            });
        }

        let Some(path) = self.destination.clone() else {
            error!(
                pending = self.outputs.len(),
                "GITHUB_OUTPUT environment variable not set"
            );
            return Err(OutputError::SinkUnavailable {
                primary: GITHUB_OUTPUT,
                fallback: GITHUB_ENV,
            });
        };

        // Cleared before the drain: entries left unwritten by a failure are dropped.
        let outputs = self.outputs.take();
        let report = match self.writer.drain(&path, &outputs) {
            Ok(report) => report,
            Err(err) => {
                error!(
                    pending = outputs.len(),
                    error = %err,
                    "Output file write failed; pending outputs discarded"
                );
                return Err(err);
            }
        };

        let echoed = self.console.echo(&outputs);
        Ok(CloseReport {
            destination: Some(path),
            written: report.written,
            skipped: report.skipped,
            echoed,
        })
    }
}
