//! CLI route: single route table and run context. Dispatches to the command layer and
//! presentation.

use crate::cli::parse::Commands;
use crate::cli::presentation::{
    format_close_summary_json, format_close_summary_text, format_identity_json,
    format_identity_text,
};
use crate::command::{CommandContext, Status};
use crate::config::TfciConfig;
use crate::environment::{CiEnvironment, OutputOpts, OutputSet, OutputValue, PlatformType};
use crate::error::ApiError;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, info_span, warn};

/// Runtime context for CLI execution: effective configuration and the command context
/// bound to this process's CI environment.
pub struct RunContext {
    config: TfciConfig,
    commands: CommandContext,
}

impl RunContext {
    pub fn new(config: TfciConfig, environment: Box<dyn CiEnvironment>) -> Self {
        Self {
            config,
            commands: CommandContext::new(environment),
        }
    }

    pub fn platform(&self) -> PlatformType {
        self.commands.environment().platform()
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&mut self, command: &Commands) -> Result<String, ApiError> {
        let span = info_span!("command", name = crate::cli::command_name(command));
        let _enter = span.enter();

        match command {
            Commands::Identity { format } => {
                let environment = self.commands.environment();
                match format.as_str() {
                    "json" => format_identity_json(environment),
                    _ => Ok(format_identity_text(environment)),
                }
            }
            Commands::Output {
                set,
                file,
                json,
                multiline,
                hidden,
                status,
                format,
            } => {
                let outputs = build_output_set(set, file, json, multiline, hidden)?;
                self.handle_output(outputs, *status, format)
            }
            Commands::Config => self.config.to_toml(),
        }
    }

    fn handle_output(
        &mut self,
        outputs: OutputSet,
        status: Status,
        format: &str,
    ) -> Result<String, ApiError> {
        debug!(count = outputs.len(), status = %status, "Recording outputs");
        self.commands.record_status(status);
        for (key, value) in outputs {
            self.commands.add_output_with_opts(key, value.as_str(), value.opts());
        }
        let closed = self.commands.close_output()?;
        info!(
            written = closed.report.written.len(),
            echoed = closed.report.echoed,
            status = %status,
            "Outputs closed"
        );
        if !status.is_success() {
            warn!(status = %status, "Recorded a non-success status");
        }

        match format {
            "json" => format_close_summary_json(&closed),
            _ => Ok(format_close_summary_text(&closed)),
        }
    }
}

/// Split `KEY=VALUE` at the first `=` and validate the key.
pub fn parse_assignment(raw: &str) -> Result<(String, String), ApiError> {
    let (key, value) = raw.split_once('=').ok_or_else(|| {
        ApiError::InvalidArgument(format!("expected KEY=VALUE, got '{}'", raw))
    })?;
    validate_key(key)?;
    Ok((key.to_string(), value.to_string()))
}

fn validate_key(key: &str) -> Result<(), ApiError> {
    if key.is_empty() {
        return Err(ApiError::InvalidArgument(
            "output key must not be empty".to_string(),
        ));
    }
    let bad_char = |c: char| c == '=' || c.is_whitespace() || c.is_control();
    if key.contains("<<") || key.chars().any(bad_char) {
        return Err(ApiError::InvalidArgument(format!(
            "invalid output key '{}': keys must not contain '=', '<<', whitespace or control characters",
            key
        )));
    }
    Ok(())
}

fn read_payload_file(key: &str, path: &str) -> Result<String, ApiError> {
    std::fs::read_to_string(Path::new(path)).map_err(|e| {
        ApiError::InvalidArgument(format!(
            "failed to read value for '{}' from {}: {}",
            key, path, e
        ))
    })
}

/// Build the output set from CLI flags. Inline values are applied first, then files,
/// then JSON values; a key given twice keeps its last value.
fn build_output_set(
    set: &[String],
    file: &[String],
    json: &[String],
    multiline: &[String],
    hidden: &[String],
) -> Result<OutputSet, ApiError> {
    let mut outputs = OutputSet::new();

    for raw in set {
        let (key, value) = parse_assignment(raw)?;
        outputs.insert(key, value);
    }
    for raw in file {
        let (key, path) = parse_assignment(raw)?;
        let payload = read_payload_file(&key, &path)?;
        outputs.insert(key, payload);
    }
    for raw in json {
        let (key, raw_json) = parse_assignment(raw)?;
        let value: serde_json::Value = serde_json::from_str(&raw_json).map_err(|e| {
            ApiError::InvalidArgument(format!("value for '{}' is not valid JSON: {}", key, e))
        })?;
        outputs.insert(key, OutputValue::json(&value)?);
    }

    for key in multiline.iter().chain(hidden.iter()) {
        if !outputs.contains_key(key) {
            return Err(ApiError::InvalidArgument(format!(
                "'{}' does not name an output given with --set, --file or --json",
                key
            )));
        }
    }

    let multiline: HashSet<&str> = multiline.iter().map(String::as_str).collect();
    let hidden: HashSet<&str> = hidden.iter().map(String::as_str).collect();
    Ok(outputs
        .into_iter()
        .map(|(key, value)| {
            let opts = value.opts();
            let opts = OutputOpts {
                multiline: opts.multiline || multiline.contains(key.as_str()),
                stdout: opts.stdout && !hidden.contains(key.as_str()),
                platform_file: opts.platform_file,
            };
            let value = OutputValue::with_opts(value.as_str(), opts);
            (key, value)
        })
        .collect())
}
