//! Command context: collects a command's outputs and hands them to the environment.

use crate::command::status::Status;
use crate::environment::{CiEnvironment, CloseReport, OutputOpts, OutputSet, OutputValue};
use crate::error::{ApiError, OutputError};
use serde::Serialize;
use tracing::debug;

/// Output key carrying the terminal status
pub const STATUS_KEY: &str = "status";

/// Outputs flushed by a successful close, with the sink report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosedOutputs {
    pub outputs: OutputSet,
    pub report: CloseReport,
}

/// Per-command output recorder bound to the process environment context.
pub struct CommandContext {
    environment: Box<dyn CiEnvironment>,
    outputs: OutputSet,
}

impl CommandContext {
    pub fn new(environment: Box<dyn CiEnvironment>) -> Self {
        Self {
            environment,
            outputs: OutputSet::new(),
        }
    }

    pub fn environment(&self) -> &dyn CiEnvironment {
        self.environment.as_ref()
    }

    /// Outputs recorded since the last close.
    pub fn outputs(&self) -> &OutputSet {
        &self.outputs
    }

    pub fn add_output(&mut self, key: impl Into<String>, payload: impl Into<String>) {
        self.outputs.insert(key, OutputValue::new(payload));
    }

    pub fn add_output_with_opts(
        &mut self,
        key: impl Into<String>,
        payload: impl Into<String>,
        opts: OutputOpts,
    ) {
        self.outputs.insert(key, OutputValue::with_opts(payload, opts));
    }

    /// Record a structured payload as JSON.
    pub fn add_json_output<T: Serialize + ?Sized>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<(), ApiError> {
        self.outputs.insert(key, OutputValue::json(value)?);
        Ok(())
    }

    pub fn record_status(&mut self, status: Status) {
        self.add_output(STATUS_KEY, status.as_str());
    }

    /// Hand recorded outputs to the environment and flush them to the platform sink.
    pub fn close_output(&mut self) -> Result<ClosedOutputs, OutputError> {
        let outputs = self.outputs.take();
        debug!(count = outputs.len(), "Closing command outputs");
        self.environment.merge_outputs(outputs.clone());
        let report = self.environment.close_output()?;
        Ok(ClosedOutputs { outputs, report })
    }

    /// Record `status` and close output.
    pub fn finish(&mut self, status: Status) -> Result<ClosedOutputs, OutputError> {
        self.record_status(status);
        self.close_output()
    }
}
