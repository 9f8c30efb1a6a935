//! Console-only context for runs outside a recognized CI platform.
//!
//! There is no platform output file; outputs are echoed to the console and dropped.

use crate::environment::console::ConsoleEcho;
use crate::environment::identity::{IdentityFields, RunIdentity};
use crate::environment::output::OutputSet;
use crate::environment::{CiEnvironment, CloseReport, PlatformType};
use crate::error::OutputError;
use std::path::Path;
use tracing::debug;

const ID_PREFIX: &str = "local";

pub struct GenericContext {
    identity: RunIdentity,
    outputs: OutputSet,
    console: ConsoleEcho,
}

impl GenericContext {
    /// Identity uses the process id as run id and the system temp dir as scratch space.
    pub fn new(console: ConsoleEcho) -> Self {
        let identity = RunIdentity::new(
            ID_PREFIX,
            IdentityFields {
                run_id: std::process::id().to_string(),
                run_number: "0".to_string(),
                scratch_dir: std::env::temp_dir(),
                ..Default::default()
            },
        );
        Self {
            identity,
            outputs: OutputSet::new(),
            console,
        }
    }
}

impl CiEnvironment for GenericContext {
    fn platform(&self) -> PlatformType {
        PlatformType::Generic
    }

    fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    fn destination(&self) -> Option<&Path> {
        None
    }

    fn merge_outputs(&mut self, values: OutputSet) {
        self.outputs.merge(values);
    }

    fn pending_outputs(&self) -> &OutputSet {
        &self.outputs
    }

    fn close_output(&mut self) -> Result<CloseReport, OutputError> {
        let outputs = self.outputs.take();
        debug!(count = outputs.len(), "No platform output file; echoing outputs only");
        let skipped = outputs
            .iter()
            .filter(|(_, v)| !v.visible_in_platform_file())
            .count();
        let echoed = self.console.echo(&outputs);
        Ok(CloseReport {
            destination: None,
            written: Vec::new(),
            skipped,
            echoed,
        })
    }
}
