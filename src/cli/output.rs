//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, OutputError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Output(OutputError::SinkUnavailable { .. }) => format!(
            "{}\nOutputs are only written when running inside a CI step that provides an output file.",
            e
        ),
        _ => e.to_string(),
    }
}
