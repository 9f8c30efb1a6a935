//! Terminal status classification reported as the `status` output.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Outcome of a command's remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Success,
    Error,
    Timeout,
    Noop,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "Success",
            Status::Error => "Error",
            Status::Timeout => "Timeout",
            Status::Noop => "Noop",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success | Status::Noop)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "success" => Ok(Status::Success),
            "error" => Ok(Status::Error),
            "timeout" => Ok(Status::Timeout),
            "noop" => Ok(Status::Noop),
            other => Err(format!(
                "unknown status '{}' (expected success, error, timeout or noop)",
                other
            )),
        }
    }
}
