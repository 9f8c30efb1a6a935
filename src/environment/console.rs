//! Legacy console protocol: `::set-output name=<key>::<value>` lines on stdout.
//!
//! Best-effort only. Later pipeline steps read the output file, not these lines.

use crate::environment::output::OutputSet;
use std::io::{self, Write};
use tracing::warn;

/// Escape a value the way workflow commands expect (`%`, CR and LF).
fn escape_command_value(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Format one legacy set-output line.
pub fn format_set_output(key: &str, value: &str) -> String {
    format!(
        "::set-output name={}::{}\n",
        escape_command_value(key),
        escape_command_value(value)
    )
}

/// Writes stdout-visible outputs with the legacy protocol.
pub struct ConsoleEcho {
    writer: Option<Box<dyn Write>>,
}

impl ConsoleEcho {
    pub fn stdout() -> Self {
        Self::to_writer(Box::new(io::stdout()))
    }

    pub fn to_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer: Some(writer),
        }
    }

    pub fn disabled() -> Self {
        Self { writer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }

    /// Echo every stdout-visible entry. Returns the number of lines written.
    pub fn echo(&mut self, outputs: &OutputSet) -> usize {
        let Some(writer) = self.writer.as_mut() else {
            return 0;
        };
        let mut echoed = 0;
        for (key, value) in outputs.iter().filter(|(_, v)| v.visible_on_stdout()) {
            if let Err(e) = writer.write_all(format_set_output(key, value.as_str()).as_bytes()) {
                warn!(key, error = %e, "Failed to echo output to console");
                return echoed;
            }
            echoed += 1;
        }
        if let Err(e) = writer.flush() {
            warn!(error = %e, "Failed to flush console output");
        }
        echoed
    }
}
