//! Output sink writer
//!
//! Serializes an output set to the platform's output file. Each entry is encoded as
//! either a single `key=value` line or, when the payload spans lines (or is flagged
//! multiline), a delimited block:
//!
//! ```text
//! key<<DELIM
//! payload
//! DELIM
//! ```
//!
//! The destination is opened in append mode because it is shared by every step of a
//! pipeline run. There is no file locking; the per-process delimiter is the only thing
//! keeping blocks from two writers apart.

use crate::environment::output::{OutputSet, OutputValue};
use crate::error::{OutputError, SinkStage};
use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, error};

pub const EOF: &str = "\n";

/// Run-scoped token bounding multi-line payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimiterToken(String);

impl DelimiterToken {
    /// Build `<prefix>_<run id>_<run number>_<pid>`.
    pub fn for_run(prefix: &str, run_id: &str, run_number: &str, pid: u32) -> Self {
        Self(format!("{}_{}_{}_{}", prefix, run_id, run_number, pid))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Delimiter to use for `payload`.
    ///
    /// Returns the base token unless some line of the payload equals it, in which case a
    /// numeric suffix is appended until no line matches.
    pub fn for_payload(&self, payload: &str) -> Cow<'_, str> {
        if !collides(payload, &self.0) {
            return Cow::Borrowed(&self.0);
        }
        let mut attempt = 1u32;
        loop {
            let candidate = format!("{}_{}", self.0, attempt);
            if !collides(payload, &candidate) {
                debug!(
                    delimiter = %candidate,
                    "Payload contains the output delimiter; using extended delimiter"
                );
                return Cow::Owned(candidate);
            }
            attempt += 1;
        }
    }
}

fn collides(payload: &str, delimiter: &str) -> bool {
    payload.split(&['\n', '\r'][..]).any(|line| line == delimiter)
}

/// Encode one entry in the platform file format.
pub fn encode_entry(key: &str, value: &OutputValue, delimiter: &DelimiterToken) -> String {
    let payload = value.as_str();
    if value.needs_delimited_block() {
        let delim = delimiter.for_payload(payload);
        format!("{key}<<{delim}{EOF}{payload}{EOF}{delim}{EOF}")
    } else {
        format!("{key}={payload}{EOF}")
    }
}

/// An open output destination.
pub trait SinkHandle {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Flush written data to stable storage.
    fn sync(&mut self) -> io::Result<()>;

    /// Release the handle.
    fn close(self: Box<Self>) -> io::Result<()>;
}

/// Opens output destinations for appending.
pub trait SinkOpener {
    fn open_append(&self, path: &Path) -> io::Result<Box<dyn SinkHandle>>;
}

/// Opens real files, creating them when absent.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSinkOpener;

impl SinkOpener for FileSinkOpener {
    fn open_append(&self, path: &Path) -> io::Result<Box<dyn SinkHandle>> {
        let mut options = OpenOptions::new();
        options.append(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }
        let file = options.open(path)?;
        Ok(Box::new(FileSink { file }))
    }
}

struct FileSink {
    file: File,
}

impl SinkHandle for FileSink {
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.file.sync_all()
    }

    /// Dropping the file releases the descriptor. std does not report close(2) failures;
    /// deferred write errors reach the caller through `sync` before this point.
    fn close(self: Box<Self>) -> io::Result<()> {
        drop(self.file);
        Ok(())
    }
}

/// Platform-file entries that follow position `index` in write order.
fn platform_entries_after(outputs: &OutputSet, index: usize) -> usize {
    outputs
        .iter()
        .skip(index + 1)
        .filter(|(_, v)| v.visible_in_platform_file())
        .count()
}

/// Outcome of a completed drain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    /// Keys written, in order
    pub written: Vec<String>,
    /// Entries not marked for the platform file
    pub skipped: usize,
}

/// Drains output sets into a platform file.
pub struct OutputSinkWriter {
    delimiter: DelimiterToken,
    opener: Box<dyn SinkOpener>,
}

impl OutputSinkWriter {
    pub fn new(delimiter: DelimiterToken) -> Self {
        Self::with_opener(delimiter, Box::new(FileSinkOpener))
    }

    pub fn with_opener(delimiter: DelimiterToken, opener: Box<dyn SinkOpener>) -> Self {
        Self { delimiter, opener }
    }

    pub fn delimiter(&self) -> &DelimiterToken {
        &self.delimiter
    }

    pub fn encode(&self, key: &str, value: &OutputValue) -> String {
        encode_entry(key, value, &self.delimiter)
    }

    /// Append every platform-visible entry of `outputs` to `path`.
    ///
    /// Stops at the first write failure; later entries are not written. The sync call is
    /// only made when every write succeeded. The handle is closed on every path, and a
    /// close failure is reported only when nothing failed before it.
    pub fn drain(&self, path: &Path, outputs: &OutputSet) -> Result<WriteReport, OutputError> {
        let mut handle = self.opener.open_append(path).map_err(|source| {
            error!(path = %path.display(), error = %source, "Failed to open output file");
            OutputError::SinkWrite {
                path: path.to_path_buf(),
                stage: SinkStage::Open,
                source,
            }
        })?;

        debug!(count = outputs.len(), path = %path.display(), "Writing outputs to output file");

        let mut report = WriteReport::default();
        let mut result = Ok(());
        for (index, (key, value)) in outputs.iter().enumerate() {
            if !value.visible_in_platform_file() {
                report.skipped += 1;
                continue;
            }

            debug!(key, value = value.as_str(), "Output value");
            let entry = self.encode(key, value);

            if let Err(source) = handle.write_all(entry.as_bytes()) {
                error!(
                    key,
                    error = %source,
                    not_attempted = platform_entries_after(outputs, index),
                    "Failed to write output"
                );
                result = Err(OutputError::SinkWrite {
                    path: path.to_path_buf(),
                    stage: SinkStage::Write,
                    source,
                });
                break;
            }

            debug!(key, "Wrote output");
            report.written.push(key.to_string());
        }

        if result.is_ok() {
            if let Err(source) = handle.sync() {
                error!(error = %source, "Failed to sync output file");
                result = Err(OutputError::SinkWrite {
                    path: path.to_path_buf(),
                    stage: SinkStage::Flush,
                    source,
                });
            }
        }

        match (result, handle.close()) {
            (Ok(()), Ok(())) => Ok(report),
            (Ok(()), Err(source)) => {
                error!(error = %source, "Failed to close output file");
                Err(OutputError::SinkClose {
                    path: path.to_path_buf(),
                    source,
                })
            }
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(source)) => {
                error!(error = %source, "Failed to close output file");
                Err(err)
            }
        }
    }
}
