//! Output values and the per-invocation output set.

use indexmap::IndexMap;
use serde::Serialize;

/// Encoding and visibility options for a single output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOpts {
    /// Force delimited-block encoding even for single-line payloads
    pub multiline: bool,
    /// Echo to stdout with the legacy console protocol
    pub stdout: bool,
    /// Write to the platform output file
    pub platform_file: bool,
}

impl Default for OutputOpts {
    fn default() -> Self {
        Self {
            multiline: false,
            stdout: true,
            platform_file: true,
        }
    }
}

/// A single named result. The payload is opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputValue {
    payload: String,
    opts: OutputOpts,
}

impl OutputValue {
    pub fn new(payload: impl Into<String>) -> Self {
        Self::with_opts(payload, OutputOpts::default())
    }

    pub fn with_opts(payload: impl Into<String>, opts: OutputOpts) -> Self {
        Self {
            payload: payload.into(),
            opts,
        }
    }

    /// Serialize a structured payload as JSON.
    ///
    /// JSON payloads always use the delimited encoding and stay out of the console echo.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::with_opts(
            serde_json::to_string(value)?,
            OutputOpts {
                multiline: true,
                stdout: false,
                platform_file: true,
            },
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.payload
    }

    pub fn opts(&self) -> OutputOpts {
        self.opts
    }

    pub fn multiline(&self) -> bool {
        self.opts.multiline
    }

    pub fn visible_on_stdout(&self) -> bool {
        self.opts.stdout
    }

    pub fn visible_in_platform_file(&self) -> bool {
        self.opts.platform_file
    }

    /// Whether the payload must be written as a delimited block.
    pub fn needs_delimited_block(&self) -> bool {
        self.opts.multiline || self.payload.contains(&['\n', '\r'][..])
    }
}

impl From<&str> for OutputValue {
    fn from(payload: &str) -> Self {
        OutputValue::new(payload)
    }
}

impl From<String> for OutputValue {
    fn from(payload: String) -> Self {
        OutputValue::new(payload)
    }
}

/// Named outputs pending write-out.
///
/// Insertion-ordered so a fixed logical content always serializes to the same bytes.
/// Re-setting a key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSet {
    entries: IndexMap<String, OutputValue>,
}

impl OutputSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, returning the value it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<OutputValue>,
    ) -> Option<OutputValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OutputValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Union `other` into this set, last write wins.
    pub fn merge(&mut self, other: OutputSet) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, key: &str) -> Option<&OutputValue> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OutputValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Move every entry out, leaving the set empty.
    pub fn take(&mut self) -> OutputSet {
        std::mem::take(self)
    }
}

impl<K, V> FromIterator<(K, V)> for OutputSet
where
    K: Into<String>,
    V: Into<OutputValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = OutputSet::new();
        for (key, value) in iter {
            set.insert(key, value);
        }
        set
    }
}

impl IntoIterator for OutputSet {
    type Item = (String, OutputValue);
    type IntoIter = indexmap::map::IntoIter<String, OutputValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
