//! Run identity: immutable CI metadata captured once at context construction.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

const SHORT_SHA_LEN: usize = 7;

/// Kind of ref that triggered the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefType {
    Branch,
    Tag,
}

impl RefType {
    /// Parse the platform's ref type value. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "branch" => Some(RefType::Branch),
            "tag" => Some(RefType::Tag),
            _ => None,
        }
    }
}

impl fmt::Display for RefType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefType::Branch => write!(f, "branch"),
            RefType::Tag => write!(f, "tag"),
        }
    }
}

/// Raw identity fields as read from the environment.
#[derive(Debug, Clone, Default)]
pub struct IdentityFields {
    pub run_id: String,
    pub run_number: String,
    pub commit_sha: String,
    pub actor: String,
    pub repository: String,
    pub ref_name: String,
    pub ref_type: Option<RefType>,
    pub scratch_dir: PathBuf,
}

/// Immutable snapshot of the current CI run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunIdentity {
    id_prefix: String,
    run_id: String,
    run_number: String,
    commit_sha: String,
    actor: String,
    repository: String,
    ref_name: String,
    ref_type: Option<RefType>,
    scratch_dir: PathBuf,
}

impl RunIdentity {
    pub fn new(id_prefix: impl Into<String>, fields: IdentityFields) -> Self {
        Self {
            id_prefix: id_prefix.into(),
            run_id: fields.run_id,
            run_number: fields.run_number,
            commit_sha: fields.commit_sha,
            actor: fields.actor,
            repository: fields.repository,
            ref_name: fields.ref_name,
            ref_type: fields.ref_type,
            scratch_dir: fields.scratch_dir,
        }
    }

    /// Composite run identifier: `<prefix>-<run id>-<run number>`.
    pub fn id(&self) -> String {
        format!("{}-{}-{}", self.id_prefix, self.run_id, self.run_number)
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn run_number(&self) -> &str {
        &self.run_number
    }

    pub fn sha(&self) -> &str {
        &self.commit_sha
    }

    /// First seven characters of the commit SHA, or the whole SHA when shorter.
    pub fn sha_short(&self) -> &str {
        match self.commit_sha.char_indices().nth(SHORT_SHA_LEN) {
            Some((idx, _)) => &self.commit_sha[..idx],
            None => &self.commit_sha,
        }
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn ref_name(&self) -> &str {
        &self.ref_name
    }

    pub fn ref_type(&self) -> Option<RefType> {
        self.ref_type
    }

    /// Writable scratch directory provided by the runner.
    pub fn write_dir(&self) -> &Path {
        &self.scratch_dir
    }
}
