//! Data models module
//!
//! Defines core data structures:
//! - ObjectKind: what flavor of filesystem object a watch entry is
//! - FileBaseline / DirBaseline / LogBaseline: last-known-good snapshots
//! - Valuables: the watch list, grouped by kind
//! - DriftReport: per-kind drifted paths produced by a check pass
//! - DriftEvent: one rendered detection row

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Kind of filesystem object under surveillance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// Regular file, watched for content and stat drift
    File,
    /// Directory, watched for modification drift
    Dir,
    /// Log directory, watched for shrinking entry counts
    LogDir,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::File => "file",
            ObjectKind::Dir => "dir",
            ObjectKind::LogDir => "log",
        }
    }
}

/// Baseline snapshot of a watched file
///
/// `Unavailable` marks a file that could not be read at snapshot time.
/// Such entries are skipped by drift detection until a later rebase
/// observes the file readable again, so intermittently locked or
/// permission-denied paths never produce false positives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileBaseline {
    Observed {
        /// Hex digest of the file content
        content_hash: String,
        accessed: SystemTime,
        modified: SystemTime,
        size: u64,
    },
    Unavailable,
}

impl FileBaseline {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FileBaseline::Unavailable)
    }
}

/// Baseline snapshot of a watched directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirBaseline {
    pub accessed: SystemTime,
    pub modified: SystemTime,
    /// Child entry names at snapshot time, used for drift diagnostics
    pub children: BTreeSet<String>,
}

/// Baseline snapshot of a watched log directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogBaseline {
    pub entry_count: usize,
}

/// The watch list: every path under surveillance, grouped by kind
///
/// Invariant: every path here passed `PathResolver::verify` for its kind
/// at the time it was added; candidates that fail verification are
/// silently dropped at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Valuables {
    #[serde(default)]
    pub files: Vec<PathBuf>,
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
    #[serde(default)]
    pub logs: Vec<PathBuf>,
}

impl Valuables {
    pub fn len(&self) -> usize {
        self.files.len() + self.dirs.len() + self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drifted object paths from one check pass, grouped by kind
///
/// Paths appear in watch-list order within each kind; no ordering is
/// guaranteed across kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    pub files: Vec<PathBuf>,
    pub dirs: Vec<PathBuf>,
    pub logs: Vec<PathBuf>,
}

impl DriftReport {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty() && self.logs.is_empty()
    }

    /// Iterate over every drifted path together with its kind
    pub fn iter(&self) -> impl Iterator<Item = (ObjectKind, &Path)> {
        self.files
            .iter()
            .map(|p| (ObjectKind::File, p.as_path()))
            .chain(self.dirs.iter().map(|p| (ObjectKind::Dir, p.as_path())))
            .chain(self.logs.iter().map(|p| (ObjectKind::LogDir, p.as_path())))
    }
}

/// One detection row handed to the output layer
#[derive(Debug, Clone)]
pub struct DriftEvent {
    pub timestamp: SystemTime,
    pub path: PathBuf,
    pub kind: ObjectKind,
    /// Whether the drifted path is a planted decoy
    pub decoy: bool,
}
