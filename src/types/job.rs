//! Copy jobs and their results

use super::entry::{DirEntry, EntryKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One scheduled file copy or directory creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyJob {
    /// Absolute source path
    pub source: PathBuf,

    /// Absolute destination path
    pub destination: PathBuf,

    pub kind: EntryKind,

    /// Relative path shown in progress output
    pub display: String,
}

impl CopyJob {
    /// Resolve an entry against the source and destination roots.
    pub fn for_entry(entry: &DirEntry, source_root: &Path, destination_root: &Path) -> Self {
        Self {
            source: source_root.join(&entry.path),
            destination: destination_root.join(&entry.path),
            kind: entry.kind,
            display: entry.display_path(),
        }
    }

    /// Convert a finished job into its manifest record.
    pub fn into_result(self) -> CopyResult {
        CopyResult {
            source: self.source,
            destination: self.destination,
            kind: self.kind,
        }
    }
}

/// Manifest record for a copied file or materialized directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyResult {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub kind: EntryKind,
}
