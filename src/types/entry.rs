//! DirEntry - a file or directory discovered under the source root

use serde::{Deserialize, Serialize};
use std::fs::FileType;
use std::path::PathBuf;

/// File/directory discriminator
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    /// Classify a file type without following symlinks.
    ///
    /// Returns `None` for anything that is neither a regular file nor a
    /// directory (symlinks, sockets, pipes, devices).
    pub fn from_file_type(file_type: &FileType) -> Option<Self> {
        if file_type.is_dir() {
            Some(EntryKind::Directory)
        } else if file_type.is_file() {
            Some(EntryKind::File)
        } else {
            None
        }
    }

    pub fn is_dir(self) -> bool {
        self == EntryKind::Directory
    }
}

/// Represents one entry in the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Path relative to the source root
    pub path: PathBuf,

    pub kind: EntryKind,
}

impl DirEntry {
    pub fn new(path: PathBuf, kind: EntryKind) -> Self {
        Self { path, kind }
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Relative path with `/` separators; directories carry a trailing `/`.
    pub fn display_path(&self) -> String {
        let mut display = self
            .path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if self.is_dir() {
            display.push('/');
        }
        display
    }
}
