//! Core type definitions for cpignore

mod entry;
mod error;
mod job;

pub use entry::{DirEntry, EntryKind};
pub use error::CpignoreError;
pub use job::{CopyJob, CopyResult};
