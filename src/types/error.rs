//! Error types for cpignore

use std::path::PathBuf;
use thiserror::Error;

/// Error types for cpignore operations
#[derive(Debug, Error)]
pub enum CpignoreError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO error tied to a specific path
    #[error("IO error at {}: {source}", .path.display())]
    PathIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source root is missing. The path is shown as the caller supplied it.
    #[error("Source directory \"{}\" does not exist.", .0.display())]
    SourceMissing(PathBuf),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error (logic checks)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A rule supplement could not be compiled
    #[error("Invalid ignore pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl CpignoreError {
    /// Attach a path to an IO error.
    pub fn at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CpignoreError::PathIo {
            path: path.into(),
            source,
        }
    }

    /// Check if this error was raised while validating configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            CpignoreError::SourceMissing(_)
                | CpignoreError::Config(_)
                | CpignoreError::Validation(_)
                | CpignoreError::InvalidPattern { .. }
        )
    }

    /// Check if this error came from the file system
    pub fn is_io_error(&self) -> bool {
        matches!(self, CpignoreError::Io(_) | CpignoreError::PathIo { .. })
    }
}
