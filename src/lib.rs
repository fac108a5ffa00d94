//! # cpignore - copy a directory tree, minus what your ignore files say
//!
//! Walks the source tree, applies `.gitignore`-style rules found in every
//! directory plus a set of global rule supplements, and copies what is left
//! with a bounded number of concurrent copy jobs.

// Module declarations
pub mod commands;
pub mod config;
pub mod executor;
pub mod rules;
pub mod scanner;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use commands::copy::run;
pub use config::{Config, Options};
pub use types::{CopyResult, CpignoreError, EntryKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
