//! Configuration management

mod cli;

pub use cli::Cli;

use crate::types::CpignoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Ignore file looked up in every directory by default
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

/// Rule supplement applied everywhere by default (version-control metadata)
pub const DEFAULT_RULE_SUPPLEMENT: &str = ".git";

/// Default number of simultaneous copy jobs
pub const DEFAULT_THREADS: usize = 10;

/// User-facing options, before validation.
///
/// Field names follow the command line flags, so an options file reads the
/// same way the flags do:
///
/// ```toml
/// src = "packages/app"
/// dist = "build/app"
/// file-names = [".gitignore", ".npmignore"]
/// rule-supplements = [".git", "*.map"]
/// keep-empty-folder = false
/// threads = 4
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Options {
    /// Source directory
    pub src: PathBuf,

    /// Destination directory (required)
    pub dist: PathBuf,

    /// Ignore file names checked in every directory
    pub file_names: Vec<String>,

    /// Patterns applied to the whole tree
    pub rule_supplements: Vec<String>,

    /// Materialize directories that end up empty
    pub keep_empty_folder: bool,

    /// Maximum simultaneous copy jobs
    pub threads: usize,

    /// Show the live progress line
    pub log: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            src: PathBuf::from("."),
            dist: PathBuf::new(),
            file_names: vec![DEFAULT_IGNORE_FILE.to_string()],
            rule_supplements: vec![DEFAULT_RULE_SUPPLEMENT.to_string()],
            keep_empty_folder: true,
            threads: DEFAULT_THREADS,
            log: false,
        }
    }
}

impl Options {
    /// Default options copying `src` into `dist`
    pub fn new(src: impl Into<PathBuf>, dist: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dist: dist.into(),
            ..Self::default()
        }
    }

    /// Load options from a TOML file. Missing keys take their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self, CpignoreError> {
        let text = fs::read_to_string(path).map_err(|e| CpignoreError::at(path, e))?;
        toml::from_str(&text).map_err(|e| {
            CpignoreError::Config(format!(
                "Invalid options file {}: {}",
                path.display(),
                e
            ))
        })
    }
}

/// Validated, immutable run configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Source root (canonical, absolute)
    pub source: PathBuf,

    /// Destination root (absolute)
    pub destination: PathBuf,

    /// Ignore file names, in lookup order
    pub ignore_file_names: Vec<String>,

    /// Global patterns, in declaration order
    pub rule_supplements: Vec<String>,

    pub keep_empty_folders: bool,

    /// Always at least 1
    pub concurrency: usize,

    /// Live progress line enabled?
    pub logging: bool,
}

impl TryFrom<Options> for Config {
    type Error = CpignoreError;

    /// Normalize and validate options. Nothing on disk is modified.
    fn try_from(options: Options) -> Result<Self, Self::Error> {
        let source = if is_blank(&options.src) {
            PathBuf::from(".")
        } else {
            options.src
        };

        if !source.exists() {
            return Err(CpignoreError::SourceMissing(source));
        }
        if !source.is_dir() {
            return Err(CpignoreError::Config(format!(
                "Source path \"{}\" is not a directory.",
                source.display()
            )));
        }
        if is_blank(&options.dist) {
            return Err(CpignoreError::Config(
                "Destination directory is required.".to_string(),
            ));
        }

        let source = fs::canonicalize(&source).map_err(|e| CpignoreError::at(&source, e))?;
        let destination = absolute(&options.dist)?;

        if destination.exists() {
            if !destination.is_dir() {
                return Err(CpignoreError::Config(format!(
                    "Destination path \"{}\" is not a directory.",
                    destination.display()
                )));
            }
            let canonical =
                fs::canonicalize(&destination).map_err(|e| CpignoreError::at(&destination, e))?;
            if canonical == source {
                return Err(CpignoreError::Validation(
                    "Source and destination cannot be the same".to_string(),
                ));
            }
        }

        Ok(Self {
            source,
            destination,
            ignore_file_names: strip_empty(options.file_names),
            rule_supplements: strip_empty(options.rule_supplements),
            keep_empty_folders: options.keep_empty_folder,
            concurrency: options.threads.max(1),
            logging: options.log,
        })
    }
}

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

fn strip_empty(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .filter(|value| !value.trim().is_empty())
        .collect()
}

fn absolute(path: &Path) -> Result<PathBuf, CpignoreError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
