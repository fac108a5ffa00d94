//! Command line surface

use super::Options;
use crate::types::CpignoreError;
use clap::Parser;
use std::path::PathBuf;

/// Copy files while honoring .gitignore-style ignore files
#[derive(Parser, Debug)]
#[command(
    name = "cpignore",
    version,
    disable_version_flag = true,
    after_help = "Example:\n  cpignore -s src -d dist    Copy files from \"src\" to \"dist\""
)]
pub struct Cli {
    /// Source directory [default: .]
    #[arg(short, long, value_name = "DIR")]
    pub src: Option<PathBuf>,

    /// Destination directory
    #[arg(short, long, value_name = "DIR", required_unless_present = "config")]
    pub dist: Option<PathBuf>,

    /// Ignore file names [default: .gitignore]
    #[arg(short, long, value_name = "NAME", num_args = 1..)]
    pub file_names: Option<Vec<String>>,

    /// Ignore rule supplements [default: .git]
    #[arg(short, long, value_name = "PATTERN", num_args = 1..)]
    pub rule_supplements: Option<Vec<String>>,

    /// Keep empty folder [default: true]
    #[arg(
        short,
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub keep_empty_folder: Option<bool>,

    /// Copy file threads [default: 10]
    #[arg(short, long, value_name = "N")]
    pub threads: Option<usize>,

    /// Log enabled [default: false]
    #[arg(
        short,
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub log: Option<bool>,

    /// Read options from a TOML file; flags given on the command line win
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write the list of copied entries to FILE as JSON
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    #[allow(dead_code)]
    version: Option<bool>,
}

impl Cli {
    /// Merge command line flags over the options file (or the defaults).
    pub fn into_options(self) -> Result<Options, CpignoreError> {
        let mut options = match &self.config {
            Some(path) => Options::from_toml_file(path)?,
            None => Options::default(),
        };

        if let Some(src) = self.src {
            options.src = src;
        }
        if let Some(dist) = self.dist {
            options.dist = dist;
        }
        if let Some(file_names) = self.file_names {
            options.file_names = file_names;
        }
        if let Some(rule_supplements) = self.rule_supplements {
            options.rule_supplements = rule_supplements;
        }
        if let Some(keep_empty_folder) = self.keep_empty_folder {
            options.keep_empty_folder = keep_empty_folder;
        }
        if let Some(threads) = self.threads {
            options.threads = threads;
        }
        if let Some(log) = self.log {
            options.log = log;
        }

        Ok(options)
    }
}
