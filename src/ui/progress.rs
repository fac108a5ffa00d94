//! Progress reporting

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Single-line status display.
///
/// The line reads `<started>/<queued> <status>: <path>`. Each event replaces
/// the previous line in place. A disabled reporter holds no bar and every
/// call returns immediately. Clones share the same line.
#[derive(Clone)]
pub struct ProgressReporter {
    bar: Option<ProgressBar>,
}

impl ProgressReporter {
    /// Create a reporter; `enabled == false` gives a no-op reporter.
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self::disabled();
        }

        let bar = ProgressBar::new(0);
        if let Ok(style) = ProgressStyle::with_template("{pos}/{len} {msg}") {
            bar.set_style(style);
        }
        Self { bar: Some(bar) }
    }

    pub fn disabled() -> Self {
        Self { bar: None }
    }

    /// Render `<status>: <path>` over the current line.
    pub fn status(&self, status: &str, path: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{}: {}", style(status).green(), style(path).dim()));
        }
    }

    /// Count a job handed to the scheduler.
    pub fn queued(&self) {
        if let Some(bar) = &self.bar {
            bar.inc_length(1);
        }
    }

    /// Announce that a job is starting.
    pub fn copying(&self, path: &str) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
        self.status("Copying", path);
    }

    /// Render the summary and move the cursor to a fresh line.
    pub fn finish(&self, copied_files: usize) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(format!("Copied {} files.", copied_files));
        }
    }

    #[cfg(test)]
    fn message(&self) -> Option<String> {
        self.bar.as_ref().map(|bar| bar.message())
    }

    #[cfg(test)]
    fn counts(&self) -> Option<(u64, Option<u64>)> {
        self.bar.as_ref().map(|bar| (bar.position(), bar.length()))
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::disabled()
    }
}
