//! Depth-first directory walker with inherited ignore rules

use crate::rules::{IgnoreResolver, ScopedMatcher};
use crate::types::{CpignoreError, DirEntry, EntryKind};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Callback receiving each included entry, in discovery order
pub type EntryCallback<'a> = dyn FnMut(DirEntry) -> Result<(), CpignoreError> + 'a;

/// Counters collected during a walk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Directories listed (the root included)
    pub directories: usize,
    /// Entries handed to the callback
    pub included: usize,
    /// Entries dropped by an ignore rule
    pub ignored: usize,
    /// Entries that are neither files nor directories
    pub unsupported: usize,
}

/// Walk `root` and report every entry that survives the ignore rules.
///
/// At each directory the local ignore files are loaded and appended to the
/// chain inherited from the parent. Ignored directories are not descended
/// into. Included directories are reported before their contents.
/// Children are visited in the order the platform lists them.
///
/// # Arguments
/// * `root` - Source root
/// * `resolver` - Ignore rule resolver built for `root`
/// * `exclude_dir` - Absolute directory never entered (a destination nested in the source)
/// * `on_entry` - Receives each included entry
///
/// # Errors
/// * Failure to list a directory or read an ignore file is returned as-is
/// * Errors returned by `on_entry` stop the walk
pub fn walk_tree(
    root: &Path,
    resolver: &IgnoreResolver,
    exclude_dir: Option<&Path>,
    on_entry: &mut EntryCallback<'_>,
) -> Result<WalkStats, CpignoreError> {
    let mut walker = TreeWalker {
        root,
        resolver,
        exclude_dir,
        stats: WalkStats::default(),
    };
    walker.walk_dir(Path::new(""), &[], on_entry)?;
    Ok(walker.stats)
}

struct TreeWalker<'a> {
    root: &'a Path,
    resolver: &'a IgnoreResolver,
    exclude_dir: Option<&'a Path>,
    stats: WalkStats,
}

impl TreeWalker<'_> {
    fn walk_dir(
        &mut self,
        relative_dir: &Path,
        inherited: &[&ScopedMatcher],
        on_entry: &mut EntryCallback<'_>,
    ) -> Result<(), CpignoreError> {
        let own = self.resolver.resolve(relative_dir)?;
        let mut chain: Vec<&ScopedMatcher> = Vec::with_capacity(inherited.len() + 1);
        chain.extend_from_slice(inherited);
        if let Some(matcher) = own.as_ref() {
            chain.push(matcher);
        }

        let dir = self.root.join(relative_dir);
        let listing = fs::read_dir(&dir).map_err(|e| CpignoreError::at(&dir, e))?;
        self.stats.directories += 1;

        for item in listing {
            let item = item.map_err(|e| CpignoreError::at(&dir, e))?;
            let file_type = item
                .file_type()
                .map_err(|e| CpignoreError::at(item.path(), e))?;

            let Some(kind) = EntryKind::from_file_type(&file_type) else {
                debug!("Skipping unsupported entry {}", item.path().display());
                self.stats.unsupported += 1;
                continue;
            };

            let entry = DirEntry::new(relative_dir.join(item.file_name()), kind);
            if self.resolver.is_ignored(&entry, &chain) {
                debug!("Ignoring {}", entry.display_path());
                self.stats.ignored += 1;
                continue;
            }

            if kind.is_dir() && self.exclude_dir == Some(item.path().as_path()) {
                debug!("Not descending into destination {}", item.path().display());
                continue;
            }

            self.stats.included += 1;
            if kind.is_dir() {
                let child_dir = entry.path.clone();
                on_entry(entry)?;
                self.walk_dir(&child_dir, &chain, on_entry)?;
            } else {
                on_entry(entry)?;
            }
        }

        Ok(())
    }
}
