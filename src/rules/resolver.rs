//! Per-directory ignore rules and the inherited matcher chain

use crate::config::Config;
use crate::types::{CpignoreError, DirEntry};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Ignore rules declared in one directory.
///
/// Patterns are evaluated relative to the declaring directory, so `base`
/// (that directory, relative to the source root) is stripped from every
/// candidate before matching.
#[derive(Debug, Clone)]
pub struct ScopedMatcher {
    base: PathBuf,
    matcher: Gitignore,
}

impl ScopedMatcher {
    /// Directory the rules were declared in, relative to the source root
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Number of patterns loaded for this directory
    pub(crate) fn len(&self) -> usize {
        self.matcher.num_ignores() as usize + self.matcher.num_whitelists() as usize
    }

    /// Verdict of this rule list alone. Negations only apply within the list.
    pub fn is_ignored(&self, entry: &DirEntry) -> bool {
        match entry.path.strip_prefix(&self.base) {
            Ok(local) => self.matcher.matched(local, entry.is_dir()).is_ignore(),
            Err(_) => false,
        }
    }
}

/// Builds per-directory matchers and answers "is this entry ignored?"
/// against a matcher chain.
#[derive(Debug, Clone)]
pub struct IgnoreResolver {
    root: PathBuf,
    file_names: Vec<String>,
    supplements: Gitignore,
}

impl IgnoreResolver {
    /// Compile the global rule supplements once for the whole run.
    ///
    /// # Errors
    /// * `CpignoreError::InvalidPattern` if a supplement does not compile
    pub fn new(
        root: &Path,
        file_names: &[String],
        rule_supplements: &[String],
    ) -> Result<Self, CpignoreError> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in rule_supplements {
            builder
                .add_line(None, pattern)
                .map_err(|e| CpignoreError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
        }
        let supplements = builder.build().map_err(|e| CpignoreError::InvalidPattern {
            pattern: rule_supplements.join(", "),
            message: e.to_string(),
        })?;

        Ok(Self {
            root: root.to_path_buf(),
            file_names: file_names.to_vec(),
            supplements,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CpignoreError> {
        Self::new(
            &config.source,
            &config.ignore_file_names,
            &config.rule_supplements,
        )
    }

    /// Load the rules declared directly inside `relative_dir`.
    ///
    /// Every configured ignore file that exists there as a regular file is
    /// read in configured order and appended to a single rule list. Returns
    /// `None` when no ignore file is present.
    ///
    /// # Errors
    /// * `CpignoreError::PathIo` if an ignore file exists but cannot be read
    pub fn resolve(&self, relative_dir: &Path) -> Result<Option<ScopedMatcher>, CpignoreError> {
        let dir = self.root.join(relative_dir);
        let mut builder = GitignoreBuilder::new(&dir);
        let mut found = false;

        for name in &self.file_names {
            let path = dir.join(name);
            match fs::metadata(&path) {
                Ok(metadata) if metadata.is_file() => {}
                _ => continue,
            }

            let bytes = fs::read(&path).map_err(|e| CpignoreError::at(&path, e))?;
            let text = String::from_utf8_lossy(&bytes);
            for line in text.lines() {
                // Git skips lines it cannot parse; so do we.
                if let Err(e) = builder.add_line(Some(path.clone()), line) {
                    warn!("Skipping invalid pattern {:?} in {}: {}", line, path.display(), e);
                }
            }
            debug!("Loaded ignore rules from {}", path.display());
            found = true;
        }

        if !found {
            return Ok(None);
        }

        let matcher = builder.build().map_err(|e| CpignoreError::InvalidPattern {
            pattern: dir.display().to_string(),
            message: e.to_string(),
        })?;

        let scoped = ScopedMatcher {
            base: relative_dir.to_path_buf(),
            matcher,
        };
        debug!("{} rules in scope at {}", scoped.len(), dir.display());
        Ok(Some(scoped))
    }

    /// True if the supplements or any matcher in `chain` ignores `entry`.
    ///
    /// Each matcher is asked on its own. A negation in a deeper matcher never
    /// re-includes something an outer matcher ignored.
    pub fn is_ignored(&self, entry: &DirEntry, chain: &[&ScopedMatcher]) -> bool {
        self.supplements.matched(&entry.path, entry.is_dir()).is_ignore()
            || chain.iter().any(|matcher| matcher.is_ignored(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryKind;
    use tempfile::TempDir;

    fn file(path: &str) -> DirEntry {
        DirEntry::new(PathBuf::from(path), EntryKind::File)
    }

    fn dir(path: &str) -> DirEntry {
        DirEntry::new(PathBuf::from(path), EntryKind::Directory)
    }

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_resolve_without_ignore_file() {
        let temp = TempDir::new().expect("create temp dir");
        let resolver =
            IgnoreResolver::new(temp.path(), &names(&[".gitignore"]), &[]).expect("resolver");

        let matcher = resolver.resolve(Path::new("")).expect("resolve");
        assert!(matcher.is_none());
    }

    #[test]
    fn test_ignore_file_that_is_a_directory_is_skipped() {
        let temp = TempDir::new().expect("create temp dir");
        fs::create_dir(temp.path().join(".gitignore")).expect("create dir");
        let resolver =
            IgnoreResolver::new(temp.path(), &names(&[".gitignore"]), &[]).expect("resolver");

        assert!(resolver.resolve(Path::new("")).expect("resolve").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_ignore_file_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join(".gitignore");
        fs::write(&path, "*.log\n").expect("write rules");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o000)).expect("chmod 000");
        if fs::read(&path).is_ok() {
            // Permission bits do not bind this user (root).
            return;
        }

        let resolver =
            IgnoreResolver::new(temp.path(), &names(&[".gitignore"]), &[]).expect("resolver");
        let err = resolver
            .resolve(Path::new(""))
            .expect_err("unreadable rules should fail");

        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).expect("restore mode");
        match err {
            CpignoreError::PathIo { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("expected PathIo, got {other:?}"),
        }
    }

    #[test]
    fn test_negation_within_one_file() {
        let temp = TempDir::new().expect("create temp dir");
        fs::write(temp.path().join(".gitignore"), "*.log\n!keep.log\n").expect("write rules");
        let resolver =
            IgnoreResolver::new(temp.path(), &names(&[".gitignore"]), &[]).expect("resolver");
        let own = resolver
            .resolve(Path::new(""))
            .expect("resolve")
            .expect("rules present");

        assert!(resolver.is_ignored(&file("debug.log"), &[&own]));
        assert!(!resolver.is_ignored(&file("keep.log"), &[&own]));
        assert!(!resolver.is_ignored(&file("main.rs"), &[&own]));
    }

    #[test]
    fn test_multiple_file_names_concatenate_in_order() {
        let temp = TempDir::new().expect("create temp dir");
        fs::write(temp.path().join(".gitignore"), "*.log\n").expect("write gitignore");
        fs::write(temp.path().join(".cpignore"), "!keep.log\n").expect("write cpignore");
        let resolver = IgnoreResolver::new(
            temp.path(),
            &names(&[".gitignore", ".missing", ".cpignore"]),
            &[],
        )
        .expect("resolver");
        let own = resolver
            .resolve(Path::new(""))
            .expect("resolve")
            .expect("rules present");

        assert_eq!(own.len(), 2);
        assert!(resolver.is_ignored(&file("a.log"), &[&own]));
        assert!(!resolver.is_ignored(&file("keep.log"), &[&own]));
    }

    #[test]
    fn test_deeper_negation_does_not_undo_parent_ignore() {
        let temp = TempDir::new().expect("create temp dir");
        fs::create_dir(temp.path().join("sub")).expect("create sub");
        fs::write(temp.path().join(".gitignore"), "*.log\n").expect("write root rules");
        fs::write(temp.path().join("sub/.gitignore"), "!keep.log\n").expect("write sub rules");
        let resolver =
            IgnoreResolver::new(temp.path(), &names(&[".gitignore"]), &[]).expect("resolver");

        let root = resolver
            .resolve(Path::new(""))
            .expect("resolve root")
            .expect("root rules");
        let sub = resolver
            .resolve(Path::new("sub"))
            .expect("resolve sub")
            .expect("sub rules");

        assert_eq!(sub.base(), Path::new("sub"));
        assert!(resolver.is_ignored(&file("sub/keep.log"), &[&root, &sub]));
    }

    #[test]
    fn test_rules_are_relative_to_declaring_directory() {
        let temp = TempDir::new().expect("create temp dir");
        fs::create_dir(temp.path().join("item")).expect("create item");
        fs::write(temp.path().join("item/.gitignore"), "/c.txt\n").expect("write rules");
        let resolver =
            IgnoreResolver::new(temp.path(), &names(&[".gitignore"]), &[]).expect("resolver");
        let item = resolver
            .resolve(Path::new("item"))
            .expect("resolve")
            .expect("item rules");

        assert!(resolver.is_ignored(&file("item/c.txt"), &[&item]));
        assert!(!resolver.is_ignored(&file("item/nested/c.txt"), &[&item]));
        assert!(!resolver.is_ignored(&file("c.txt"), &[&item]));
    }

    #[test]
    fn test_parent_rules_apply_to_descendants() {
        let temp = TempDir::new().expect("create temp dir");
        fs::write(temp.path().join(".gitignore"), "secret.txt\n").expect("write rules");
        let resolver =
            IgnoreResolver::new(temp.path(), &names(&[".gitignore"]), &[]).expect("resolver");
        let root = resolver
            .resolve(Path::new(""))
            .expect("resolve")
            .expect("rules");

        assert!(resolver.is_ignored(&file("a/b/secret.txt"), &[&root]));
    }

    #[test]
    fn test_directory_only_pattern() {
        let temp = TempDir::new().expect("create temp dir");
        fs::write(temp.path().join(".gitignore"), "build/\n").expect("write rules");
        let resolver =
            IgnoreResolver::new(temp.path(), &names(&[".gitignore"]), &[]).expect("resolver");
        let root = resolver
            .resolve(Path::new(""))
            .expect("resolve")
            .expect("rules");

        assert!(resolver.is_ignored(&dir("build"), &[&root]));
        assert!(!resolver.is_ignored(&file("build"), &[&root]));
    }

    #[test]
    fn test_supplements_apply_everywhere() {
        let temp = TempDir::new().expect("create temp dir");
        let resolver = IgnoreResolver::new(temp.path(), &[], &names(&[".git", "item/*"]))
            .expect("resolver");

        assert!(resolver.is_ignored(&dir(".git"), &[]));
        assert!(resolver.is_ignored(&dir("nested/.git"), &[]));
        assert!(resolver.is_ignored(&file("item/d.txt"), &[]));
        assert!(!resolver.is_ignored(&dir("item"), &[]));
        assert!(!resolver.is_ignored(&file("b.txt"), &[]));
    }

    #[test]
    fn test_invalid_supplement_is_rejected() {
        let temp = TempDir::new().expect("create temp dir");
        let err = IgnoreResolver::new(temp.path(), &[], &names(&["a[b"])).unwrap_err();
        assert!(matches!(err, CpignoreError::InvalidPattern { .. }));
    }

    #[test]
    fn test_invalid_line_in_ignore_file_is_skipped() {
        let temp = TempDir::new().expect("create temp dir");
        fs::write(temp.path().join(".gitignore"), "a[b\n*.tmp\n").expect("write rules");
        let resolver =
            IgnoreResolver::new(temp.path(), &names(&[".gitignore"]), &[]).expect("resolver");
        let root = resolver
            .resolve(Path::new(""))
            .expect("resolve")
            .expect("rules");

        assert!(resolver.is_ignored(&file("x.tmp"), &[&root]));
    }
}
