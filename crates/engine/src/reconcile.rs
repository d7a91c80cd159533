//! Working-tree reconciliation
//!
//! Bring the project tree to a checkpoint's state:
//! 1. Delete current files the checkpoint does not contain
//! 2. Extract the checkpoint archive over the project root
//! 3. Remove directories left empty, bottom-up

use anyhow::{Context, Result};
use journal::Checkpoint;
use scanner::IgnoreMatcher;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// What a reconciliation changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Files removed because the checkpoint did not contain them
    pub deleted: Vec<String>,
    /// Archive entries written
    pub extracted: usize,
    /// Empty directories removed
    pub pruned_dirs: usize,
}

/// Current files that are not part of the checkpoint
///
/// Keeps the order of `current`.
pub fn files_to_delete(current: &[String], target: &Checkpoint) -> Vec<String> {
    let keep = target.file_set();
    current
        .iter()
        .filter(|f| !keep.contains(f.as_str()))
        .cloned()
        .collect()
}

/// Delete project-relative files; already-missing files are fine
pub fn delete_files(root: &Path, files: &[String]) -> Result<Vec<String>> {
    let mut deleted = Vec::with_capacity(files.len());
    for rel in files {
        match std::fs::remove_file(root.join(rel)) {
            Ok(()) => deleted.push(rel.clone()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Already gone: {}", rel);
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to delete {}", rel)),
        }
    }
    Ok(deleted)
}

/// Remove empty directories under `root`, deepest first
///
/// Ignored directories (`.git`, the checkpoint store, ...) are never
/// entered and the root itself is never removed. Failures are logged and
/// skipped.
pub fn prune_empty_dirs(root: &Path, matcher: &IgnoreMatcher) -> usize {
    // Pre-order so filter_entry prunes; reversed, children precede parents
    let dirs: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !matcher.should_ignore(e.path()))
        .flatten()
        .filter(|e| e.depth() > 0 && e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect();

    let mut pruned = 0usize;
    for dir in dirs.iter().rev() {
        let is_empty = match std::fs::read_dir(dir) {
            Ok(mut children) => children.next().is_none(),
            Err(e) => {
                warn!("Cannot read {}: {}", dir.display(), e);
                false
            }
        };

        if is_empty {
            match std::fs::remove_dir(dir) {
                Ok(()) => pruned += 1,
                Err(e) => warn!("Could not remove {}: {}", dir.display(), e),
            }
        }
    }

    pruned
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rw_core::Config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_files_to_delete() {
        let target = Checkpoint::new(
            "t".into(),
            "d".into(),
            vec!["a.txt".into(), "src/b.rs".into()],
            0,
            Utc::now(),
        );
        let current = vec!["a.txt".to_string(), "c.txt".to_string(), "src/b.rs".to_string(), "src/new.rs".to_string()];

        assert_eq!(files_to_delete(&current, &target), vec!["c.txt", "src/new.rs"]);
    }

    #[test]
    fn test_delete_files_tolerates_missing() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("here.txt"), b"x")?;

        let deleted = delete_files(
            temp_dir.path(),
            &["here.txt".to_string(), "gone.txt".to_string()],
        )?;

        assert_eq!(deleted, vec!["here.txt"]);
        assert!(!temp_dir.path().join("here.txt").exists());
        Ok(())
    }

    #[test]
    fn test_prune_removes_nested_empty_dirs_bottom_up() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/b/c"))?;
        fs::create_dir_all(root.join("keep"))?;
        fs::write(root.join("keep/file.txt"), b"x")?;

        let matcher = IgnoreMatcher::load(root, &Config::default());
        let pruned = prune_empty_dirs(root, &matcher);

        assert_eq!(pruned, 3);
        assert!(!root.join("a").exists());
        assert!(root.join("keep/file.txt").exists());
        assert!(root.exists());
        Ok(())
    }

    #[test]
    fn test_prune_skips_ignored_dirs() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".git/refs/tags"))?;
        fs::create_dir_all(root.join("node_modules/.bin"))?;

        let matcher = IgnoreMatcher::load(root, &Config::default());
        assert_eq!(prune_empty_dirs(root, &matcher), 0);

        assert!(root.join(".git/refs/tags").is_dir());
        assert!(root.join("node_modules/.bin").is_dir());
        Ok(())
    }
}
