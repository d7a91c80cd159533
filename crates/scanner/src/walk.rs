//! Project file enumeration
//!
//! Walks the project tree once, pruning ignored directories, and returns a
//! sorted list of project-relative file paths.

use crate::ignore::IgnoreMatcher;
use rw_core::to_store_path;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Result of one enumeration pass
///
/// Unreadable entries are not fatal; they are counted in `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enumeration {
    /// Project-relative paths, `/`-separated, lexicographically sorted
    pub files: Vec<String>,
    /// Entries that could not be read (permission errors, races)
    pub skipped: usize,
}

impl Enumeration {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Lists non-ignored project files
pub struct FileEnumerator<'a> {
    /// Project root directory
    root: PathBuf,

    matcher: &'a IgnoreMatcher,
}

impl<'a> FileEnumerator<'a> {
    pub fn new(root: &Path, matcher: &'a IgnoreMatcher) -> Self {
        Self {
            root: root.to_path_buf(),
            matcher,
        }
    }

    /// List every non-ignored regular file under the root
    ///
    /// Ignored directories are pruned: nothing below them is visited.
    /// Symlinks are not followed and are not listed.
    pub fn list_files(&self) -> Enumeration {
        let mut files = Vec::new();
        let mut skipped = 0usize;

        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.matcher.should_ignore(e.path()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    skipped += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match entry.path().strip_prefix(&self.root) {
                Ok(rel) => files.push(to_store_path(rel)),
                Err(_) => skipped += 1,
            }
        }

        files.sort();
        debug!("Enumerated {} files ({} skipped)", files.len(), skipped);

        Enumeration { files, skipped }
    }
}
