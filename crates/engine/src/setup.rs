//! Project setup: storage root, `.gitignore` entry, config, first checkpoint

use anyhow::{Context, Result};
use rw_core::STORE_DIR_NAME;
use std::io::Write;
use std::path::Path;

/// Comment line written above the storage root entry
pub const GITIGNORE_COMMENT: &str = "# rewind checkpoint storage";

/// What `setup` changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupReport {
    /// `.gitignore` gained the storage root entry
    pub gitignore_updated: bool,
    /// `config.json` did not exist before
    pub config_created: bool,
    /// Name of the checkpoint created for a project without history
    pub initial_checkpoint: Option<String>,
}

/// Check whether `.gitignore` already excludes the storage root
pub fn is_store_git_ignored(root: &Path) -> bool {
    let gitignore_path = root.join(".gitignore");
    match std::fs::read_to_string(&gitignore_path) {
        Ok(content) => content.lines().any(|line| {
            let trimmed = line.trim().trim_start_matches('/').trim_end_matches('/');
            trimmed == STORE_DIR_NAME
        }),
        Err(_) => false,
    }
}

/// Append the storage root to `.gitignore`, creating the file if needed
///
/// Returns `false` when an entry was already present.
pub fn ensure_gitignore_entry(root: &Path) -> Result<bool> {
    if is_store_git_ignored(root) {
        return Ok(false);
    }

    let gitignore_path = root.join(".gitignore");
    let existing = std::fs::read_to_string(&gitignore_path).unwrap_or_default();

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&gitignore_path)
        .with_context(|| format!("Failed to open {}", gitignore_path.display()))?;

    let mut block = String::new();
    if !existing.is_empty() {
        if !existing.ends_with('\n') {
            block.push('\n');
        }
        block.push('\n');
    }
    block.push_str(GITIGNORE_COMMENT);
    block.push('\n');
    block.push_str(STORE_DIR_NAME);
    block.push_str("/\n");

    file.write_all(block.as_bytes())
        .with_context(|| format!("Failed to write {}", gitignore_path.display()))?;
    Ok(true)
}
