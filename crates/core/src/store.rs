//! On-disk layout of the checkpoint store

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Name of the hidden storage root inside a project
pub const STORE_DIR_NAME: &str = ".checkpoints";

/// Paths of everything the engine persists for one project
///
/// Manages the `.checkpoints/` directory structure:
/// ```text
/// .checkpoints/
///   config.json
///   changelog.json
///   snapshots/
///     <checkpoint-name>/
///       manifest.json
///       files.tar.gz
/// ```
#[derive(Debug, Clone)]
pub struct StoreLayout {
    /// Project root (the directory being checkpointed)
    root: PathBuf,
    /// Path to the `.checkpoints` directory
    store_dir: PathBuf,
}

impl StoreLayout {
    /// Build the layout for a project root
    pub fn new(project_root: &Path) -> Self {
        let root = project_root.to_path_buf();
        let store_dir = root.join(STORE_DIR_NAME);
        Self { root, store_dir }
    }

    /// Create the storage root and snapshot directory if missing
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(self.snapshots_dir()).with_context(|| {
            format!(
                "Failed to create snapshot directory {}",
                self.snapshots_dir().display()
            )
        })
    }

    /// Get the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the `.checkpoints` directory path
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.store_dir.join("config.json")
    }

    pub fn changelog_file(&self) -> PathBuf {
        self.store_dir.join("changelog.json")
    }

    pub fn snapshots_dir(&self) -> PathBuf {
        self.store_dir.join("snapshots")
    }

    /// Directory holding one checkpoint's manifest and archive
    pub fn checkpoint_dir(&self, name: &str) -> PathBuf {
        self.snapshots_dir().join(name)
    }

    pub fn manifest_path(&self, name: &str) -> PathBuf {
        self.checkpoint_dir(name).join("manifest.json")
    }

    pub fn archive_path(&self, name: &str) -> PathBuf {
        self.checkpoint_dir(name).join("files.tar.gz")
    }
}

/// Atomic write helper
///
/// Writes data to a temporary file next to the target, fsyncs it, then
/// renames it over the target path. Readers never observe a torn file.
pub fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    let parent = target
        .parent()
        .with_context(|| format!("No parent directory for {}", target.display()))?;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target)
        .with_context(|| format!("Failed to persist {}", target.display()))?;
    Ok(())
}

/// Render a project-relative path with `/` separators
///
/// Manifests, archives and ignore matching all use this form so that
/// ordering and comparisons are platform independent.
pub fn to_store_path(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
