//! Snapshot store: create, list and evict checkpoints
//!
//! Each checkpoint lives in `snapshots/<name>/` as a `manifest.json` plus a
//! `files.tar.gz` holding every enumerated file.

use crate::archive::{build_archive, ArchiveReport};
use crate::checkpoint::{generate_name, Checkpoint, DEFAULT_DESCRIPTION};
use crate::journal::{Journal, CREATE_CHECKPOINT};
use crate::retention::{EvictionReport, RetentionPolicy};
use anyhow::Context;
use chrono::Utc;
use rayon::prelude::*;
use rw_core::{atomic_write, format_size, ConfigStore, EngineError, StoreLayout};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// When the retention pass runs relative to a create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eviction {
    /// Evict right after the checkpoint is written
    Immediate,
    /// Leave eviction to the caller (used while a restore is in flight)
    Deferred,
}

/// Result of a successful create
#[derive(Debug, Clone)]
pub struct CreatedCheckpoint {
    pub checkpoint: Checkpoint,
    /// `total_size` rendered with [`format_size`]
    pub size: String,
    /// Files whose size could not be read
    pub unreadable: usize,
    pub archive: ArchiveReport,
    pub eviction: EvictionReport,
}

/// Every readable manifest in the store
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Newest first
    pub checkpoints: Vec<Checkpoint>,
    /// Entries whose manifest was missing or corrupt
    pub skipped: usize,
}

/// Best-effort size sum over a file list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeSummary {
    pub total: u64,
    pub unreadable: usize,
}

/// Stat every file in parallel and add up the sizes
///
/// Files that cannot be stat'ed are counted, not fatal.
pub fn sum_sizes(root: &Path, files: &[String]) -> SizeSummary {
    files
        .par_iter()
        .map(|rel| match std::fs::metadata(root.join(rel)) {
            Ok(meta) => SizeSummary { total: meta.len(), unreadable: 0 },
            Err(_) => SizeSummary { total: 0, unreadable: 1 },
        })
        .reduce(SizeSummary::default, |a, b| SizeSummary {
            total: a.total + b.total,
            unreadable: a.unreadable + b.unreadable,
        })
}

/// Creates, lists and evicts checkpoints for one project
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    layout: StoreLayout,
    configs: ConfigStore,
    journal: Journal,
}

impl SnapshotStore {
    pub fn new(layout: &StoreLayout) -> Self {
        Self {
            layout: layout.clone(),
            configs: ConfigStore::new(layout),
            journal: Journal::open(layout),
        }
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Create a checkpoint and run retention eviction
    pub fn create(
        &self,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<CreatedCheckpoint, EngineError> {
        self.create_with(name, description, Eviction::Immediate)
    }

    /// Create a checkpoint, choosing when eviction runs
    pub fn create_with(
        &self,
        name: Option<&str>,
        description: Option<&str>,
        eviction: Eviction,
    ) -> Result<CreatedCheckpoint, EngineError> {
        let config = self.configs.load();
        self.layout.ensure_dirs()?;

        let root = self.layout.root();
        let enumeration = scanner::scan_project(root, &config);
        if enumeration.is_empty() {
            return Err(EngineError::NoFiles);
        }

        let now = Utc::now();
        let description = description.filter(|d| !d.trim().is_empty());
        let name = self.unique_name(&generate_name(name, description, &config, now));
        let description = description.unwrap_or(DEFAULT_DESCRIPTION);

        let sizes = sum_sizes(root, &enumeration.files);
        let checkpoint = Checkpoint::new(
            name.clone(),
            description.to_string(),
            enumeration.files,
            sizes.total,
            now,
        );

        let dir = self.layout.checkpoint_dir(&name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let archive = match self.write_checkpoint(&checkpoint) {
            Ok(report) => report,
            Err(e) => {
                if let Err(cleanup) = std::fs::remove_dir_all(&dir) {
                    warn!("Could not remove incomplete checkpoint {}: {}", name, cleanup);
                }
                return Err(e.into());
            }
        };

        let eviction = match eviction {
            Eviction::Immediate => self.evict_excess(),
            Eviction::Deferred => EvictionReport::default(),
        };

        self.journal.append(
            CREATE_CHECKPOINT,
            &format!("Created checkpoint: {}", name),
            Some(description),
        );
        info!(
            "Created checkpoint {} ({} files, {})",
            name,
            checkpoint.file_count,
            format_size(checkpoint.total_size)
        );

        Ok(CreatedCheckpoint {
            size: format_size(checkpoint.total_size),
            checkpoint,
            unreadable: sizes.unreadable,
            archive,
            eviction,
        })
    }

    /// Write the manifest, then the archive
    fn write_checkpoint(&self, checkpoint: &Checkpoint) -> anyhow::Result<ArchiveReport> {
        let json = serde_json::to_string_pretty(checkpoint)
            .context("Failed to serialize manifest")?;
        atomic_write(&self.layout.manifest_path(&checkpoint.name), json.as_bytes())?;

        build_archive(
            self.layout.root(),
            &checkpoint.files,
            &self.layout.archive_path(&checkpoint.name),
        )
    }

    /// Avoid overwriting an existing checkpoint created in the same second
    fn unique_name(&self, base: &str) -> String {
        if !self.layout.checkpoint_dir(base).exists() {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}_{}", base, n))
            .find(|candidate| !self.layout.checkpoint_dir(candidate).exists())
            .unwrap_or_else(|| base.to_string())
    }

    /// All readable checkpoints, newest first
    pub fn list(&self) -> Vec<Checkpoint> {
        self.scan().checkpoints
    }

    /// All readable checkpoints plus a count of skipped entries
    ///
    /// Read-only: a store that does not exist yet lists as empty.
    pub fn scan(&self) -> Listing {
        let dir = self.layout.snapshots_dir();
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("No snapshots at {}: {}", dir.display(), e);
                return Listing::default();
            }
        };

        let mut listing = Listing::default();
        for entry in entries.flatten() {
            if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                continue;
            }
            let dir_name = entry.file_name().to_string_lossy().into_owned();
            match read_manifest(&entry.path().join("manifest.json")) {
                Ok(mut checkpoint) => {
                    if checkpoint.name != dir_name {
                        debug!("Manifest name {} differs from {}", checkpoint.name, dir_name);
                        checkpoint.name = dir_name;
                    }
                    listing.checkpoints.push(checkpoint);
                }
                Err(e) => {
                    warn!("Skipping unreadable checkpoint {}: {:#}", dir_name, e);
                    listing.skipped += 1;
                }
            }
        }

        listing.checkpoints.sort_by(Checkpoint::newest_first);
        listing
    }

    /// Delete the oldest checkpoints beyond the retention limit
    pub fn evict_excess(&self) -> EvictionReport {
        let policy = RetentionPolicy::from_config(&self.configs.load());
        let checkpoints = self.list();

        let mut report = EvictionReport::default();
        for checkpoint in policy.select(&checkpoints) {
            let dir = self.layout.checkpoint_dir(&checkpoint.name);
            match std::fs::remove_dir_all(&dir) {
                Ok(()) => {
                    debug!("Evicted checkpoint {}", checkpoint.name);
                    report.evicted.push(checkpoint.name.clone());
                }
                Err(e) => {
                    warn!("Could not evict checkpoint {}: {}", checkpoint.name, e);
                    report.failed.push(checkpoint.name.clone());
                }
            }
        }
        report
    }

    /// Archive path for a checkpoint
    pub fn archive_path(&self, checkpoint: &Checkpoint) -> PathBuf {
        self.layout.archive_path(&checkpoint.name)
    }
}

fn read_manifest(path: &Path) -> anyhow::Result<Checkpoint> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Failed to parse {}", path.display()))
}
