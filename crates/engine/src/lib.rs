//! Checkpoint/restore engine for one project directory
//!
//! This crate provides:
//! - Checkpoint reference resolution
//! - The restore state machine (backup, delete, extract, prune)
//! - Project setup
//! - [`Engine`], the entry point adapters call

pub mod reconcile;
pub mod resolve;
pub mod restore;
pub mod setup;

// Re-exports
pub use reconcile::ReconcileReport;
pub use resolve::{resolve, PREVIEW_LEN};
pub use restore::{
    RestoreEngine, RestoreOutcome, RestorePreview, EMERGENCY_BACKUP_DESCRIPTION,
    EMERGENCY_BACKUP_NAME,
};
pub use setup::SetupReport;

use journal::{ChangelogEntry, CreatedCheckpoint, Listing, SnapshotStore};
use rw_core::{format_size, Config, ConfigStore, EngineError, StoreLayout};
use std::path::Path;
use tracing::{info, warn};

/// Name prefix of the checkpoint `setup` creates
pub const INITIAL_CHECKPOINT_NAME: &str = "initial";
/// Description of the checkpoint `setup` creates
pub const INITIAL_CHECKPOINT_DESCRIPTION: &str = "Initial checkpoint";

/// Result of [`Engine::restore`]
#[derive(Debug, Clone)]
pub enum RestoreResult {
    /// Nothing was changed
    DryRun(RestorePreview),
    Restored(RestoreOutcome),
}

/// Checkpoint engine bound to a project root
///
/// Every operation re-reads configuration and storage from disk; an
/// `Engine` holds no state beyond its paths.
#[derive(Debug, Clone)]
pub struct Engine {
    layout: StoreLayout,
    store: SnapshotStore,
}

impl Engine {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let layout = StoreLayout::new(root.as_ref());
        let store = SnapshotStore::new(&layout);
        Self { layout, store }
    }

    /// Project root
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Prepare a project for checkpointing
    ///
    /// Idempotent. Ensures the storage directories, a `.gitignore` entry
    /// for the storage root and a config file, then creates the initial
    /// checkpoint when the project has files but no history yet.
    pub fn setup(&self) -> Result<SetupReport, EngineError> {
        self.layout.ensure_dirs()?;

        let configs = ConfigStore::new(&self.layout);
        let config_created = !configs.exists();
        configs.load();

        let gitignore_updated = match setup::ensure_gitignore_entry(self.root()) {
            Ok(updated) => updated,
            Err(e) => {
                warn!("Could not update .gitignore: {:#}", e);
                false
            }
        };

        let initial_checkpoint = if self.store.list().is_empty() {
            match self.store.create(
                Some(INITIAL_CHECKPOINT_NAME),
                Some(INITIAL_CHECKPOINT_DESCRIPTION),
            ) {
                Ok(created) => Some(created.checkpoint.name),
                Err(EngineError::NoFiles) => None,
                Err(e) => return Err(e),
            }
        } else {
            None
        };

        info!("Setup complete at {}", self.root().display());
        Ok(SetupReport {
            gitignore_updated,
            config_created,
            initial_checkpoint,
        })
    }

    /// Create a checkpoint of the current working tree
    pub fn create(
        &self,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<CreatedCheckpoint, EngineError> {
        self.store.create(name, description)
    }

    /// Every readable checkpoint, newest first
    pub fn list(&self) -> Listing {
        self.store.scan()
    }

    /// Restore a checkpoint, or preview the restore when `dry_run` is set
    pub fn restore(&self, reference: &str, dry_run: bool) -> Result<RestoreResult, EngineError> {
        let engine = RestoreEngine::new(&self.store);
        if dry_run {
            engine.preview(reference).map(RestoreResult::DryRun)
        } else {
            engine.restore(reference).map(RestoreResult::Restored)
        }
    }

    /// Record a caller-defined journal entry
    pub fn log(
        &self,
        action: &str,
        description: &str,
        details: Option<&str>,
    ) -> Result<(), EngineError> {
        self.store
            .journal()
            .try_append(action, description, details)
            .map_err(EngineError::from)
    }

    /// Journal entries, newest first
    pub fn changelog(&self) -> Vec<ChangelogEntry> {
        self.store.journal().read()
    }

    /// Current configuration (healed if missing or corrupt)
    pub fn config(&self) -> Config {
        ConfigStore::new(&self.layout).load()
    }

    /// Human-readable size, e.g. `1.5KB`
    pub fn format_size(bytes: u64) -> String {
        format_size(bytes)
    }
}
