//! Restore a checkpoint into the working tree
//!
//! A restore is driven as an explicit state machine:
//!
//! ```text
//! Resolving ──► BackingUp ──► Reconciling ──► Done
//!     │             │              │
//!  NotFound    BackupFailed   PartialFailure
//! ```
//!
//! Nothing in the working tree is touched until the emergency backup
//! checkpoint exists. Once it does, every failure names it so the caller
//! can recover by restoring it.

use crate::reconcile::{self, ReconcileReport};
use crate::resolve::resolve_owned;
use journal::{extract_archive, Checkpoint, Eviction, EvictionReport, SnapshotStore, RESTORE_CHECKPOINT};
use rw_core::{ConfigStore, EngineError};
use scanner::{FileEnumerator, IgnoreMatcher};
use tracing::{debug, info, warn};

/// Name prefix of the safety checkpoint taken before a restore
pub const EMERGENCY_BACKUP_NAME: &str = "emergency_backup";
/// Description of the safety checkpoint taken before a restore
pub const EMERGENCY_BACKUP_DESCRIPTION: &str = "Auto-backup before restore";

/// What a dry run would do
#[derive(Debug, Clone)]
pub struct RestorePreview {
    pub checkpoint: Checkpoint,
    /// Current files the restore would delete
    pub files_to_delete: Vec<String>,
}

/// A completed restore
#[derive(Debug, Clone)]
pub struct RestoreOutcome {
    /// The checkpoint now in the working tree
    pub restored: Checkpoint,
    /// Name of the checkpoint holding the pre-restore state
    pub emergency_backup: String,
    pub report: ReconcileReport,
    /// Retention pass run once the restore finished
    pub eviction: EvictionReport,
}

/// Restore progress
#[derive(Debug)]
enum RestoreState {
    Resolving,
    BackingUp { target: Checkpoint },
    Reconciling { target: Checkpoint, backup: String },
    Done(RestoreOutcome),
}

/// A reconcile step that failed, with the step it failed in
type StageError = (&'static str, anyhow::Error);

/// Restores checkpoints held in a [`SnapshotStore`]
pub struct RestoreEngine<'a> {
    store: &'a SnapshotStore,
}

impl<'a> RestoreEngine<'a> {
    pub fn new(store: &'a SnapshotStore) -> Self {
        Self { store }
    }

    /// Resolve a reference and list the files a restore would delete
    ///
    /// Writes nothing: configuration is peeked rather than loaded.
    pub fn preview(&self, reference: &str) -> Result<RestorePreview, EngineError> {
        let checkpoint = resolve_owned(self.store.list(), reference)?;

        let root = self.store.layout().root();
        let config = ConfigStore::new(self.store.layout()).peek();
        let matcher = IgnoreMatcher::load(root, &config);
        let current = FileEnumerator::new(root, &matcher).list_files();

        let files_to_delete = reconcile::files_to_delete(&current.files, &checkpoint);
        Ok(RestorePreview {
            checkpoint,
            files_to_delete,
        })
    }

    /// Restore the checkpoint `reference` designates
    pub fn restore(&self, reference: &str) -> Result<RestoreOutcome, EngineError> {
        let mut state = RestoreState::Resolving;
        loop {
            state = match self.step(state, reference)? {
                RestoreState::Done(outcome) => return Ok(outcome),
                next => next,
            };
        }
    }

    fn step(&self, state: RestoreState, reference: &str) -> Result<RestoreState, EngineError> {
        match state {
            RestoreState::Resolving => {
                let target = resolve_owned(self.store.list(), reference)?;
                debug!("Resolved '{}' to {}", reference, target.name);
                Ok(RestoreState::BackingUp { target })
            }

            RestoreState::BackingUp { target } => {
                let backup = self
                    .store
                    .create_with(
                        Some(EMERGENCY_BACKUP_NAME),
                        Some(EMERGENCY_BACKUP_DESCRIPTION),
                        Eviction::Deferred,
                    )
                    .map_err(|e| EngineError::BackupFailed {
                        reason: e.to_string(),
                    })?;
                info!("Emergency backup {} created", backup.checkpoint.name);
                Ok(RestoreState::Reconciling {
                    target,
                    backup: backup.checkpoint.name,
                })
            }

            RestoreState::Reconciling { target, backup } => {
                let result = self.reconcile(&target);
                let eviction = self.store.evict_excess();

                match result {
                    Ok(report) => {
                        self.store.journal().append(
                            RESTORE_CHECKPOINT,
                            &format!("Restored checkpoint: {}", target.name),
                            Some(&format!("Emergency backup: {}", backup)),
                        );
                        info!(
                            "Restored {} ({} deleted, {} extracted)",
                            target.name,
                            report.deleted.len(),
                            report.extracted
                        );
                        Ok(RestoreState::Done(RestoreOutcome {
                            restored: target,
                            emergency_backup: backup,
                            report,
                            eviction,
                        }))
                    }
                    Err((stage, e)) => {
                        warn!("Restore of {} failed while {}: {:#}", target.name, stage, e);
                        Err(EngineError::PartialFailure {
                            target: target.name,
                            backup,
                            stage,
                            reason: format!("{:#}", e),
                        })
                    }
                }
            }

            RestoreState::Done(outcome) => Ok(RestoreState::Done(outcome)),
        }
    }

    /// Delete, prune, extract, prune
    fn reconcile(&self, target: &Checkpoint) -> Result<ReconcileReport, StageError> {
        let root = self.store.layout().root();
        let config = ConfigStore::new(self.store.layout()).load();
        let matcher = IgnoreMatcher::load(root, &config);

        let current = FileEnumerator::new(root, &matcher).list_files();
        if current.skipped > 0 {
            debug!("{} entries unreadable during restore enumeration", current.skipped);
        }
        let doomed = reconcile::files_to_delete(&current.files, target);

        let deleted = reconcile::delete_files(root, &doomed).map_err(|e| ("deleting files", e))?;

        // A directory emptied above may sit where the archive holds a file
        let mut pruned_dirs = reconcile::prune_empty_dirs(root, &matcher);

        let archive = self.store.archive_path(target);
        let extracted = extract_archive(&archive, root).map_err(|e| ("extracting archive", e))?;

        pruned_dirs += reconcile::prune_empty_dirs(root, &matcher);

        Ok(ReconcileReport {
            deleted,
            extracted,
            pruned_dirs,
        })
    }
}
