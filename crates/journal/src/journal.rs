//! Append-only changelog of engine operations (`changelog.json`)
//!
//! Newest entries first, capped at [`MAX_ENTRIES`]. The journal is an audit
//! trail, not part of snapshot storage: a failed write is logged and never
//! fails the operation that triggered it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rw_core::{atomic_write, StoreLayout};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Maximum number of retained entries
pub const MAX_ENTRIES: usize = 50;

/// Action tag written by checkpoint creation
pub const CREATE_CHECKPOINT: &str = "CREATE_CHECKPOINT";
/// Action tag written by a completed restore
pub const RESTORE_CHECKPOINT: &str = "RESTORE_CHECKPOINT";

/// One journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub timestamp: DateTime<Utc>,
    /// Action tag, e.g. `CREATE_CHECKPOINT` or a caller-defined type
    pub action: String,
    pub description: String,
    #[serde(default)]
    pub details: Option<String>,
}

/// Size-bounded changelog journal
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    /// Open the journal for a project (the file is created lazily)
    pub fn open(layout: &StoreLayout) -> Self {
        Self {
            path: layout.changelog_file(),
        }
    }

    /// Append an entry, swallowing (and logging) any failure
    pub fn append(&self, action: &str, description: &str, details: Option<&str>) {
        if let Err(e) = self.try_append(action, description, details) {
            warn!("Could not update changelog: {:#}", e);
        }
    }

    /// Append an entry, reporting failures to the caller
    pub fn try_append(&self, action: &str, description: &str, details: Option<&str>) -> Result<()> {
        let mut entries = self.read();
        entries.insert(
            0,
            ChangelogEntry {
                timestamp: Utc::now(),
                action: action.to_string(),
                description: description.to_string(),
                details: details.map(str::to_string),
            },
        );
        entries.truncate(MAX_ENTRIES);

        let json = serde_json::to_string_pretty(&entries)
            .context("Failed to serialize changelog")?;
        atomic_write(&self.path, json.as_bytes())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;

        debug!("Changelog: {} - {}", action, description);
        Ok(())
    }

    /// Read entries, newest first
    ///
    /// A missing or corrupt file reads as empty.
    pub fn read(&self) -> Vec<ChangelogEntry> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(_) => return Vec::new(),
        };

        match serde_json::from_str::<Vec<ChangelogEntry>>(&data) {
            Ok(mut entries) => {
                entries.truncate(MAX_ENTRIES);
                entries
            }
            Err(e) => {
                warn!("Ignoring corrupt changelog {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }
}
