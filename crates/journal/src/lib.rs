//! Checkpoint storage and history
//!
//! This crate provides:
//! - Checkpoint manifests and name generation
//! - `files.tar.gz` archive creation and extraction
//! - The snapshot store (create / list / evict)
//! - Count-based retention policy
//! - The size-bounded changelog journal

pub mod archive;
pub mod checkpoint;
pub mod journal;
pub mod retention;
pub mod snapshots;

// Re-exports
pub use archive::{archive_entries, build_archive, extract_archive, ArchiveReport};
pub use checkpoint::{Checkpoint, DEFAULT_DESCRIPTION};
pub use journal::{ChangelogEntry, Journal, CREATE_CHECKPOINT, MAX_ENTRIES, RESTORE_CHECKPOINT};
pub use retention::{EvictionReport, RetentionPolicy};
pub use snapshots::{sum_sizes, CreatedCheckpoint, Eviction, Listing, SizeSummary, SnapshotStore};
