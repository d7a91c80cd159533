//! Resolve checkpoint references to checkpoints
//!
//! Supports:
//! - Full name: "before_refactor_2024-01-03T14-30-00"
//! - Any substring of a name: "before_refactor", "2024-01-03"
//!
//! An exact name always wins. Otherwise the newest checkpoint whose name
//! contains the reference is chosen, which can pick an unintended
//! checkpoint when several names share the fragment; adapters should show
//! the resolved name back to the user.

use journal::Checkpoint;
use rw_core::EngineError;

/// Number of names offered back when a reference does not resolve
pub const PREVIEW_LEN: usize = 5;

/// Find the checkpoint a reference designates
///
/// `checkpoints` must be ordered newest first.
pub fn resolve<'a>(checkpoints: &'a [Checkpoint], reference: &str) -> Option<&'a Checkpoint> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }

    checkpoints
        .iter()
        .find(|cp| cp.name == reference)
        .or_else(|| checkpoints.iter().find(|cp| cp.name.contains(reference)))
}

/// Resolve or build a `NotFound` error listing the newest names
pub fn resolve_owned(checkpoints: Vec<Checkpoint>, reference: &str) -> Result<Checkpoint, EngineError> {
    if let Some(found) = resolve(&checkpoints, reference) {
        return Ok(found.clone());
    }

    let available = checkpoints
        .iter()
        .take(PREVIEW_LEN)
        .map(|cp| cp.name.clone())
        .collect();
    Err(EngineError::not_found(reference, available))
}
