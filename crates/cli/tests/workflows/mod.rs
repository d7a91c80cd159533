//! Workflow integration tests
//!
//! Tests for complete workflows that exercise multiple commands
//! and validate end-to-end behavior.

pub mod checkpoint_lifecycle;
pub mod restore_rewind;
