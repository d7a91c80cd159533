//! Core building blocks for Rewind
//!
//! This crate provides:
//! - The `.checkpoints/` store layout and atomic file writes
//! - Project configuration with default-merge semantics
//! - The error taxonomy returned by engine operations
//! - Size and timestamp formatting

pub mod config;
pub mod error;
pub mod format;
pub mod store;

// Re-exports
pub use config::{Config, ConfigStore};
pub use error::EngineError;
pub use format::{format_size, timestamp_slug};
pub use store::{atomic_write, to_store_path, StoreLayout, STORE_DIR_NAME};
