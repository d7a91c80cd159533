//! File discovery for Rewind
//!
//! This crate provides:
//! - Ignore rules (built-in, `.gitignore`, configured globs)
//! - Deterministic enumeration of project files

pub mod ignore;
pub mod walk;

// Re-exports
pub use ignore::{glob_match, parse_ignore_file, IgnoreMatcher};
pub use walk::{Enumeration, FileEnumerator};

use rw_core::Config;
use std::path::Path;

/// Enumerate project files using the current ignore rules
pub fn scan_project(root: &Path, config: &Config) -> Enumeration {
    let matcher = IgnoreMatcher::load(root, config);
    FileEnumerator::new(root, &matcher).list_files()
}
