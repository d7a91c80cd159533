//! Checkpoint data structures

use chrono::{DateTime, Utc};
use rw_core::{timestamp_slug, Config};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Description used when the caller gives none
pub const DEFAULT_DESCRIPTION: &str = "Manual checkpoint";

/// Maximum length of a description-derived name prefix
const SLUG_MAX_LEN: usize = 30;

/// A checkpoint is an immutable snapshot of the project at a point in time
///
/// This is the manifest stored next to the archive as `manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    /// Unique name; also the directory name under `snapshots/`
    pub name: String,
    /// Creation instant
    pub timestamp: DateTime<Utc>,
    pub description: String,
    /// Project-relative paths, sorted
    pub files: Vec<String>,
    /// Always `files.len()`
    pub file_count: usize,
    /// Sum of file sizes at creation time (best effort)
    pub total_size: u64,
}

impl Checkpoint {
    /// Create a new checkpoint record
    pub fn new(
        name: String,
        description: String,
        mut files: Vec<String>,
        total_size: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        files.sort();
        files.dedup();
        let file_count = files.len();
        Self {
            name,
            timestamp,
            description,
            files,
            file_count,
            total_size,
        }
    }

    /// Paths captured by this checkpoint, for membership tests
    pub fn file_set(&self) -> HashSet<&str> {
        self.files.iter().map(String::as_str).collect()
    }

    /// Ordering used everywhere checkpoints are listed: newest first,
    /// ties broken by name (descending)
    pub fn newest_first(a: &Checkpoint, b: &Checkpoint) -> Ordering {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.name.cmp(&a.name))
    }
}

/// Lowercase, alphanumeric + underscore slice of a description
///
/// Characters other than ASCII letters, digits and whitespace are dropped,
/// whitespace runs become `_`, and the result is cut to 30 characters.
pub fn slugify_description(description: &str) -> String {
    let cleaned: String = description
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(SLUG_MAX_LEN)
        .collect()
}

/// Make a caller-supplied name safe to use as a directory name
pub fn sanitize_name(name: &str) -> String {
    replace_unsafe(name.trim()).trim_start_matches('.').to_string()
}

fn replace_unsafe(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Generate a checkpoint name as `{prefix}_{timestamp}`
///
/// The prefix is, in order of preference: the custom name, the description
/// slug (when `autoName` is on), or the configured name template.
pub fn generate_name(
    custom: Option<&str>,
    description: Option<&str>,
    config: &Config,
    at: DateTime<Utc>,
) -> String {
    let timestamp = timestamp_slug(at);

    if let Some(prefix) = custom.map(sanitize_name).filter(|p| !p.is_empty()) {
        return format!("{}_{}", prefix, timestamp);
    }

    if config.auto_name {
        if let Some(slug) = description.map(slugify_description).filter(|s| !s.is_empty()) {
            return format!("{}_{}", slug, timestamp);
        }
    }

    from_template(&config.name_template, &timestamp)
}

fn from_template(template: &str, timestamp: &str) -> String {
    const PLACEHOLDER: &str = "{timestamp}";

    if template.contains(PLACEHOLDER) {
        let name = template
            .split(PLACEHOLDER)
            .map(replace_unsafe)
            .collect::<Vec<_>>()
            .join(timestamp);
        return name.trim_start_matches('.').to_string();
    }

    let prefix = sanitize_name(template);
    let prefix = if prefix.is_empty() { "checkpoint" } else { prefix.as_str() };
    format!("{}_{}", prefix, timestamp)
}
