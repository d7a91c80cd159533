//! Human-readable formatting shared by the engine and its adapters

use chrono::{DateTime, Utc};

/// Format a byte count in the largest fitting unit, one decimal place
///
/// Divides by 1024 while the value is at least 1024 and a larger unit
/// remains: `0 -> "0.0B"`, `1536 -> "1.5KB"`, `1048576 -> "1.0MB"`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1}{}", size, UNITS[unit])
}

/// Timestamp fragment embedded in checkpoint names (`2024-01-03T14-30-00`)
///
/// Colons are not portable in directory names, so every separator in the
/// time part is a dash.
pub fn timestamp_slug(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S").to_string()
}
