//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use rw_core::STORE_DIR_NAME;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Find the project root by walking up from cwd to a `.checkpoints/` dir
///
/// Falls back to the current directory when no ancestor has one, so that
/// `rw setup` and a first `rw create` work in a fresh project.
pub fn find_project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let root = find_root_from(&cwd).unwrap_or(cwd);
    debug!("Project root: {}", root.display());
    Ok(root)
}

fn find_root_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(STORE_DIR_NAME).is_dir())
        .map(Path::to_path_buf)
}

/// Format timestamp as relative time ("2 hours ago")
pub fn format_relative_time(ts: DateTime<Utc>) -> String {
    let seconds = Utc::now().signed_duration_since(ts).num_seconds();

    if seconds < 0 {
        "in the future".to_string()
    } else if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", seconds / 60)
    } else if seconds < 86400 {
        format!("{} hours ago", seconds / 3600)
    } else if seconds < 604800 {
        format!("{} days ago", seconds / 86400)
    } else {
        format!("{} weeks ago", seconds / 604800)
    }
}

/// Format timestamp in local time ("2024-01-03 14:30:00")
pub fn format_absolute_time(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Create a spinner for long-running operations
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use tempfile::TempDir;

    #[test]
    fn test_find_root_from_nested_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(STORE_DIR_NAME)).unwrap();
        let nested = temp.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_root_from(&nested), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn test_find_root_without_store() {
        let temp = TempDir::new().unwrap();
        assert_eq!(find_root_from(temp.path()), None);
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc::now();
        assert!(format_relative_time(now - ChronoDuration::seconds(5)).ends_with("seconds ago"));
        assert_eq!(format_relative_time(now - ChronoDuration::minutes(3)), "3 minutes ago");
        assert_eq!(format_relative_time(now - ChronoDuration::hours(2)), "2 hours ago");
        assert_eq!(format_relative_time(now - ChronoDuration::days(3)), "3 days ago");
        assert_eq!(format_relative_time(now + ChronoDuration::hours(1)), "in the future");
    }
}
