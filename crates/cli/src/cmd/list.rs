//! List checkpoints

use crate::util;
use anyhow::Result;
use engine::Engine;
use owo_colors::OwoColorize;
use rw_core::format_size;

pub fn run() -> Result<()> {
    let root = util::find_project_root()?;
    let engine = Engine::new(&root);

    let listing = engine.list();

    if listing.checkpoints.is_empty() {
        println!("{}", "No checkpoints yet".dimmed());
        println!("Run 'rw create' to save the current state");
    } else {
        println!("{} ({})", "Checkpoints".bold(), listing.checkpoints.len());
        println!();

        for cp in &listing.checkpoints {
            println!(
                "{} {}",
                cp.name.cyan().bold(),
                util::format_relative_time(cp.timestamp).dimmed()
            );
            println!(
                "  {} - {} files, {}",
                cp.description,
                cp.file_count,
                format_size(cp.total_size)
            );
        }
    }

    if listing.skipped > 0 {
        println!();
        println!(
            "{} {} unreadable checkpoints skipped",
            "Warning:".yellow(),
            listing.skipped
        );
    }
    Ok(())
}
