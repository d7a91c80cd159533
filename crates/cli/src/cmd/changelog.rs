//! Show the changelog

use crate::util;
use anyhow::Result;
use engine::Engine;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let root = util::find_project_root()?;
    let engine = Engine::new(&root);

    let entries = engine.changelog();
    if entries.is_empty() {
        println!("{}", "Changelog is empty".dimmed());
        return Ok(());
    }

    for entry in &entries {
        println!(
            "{} {} {}",
            util::format_absolute_time(entry.timestamp).dimmed(),
            format!("[{}]", entry.action).yellow(),
            entry.description
        );
        if let Some(details) = &entry.details {
            println!("    {}", details.dimmed());
        }
    }
    Ok(())
}
