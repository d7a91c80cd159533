//! Create a checkpoint

use crate::util;
use anyhow::Result;
use engine::Engine;
use owo_colors::OwoColorize;

pub fn run(name: Option<&str>, description: Option<&str>) -> Result<()> {
    let root = util::find_project_root()?;
    let engine = Engine::new(&root);

    let spinner = util::create_spinner("Creating checkpoint...");
    let result = engine.create(name, description);
    spinner.finish_and_clear();
    let created = result?;

    let cp = &created.checkpoint;
    println!("{} Checkpoint created: {}", "✓".green(), cp.name.cyan().bold());
    println!("  {} {}", "Description:".dimmed(), cp.description);
    println!("  {} {}", "Files:      ".dimmed(), cp.file_count);
    println!("  {} {}", "Size:       ".dimmed(), created.size);

    if !created.archive.vanished.is_empty() {
        println!(
            "{} {} files disappeared while archiving",
            "Warning:".yellow(),
            created.archive.vanished.len()
        );
    }
    if created.unreadable > 0 {
        println!(
            "{} {} files could not be sized",
            "Warning:".yellow(),
            created.unreadable
        );
    }
    for evicted in &created.eviction.evicted {
        println!("{}", format!("Removed old checkpoint: {}", evicted).dimmed());
    }
    Ok(())
}
