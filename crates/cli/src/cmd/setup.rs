//! Prepare a project for checkpointing

use crate::util;
use anyhow::Result;
use engine::Engine;
use owo_colors::OwoColorize;

pub fn run() -> Result<()> {
    let root = util::find_project_root()?;
    let engine = Engine::new(&root);

    println!("Setting up Rewind at {}", root.display());

    let report = engine.setup()?;

    println!("{} Storage ready in .checkpoints/", "✓".green());
    if report.config_created {
        println!("{} Created .checkpoints/config.json", "✓".green());
    }
    if report.gitignore_updated {
        println!("{} Added .checkpoints/ to .gitignore", "✓".green());
    }
    match report.initial_checkpoint {
        Some(name) => println!("{} Initial checkpoint: {}", "✓".green(), name.cyan()),
        None => {
            let count = engine.list().checkpoints.len();
            if count == 0 {
                println!("{}", "No files yet, skipped initial checkpoint".dimmed());
            } else {
                println!("{}", format!("{} existing checkpoints kept", count).dimmed());
            }
        }
    }

    println!();
    println!("Next steps:");
    println!("  - Run 'rw create -d \"what changed\"' to save a checkpoint");
    println!("  - Run 'rw list' to see your checkpoints");
    Ok(())
}
