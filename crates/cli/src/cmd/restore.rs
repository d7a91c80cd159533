//! Restore the working tree to a checkpoint

use crate::util;
use anyhow::Result;
use engine::{Engine, RestoreEngine, RestoreResult};
use owo_colors::OwoColorize;
use rw_core::{format_size, EngineError};

/// Deleted files listed before the rest are summarized
const SHOWN_DELETIONS: usize = 20;

pub fn run(reference: &str, dry_run: bool, yes: bool) -> Result<()> {
    let root = util::find_project_root()?;
    let engine = Engine::new(&root);

    let preview = RestoreEngine::new(engine.store())
        .preview(reference)
        .map_err(report_failure)?;
    let cp = &preview.checkpoint;

    println!("{} {}", "Checkpoint:".bold(), cp.name.cyan());
    println!(
        "  {} {} ({})",
        "Created:    ".dimmed(),
        util::format_absolute_time(cp.timestamp),
        util::format_relative_time(cp.timestamp).dimmed()
    );
    println!("  {} {}", "Description:".dimmed(), cp.description);
    println!(
        "  {} {} ({})",
        "Files:      ".dimmed(),
        cp.file_count,
        format_size(cp.total_size)
    );

    if preview.files_to_delete.is_empty() {
        println!("\nNo files will be deleted");
    } else {
        println!(
            "\n{} ({} files)",
            "Files to delete:".yellow().bold(),
            preview.files_to_delete.len()
        );
        for path in preview.files_to_delete.iter().take(SHOWN_DELETIONS) {
            println!("  {} {}", "-".red(), path);
        }
        if preview.files_to_delete.len() > SHOWN_DELETIONS {
            println!(
                "  {}",
                format!("... and {} more", preview.files_to_delete.len() - SHOWN_DELETIONS).dimmed()
            );
        }
    }

    if dry_run {
        println!("\n{}", "Dry run: nothing was changed".dimmed());
        return Ok(());
    }

    if !yes {
        println!();
        if !util::confirm(&format!("Restore {}?", cp.name))? {
            println!("Restore cancelled");
            return Ok(());
        }
    }

    let spinner = util::create_spinner("Restoring checkpoint...");
    let result = engine.restore(&cp.name, false);
    spinner.finish_and_clear();

    match result.map_err(report_failure)? {
        RestoreResult::Restored(outcome) => {
            println!(
                "{} Restored {}",
                "✓".green(),
                outcome.restored.name.cyan().bold()
            );
            println!(
                "  {} {}",
                "Emergency backup:".dimmed(),
                outcome.emergency_backup
            );
            println!(
                "  {} {} deleted, {} restored, {} empty directories removed",
                "Changes:".dimmed(),
                outcome.report.deleted.len(),
                outcome.report.extracted,
                outcome.report.pruned_dirs
            );
            for evicted in &outcome.eviction.evicted {
                println!("{}", format!("Removed old checkpoint: {}", evicted).dimmed());
            }
        }
        RestoreResult::DryRun(_) => {}
    }
    Ok(())
}

/// Print recovery hints for restore failures before bubbling them up
fn report_failure(err: EngineError) -> anyhow::Error {
    match &err {
        EngineError::NotFound { available, .. } if !available.is_empty() => {
            println!("{}", "Available checkpoints:".bold());
            for name in available {
                println!("  {}", name.cyan());
            }
        }
        EngineError::NotFound { .. } => {
            println!("{}", "No checkpoints yet. Run 'rw create' first.".dimmed());
        }
        EngineError::PartialFailure { backup, .. } => {
            println!(
                "{} recover the previous state with: rw restore {} -y",
                "Hint:".yellow(),
                backup
            );
        }
        _ => {}
    }
    err.into()
}
