//! Rewind CLI - rw command

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

mod cmd;
mod util;

/// Rewind - Named checkpoints of your project, restorable at any time
#[derive(Parser)]
#[command(name = "rw")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prepare the current project for checkpointing
    Setup,
    /// Create a checkpoint of the working tree
    Create {
        /// Checkpoint name prefix (a timestamp is appended)
        #[arg(short, long)]
        name: Option<String>,
        /// What this checkpoint captures
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List checkpoints, newest first
    List,
    /// Restore the working tree to a checkpoint
    Restore {
        /// Checkpoint name or any part of it
        checkpoint: String,
        /// Show what would change without touching anything
        #[arg(long)]
        dry_run: bool,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Show the changelog
    Changelog,
    /// Add an entry to the changelog
    Log {
        /// What changed
        description: String,
        /// Additional details
        #[arg(short, long)]
        details: Option<String>,
        /// Entry type
        #[arg(short = 't', long = "type", default_value = "CODE_CHANGE")]
        action: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Setup => cmd::setup::run(),
        Commands::Create { name, description } => {
            cmd::create::run(name.as_deref(), description.as_deref())
        }
        Commands::List => cmd::list::run(),
        Commands::Restore { checkpoint, dry_run, yes } => {
            cmd::restore::run(&checkpoint, dry_run, yes)
        }
        Commands::Changelog => cmd::changelog::run(),
        Commands::Log { description, details, action } => {
            cmd::log::run(&action, &description, details.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
