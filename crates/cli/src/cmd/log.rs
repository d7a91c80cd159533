//! Add a changelog entry

use crate::util;
use anyhow::Result;
use engine::Engine;
use owo_colors::OwoColorize;

pub fn run(action: &str, description: &str, details: Option<&str>) -> Result<()> {
    let root = util::find_project_root()?;
    let engine = Engine::new(&root);

    engine.log(action, description, details)?;

    println!("{} Logged {}: {}", "✓".green(), action.yellow(), description);
    Ok(())
}
