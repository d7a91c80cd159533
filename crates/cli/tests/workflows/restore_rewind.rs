//! Restoring checkpoints through the `rw` binary

use crate::common::TestProject;
use crate::rw;
use anyhow::Result;

fn checkpoint(project: &TestProject, name: &str) -> Result<String> {
    let created = rw!(project.path(), "create", "-n", name).assert_success()?;
    Ok(created.parse_checkpoint_name().expect("checkpoint name"))
}

#[test]
fn restore_rewinds_working_tree() -> Result<()> {
    let project = TestProject::new()?;
    let base = checkpoint(&project, "base")?;

    project.write("src/main.rs", "fn main() { panic!() }\n")?;
    project.write("src/extra/helper.rs", "pub fn help() {}\n")?;

    let result = rw!(project.path(), "restore", "base", "-y").assert_success()?;
    assert!(result.contains_stdout(&format!("Restored {}", base)));
    let backup = result.parse_emergency_backup().expect("backup name");
    assert!(backup.starts_with("emergency_backup_"));

    assert_eq!(project.read("src/main.rs")?, "fn main() {}\n");
    assert!(!project.exists("src/extra"));
    // Ignored files are left alone
    assert!(project.exists("debug.log"));

    let changelog = rw!(project.path(), "changelog").assert_success()?;
    assert!(changelog.contains_stdout(&format!("Restored checkpoint: {}", base)));
    assert!(changelog.contains_stdout(&format!("Emergency backup: {}", backup)));
    Ok(())
}

#[test]
fn dry_run_changes_nothing() -> Result<()> {
    let project = TestProject::new()?;
    checkpoint(&project, "base")?;
    project.write("notes.txt", "draft\n")?;

    let result = rw!(project.path(), "restore", "base", "--dry-run").assert_success()?;

    assert!(result.contains_stdout("Files to delete: (1 files)"));
    assert!(result.contains_stdout("notes.txt"));
    assert!(result.contains_stdout("Dry run"));
    assert!(project.exists("notes.txt"));
    assert_eq!(project.snapshot_names()?.len(), 1);
    Ok(())
}

#[test]
fn declining_the_prompt_cancels() -> Result<()> {
    let project = TestProject::new()?;
    checkpoint(&project, "base")?;
    project.write("notes.txt", "draft\n")?;

    let mut cmd = rw!(project.path(), "restore", "base");
    let result = cmd.stdin("n\n").assert_success()?;

    assert!(result.contains_stdout("Restore cancelled"));
    assert!(project.exists("notes.txt"));
    assert_eq!(project.snapshot_names()?.len(), 1);
    Ok(())
}

#[test]
fn confirming_the_prompt_restores() -> Result<()> {
    let project = TestProject::new()?;
    checkpoint(&project, "base")?;
    project.write("notes.txt", "draft\n")?;

    let mut cmd = rw!(project.path(), "restore", "base");
    cmd.stdin("y\n").assert_success()?;

    assert!(!project.exists("notes.txt"));
    assert_eq!(project.snapshot_names()?.len(), 2);
    Ok(())
}

#[test]
fn unknown_reference_lists_available() -> Result<()> {
    let project = TestProject::new()?;
    let base = checkpoint(&project, "base")?;
    let before = project.snapshot_names()?;

    let result = rw!(project.path(), "restore", "nope", "-y").assert_failure()?;

    assert_eq!(result.exit_code, 1);
    assert!(result.contains_stderr("Checkpoint not found: nope"));
    assert!(result.contains_stdout("Available checkpoints:"));
    assert!(result.contains_stdout(&base));
    assert_eq!(project.snapshot_names()?, before);
    Ok(())
}

#[test]
fn restore_from_subdirectory_uses_project_root() -> Result<()> {
    let project = TestProject::new()?;
    checkpoint(&project, "base")?;
    project.write("src/scratch.rs", "// scratch\n")?;

    rw!(project.join("src"), "restore", "base", "-y").assert_success()?;

    assert!(!project.exists("src/scratch.rs"));
    assert!(project.exists("src/main.rs"));
    Ok(())
}
