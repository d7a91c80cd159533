//! Setup, create, list and changelog through the `rw` binary

use crate::common::TestProject;
use crate::rw;
use anyhow::Result;

#[test]
fn setup_prepares_project_once() -> Result<()> {
    let project = TestProject::new()?;

    let first = rw!(project.path(), "setup").assert_success()?;
    assert!(first.contains_stdout("Added .checkpoints/ to .gitignore"));
    assert!(first.contains_stdout("Initial checkpoint: initial_"));
    assert!(project.exists(".checkpoints/config.json"));
    assert!(project.read(".gitignore")?.contains("# rewind checkpoint storage\n.checkpoints/\n"));

    let second = rw!(project.path(), "setup").assert_success()?;
    assert!(!second.contains_stdout("Added .checkpoints/"));
    assert!(second.contains_stdout("1 existing checkpoints kept"));
    assert_eq!(project.snapshot_names()?.len(), 1);
    Ok(())
}

#[test]
fn create_and_list_checkpoints() -> Result<()> {
    let project = TestProject::new()?;

    let created = rw!(project.path(), "create", "-n", "first", "-d", "First pass").assert_success()?;
    let first = created.parse_checkpoint_name().expect("checkpoint name");
    assert!(first.starts_with("first_"));
    assert!(created.contains_stdout("First pass"));
    // README.md, src/main.rs, src/lib.rs; debug.log is ignored
    assert!(created.contains_stdout("3"));

    let second = rw!(project.path(), "create", "-d", "Add parser module")
        .assert_success()?
        .parse_checkpoint_name()
        .expect("checkpoint name");
    assert!(second.starts_with("add_parser_module_"));

    let listed = rw!(project.path(), "list").assert_success()?;
    let first_pos = listed.stdout.find(&first).expect("first listed");
    let second_pos = listed.stdout.find(&second).expect("second listed");
    assert!(second_pos < first_pos, "newest checkpoint must come first");
    Ok(())
}

#[test]
fn create_without_files_fails() -> Result<()> {
    let project = TestProject::empty()?;

    let result = rw!(project.path(), "create").assert_failure()?;
    assert_eq!(result.exit_code, 1);
    assert!(result.contains_stderr("No files found to checkpoint"));
    Ok(())
}

#[test]
fn list_empty_project() -> Result<()> {
    let project = TestProject::new()?;

    let result = rw!(project.path(), "list").assert_success()?;
    assert!(result.contains_stdout("No checkpoints yet"));
    assert!(!project.exists(".checkpoints"));
    Ok(())
}

#[test]
fn log_entries_appear_in_changelog() -> Result<()> {
    let project = TestProject::new()?;

    rw!(project.path(), "create", "-d", "baseline").assert_success()?;
    rw!(project.path(), "log", "Fixed off-by-one", "-t", "BUG_FIX", "-d", "loop bound").assert_success()?;
    rw!(project.path(), "log", "Tweaked styles").assert_success()?;

    let changelog = rw!(project.path(), "changelog").assert_success()?;
    let lines: Vec<&str> = changelog.stdout.lines().collect();

    assert!(lines[0].contains("[CODE_CHANGE] Tweaked styles"));
    assert!(lines[1].contains("[BUG_FIX] Fixed off-by-one"));
    assert!(lines[2].contains("loop bound"));
    assert!(changelog.contains_stdout("[CREATE_CHECKPOINT] Created checkpoint: baseline_"));
    Ok(())
}
