//! Runs the `rw` binary from integration tests
//!
//! Output is captured with colour codes stripped so tests can match on
//! plain text.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// `rw` invocation in a project directory
pub struct RwCommand {
    binary_path: PathBuf,
    working_dir: PathBuf,
    args: Vec<String>,
    stdin_data: Option<String>,
}

impl RwCommand {
    /// Create a new command in the given working directory
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_rw")),
            working_dir: working_dir.as_ref().to_path_buf(),
            args: Vec::new(),
            stdin_data: None,
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Provide stdin data
    pub fn stdin(&mut self, data: &str) -> &mut Self {
        self.stdin_data = Some(data.to_string());
        self
    }

    /// Run to completion and capture output
    pub fn execute(&self) -> Result<CommandResult> {
        let mut command = Command::new(&self.binary_path);
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().context("Failed to spawn command")?;

        // Always close stdin so prompts never block
        if let Some(mut stdin) = child.stdin.take() {
            use std::io::Write;
            if let Some(data) = &self.stdin_data {
                stdin.write_all(data.as_bytes())?;
            }
        }

        let output = child
            .wait_with_output()
            .context("Failed to wait for command")?;

        Ok(CommandResult {
            stdout: strip_ansi(&String::from_utf8_lossy(&output.stdout)),
            stderr: strip_ansi(&String::from_utf8_lossy(&output.stderr)),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout
            );
        }

        Ok(result)
    }
}

/// Captured output of one invocation
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Check if stdout contains text
    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }

    /// Check if stderr contains text
    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }

    /// Parse the checkpoint name printed by `rw create`
    pub fn parse_checkpoint_name(&self) -> Option<String> {
        self.stdout
            .lines()
            .find_map(|line| line.split_once("Checkpoint created:"))
            .map(|(_, name)| name.trim().to_string())
    }

    /// Parse the emergency backup name printed by `rw restore`
    pub fn parse_emergency_backup(&self) -> Option<String> {
        self.stdout
            .lines()
            .find_map(|line| line.split_once("Emergency backup:"))
            .map(|(_, name)| name.trim().to_string())
    }
}

/// Remove ANSI colour sequences from command output
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // Skip `ESC [ ... <letter>`
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// rw!(dir, "setup").assert_success()?;
/// rw!(dir, "restore", &name).stdin("y\n").assert_success()?;
/// ```
#[macro_export]
macro_rules! rw {
    ($dir:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::RwCommand::new($dir);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\u{1b}[36m\u{1b}[1mname\u{1b}[0m\u{1b}[0m ok"), "name ok");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn test_parse_checkpoint_name() {
        let result = CommandResult {
            stdout: "✓ Checkpoint created: before_refactor_2024-01-03T14-30-00\n  Files: 3".to_string(),
            stderr: String::new(),
            exit_code: 0,
        };

        assert_eq!(
            result.parse_checkpoint_name().as_deref(),
            Some("before_refactor_2024-01-03T14-30-00")
        );
        assert!(result.parse_emergency_backup().is_none());
    }
}
