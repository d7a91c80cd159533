//! Project fixtures for CLI integration tests

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway project directory with a few source files
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    /// Small project: a README, two sources and a log file (ignored)
    pub fn new() -> Result<Self> {
        let project = Self { dir: TempDir::new()? };
        project.write("README.md", "# demo\n")?;
        project.write("src/main.rs", "fn main() {}\n")?;
        project.write("src/lib.rs", "pub fn add(a: i32, b: i32) -> i32 { a + b }\n")?;
        project.write("debug.log", "noise\n")?;
        Ok(project)
    }

    /// Project with no files at all
    pub fn empty() -> Result<Self> {
        Ok(Self { dir: TempDir::new()? })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write a file, creating parent directories
    pub fn write(&self, rel: &str, content: &str) -> Result<()> {
        let path = self.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        Ok(fs::read_to_string(self.join(rel))?)
    }

    pub fn exists(&self, rel: &str) -> bool {
        self.join(rel).exists()
    }

    /// Names of the checkpoint directories on disk
    pub fn snapshot_names(&self) -> Result<Vec<String>> {
        let dir = self.join(".checkpoints/snapshots");
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }
}
