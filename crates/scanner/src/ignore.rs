//! Ignore pattern management
//!
//! Supports multiple sources of ignore patterns:
//! 1. Built-in patterns (the `.checkpoints/` store and `.git/` - always active)
//! 2. `.gitignore` patterns at the project root (optional)
//! 3. Config-based patterns (`ignorePatterns` + `additionalIgnores`)
//!
//! Any match excludes the path. Patterns are globs where `*` matches any
//! run of characters (including `/`) and `?` matches one character. A
//! pattern matches when it matches the file name alone or the path relative
//! to the project root, so a bare name like `*.log` applies at every depth.

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use rw_core::{to_store_path, Config, STORE_DIR_NAME};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Always-enforced patterns, regardless of configuration
const BUILTIN_PATTERNS: [&str; 2] = [STORE_DIR_NAME, ".git"];

/// Compile one glob with this engine's semantics
///
/// Braces are literal: `{a,b}` is not an alternation.
fn compile_glob(pattern: &str) -> Result<Glob, globset::Error> {
    let escaped = pattern.replace('{', "\\{").replace('}', "\\}");
    GlobBuilder::new(&escaped)
        .literal_separator(false)
        .backslash_escape(true)
        .build()
}

/// Match a single glob pattern against a candidate string
///
/// Invalid patterns never match.
pub fn glob_match(pattern: &str, candidate: &str) -> bool {
    match compile_glob(pattern) {
        Ok(glob) => glob.compile_matcher().is_match(candidate),
        Err(_) => false,
    }
}

/// Parse `.gitignore` content into patterns
///
/// One pattern per non-empty, non-comment line. Negations are skipped and
/// leading/trailing slashes are stripped: there is no anchoring and no
/// directory-only semantics.
pub fn parse_ignore_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| {
            if line.starts_with('!') {
                debug!("Skipping unsupported negation pattern: {}", line);
                false
            } else {
                true
            }
        })
        .map(|line| line.trim_matches('/').to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Ignore rule matcher
///
/// Combines built-in, `.gitignore` and configured patterns into a single
/// compiled [`GlobSet`].
pub struct IgnoreMatcher {
    /// Project root directory
    root: PathBuf,

    /// Every accepted pattern, in source order
    patterns: Vec<String>,

    /// Compiled union of `patterns`
    set: GlobSet,

    /// Number of patterns read from `.gitignore`
    gitignore_count: usize,

    /// Patterns that failed to compile
    rejected: Vec<String>,
}

impl IgnoreMatcher {
    /// Load ignore rules for a project
    ///
    /// An unreadable or missing `.gitignore` counts as empty.
    pub fn load(root: &Path, config: &Config) -> Self {
        let gitignore = match std::fs::read_to_string(root.join(".gitignore")) {
            Ok(content) => parse_ignore_file(&content),
            Err(e) => {
                debug!("No usable .gitignore ({}), skipping", e);
                Vec::new()
            }
        };

        Self::from_patterns(root, gitignore, config)
    }

    /// Build a matcher from already-parsed ignore-file patterns
    pub fn from_patterns(root: &Path, gitignore: Vec<String>, config: &Config) -> Self {
        let gitignore_count = gitignore.len();
        let candidates = BUILTIN_PATTERNS
            .iter()
            .map(|p| p.to_string())
            .chain(gitignore)
            .chain(config.all_ignore_patterns().map(str::to_string));

        let mut builder = GlobSetBuilder::new();
        let mut patterns = Vec::new();
        let mut rejected = Vec::new();

        for pattern in candidates {
            match compile_glob(&pattern) {
                Ok(glob) => {
                    builder.add(glob);
                    patterns.push(pattern);
                }
                Err(e) => {
                    warn!("Ignoring invalid pattern '{}': {}", pattern, e);
                    rejected.push(pattern);
                }
            }
        }

        let set = builder.build().unwrap_or_else(|e| {
            warn!("Failed to build ignore set: {}", e);
            GlobSet::empty()
        });

        Self {
            root: root.to_path_buf(),
            patterns,
            set,
            gitignore_count,
            rejected,
        }
    }

    /// Check if path should be ignored
    ///
    /// Accepts an absolute path under the project root or a path relative
    /// to it.
    pub fn should_ignore(&self, path: &Path) -> bool {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        let rel_str = to_store_path(rel);
        if rel_str.is_empty() {
            // The root itself is never ignored
            return false;
        }

        let name = rel
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.set.is_match(name.as_str()) || self.set.is_match(rel_str.as_str())
    }

    /// Active patterns, built-ins first
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Patterns contributed by `.gitignore`
    pub fn gitignore_count(&self) -> usize {
        self.gitignore_count
    }

    /// Patterns that could not be compiled
    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// Get project root
    pub fn root(&self) -> &Path {
        &self.root
    }
}
