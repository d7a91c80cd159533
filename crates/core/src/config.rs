//! Project configuration (`.checkpoints/config.json`)
//!
//! The file is re-read on every operation. Missing keys fall back to the
//! defaults so that keys introduced later appear in old configs without a
//! migration step.

use crate::store::{atomic_write, StoreLayout};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Persisted engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Retention limit: number of checkpoints kept (default: 10)
    pub max_checkpoints: usize,

    /// Derive checkpoint names from descriptions (default: true)
    pub auto_name: bool,

    /// Default ignore patterns
    pub ignore_patterns: Vec<String>,

    /// User-added ignore patterns
    pub additional_ignores: Vec<String>,

    /// Name used when no custom name or description is available.
    /// `{timestamp}` is replaced with the creation time slug.
    pub name_template: String,

    /// Keys this version does not know about, kept on save
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_checkpoints: 10,
            auto_name: true,
            ignore_patterns: default_ignore_patterns(),
            additional_ignores: vec![],
            name_template: "checkpoint_{timestamp}".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

fn default_ignore_patterns() -> Vec<String> {
    [
        ".git", ".checkpoints", "node_modules", ".env", ".env.*",
        "*.log", ".DS_Store", "Thumbs.db", "__pycache__", "*.pyc",
        ".vscode", ".idea", "dist", "build", "coverage", ".nyc_output",
        ".next", ".nuxt", ".cache", "tmp", "temp",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_checkpoints == 0 {
            anyhow::bail!("maxCheckpoints must be at least 1");
        }
        Ok(())
    }

    /// All configured ignore patterns, defaults first
    pub fn all_ignore_patterns(&self) -> impl Iterator<Item = &str> {
        self.ignore_patterns
            .iter()
            .chain(self.additional_ignores.iter())
            .map(String::as_str)
    }
}

/// Loads and persists [`Config`] for one project
#[derive(Debug, Clone)]
pub struct ConfigStore {
    layout: StoreLayout,
}

impl ConfigStore {
    pub fn new(layout: &StoreLayout) -> Self {
        Self {
            layout: layout.clone(),
        }
    }

    /// Load configuration, healing a missing or unparseable file
    ///
    /// Never fails: when the file cannot be read or parsed, defaults are
    /// written back (best effort) and returned.
    pub fn load(&self) -> Config {
        match self.read() {
            Ok(mut config) => {
                if let Err(e) = config.validate() {
                    warn!("Invalid configuration ({}), using maxCheckpoints = 1", e);
                    config.max_checkpoints = 1;
                }
                config
            }
            Err(e) => {
                debug!("Writing default configuration: {:#}", e);
                let config = Config::default();
                if let Err(e) = self.save(&config) {
                    warn!("Could not write default configuration: {:#}", e);
                }
                config
            }
        }
    }

    /// Load configuration without writing anything
    ///
    /// Used by read-only operations (previews); falls back to defaults.
    pub fn peek(&self) -> Config {
        match self.read() {
            Ok(mut config) => {
                config.max_checkpoints = config.max_checkpoints.max(1);
                config
            }
            Err(_) => Config::default(),
        }
    }

    /// Whether a config file is present on disk
    pub fn exists(&self) -> bool {
        self.layout.config_file().is_file()
    }

    /// Persist configuration (pretty-printed)
    pub fn save(&self, config: &Config) -> Result<()> {
        self.layout.ensure_dirs()?;
        let json = serde_json::to_string_pretty(config)
            .context("Failed to serialize configuration")?;
        atomic_write(&self.layout.config_file(), json.as_bytes())
    }

    /// Read the file and merge it over the defaults
    ///
    /// Fails only when the file is missing or is not a JSON object.
    fn read(&self) -> Result<Config> {
        let path = self.layout.config_file();
        let data = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let parsed: Map<String, Value> = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        merge_over_defaults(parsed)
    }
}

/// Apply parsed keys over [`Config::default`], one key at a time
///
/// A key whose value does not fit its field keeps the default.
fn merge_over_defaults(parsed: Map<String, Value>) -> Result<Config> {
    let mut merged = match serde_json::to_value(Config::default())? {
        Value::Object(map) => map,
        _ => anyhow::bail!("Default configuration is not an object"),
    };

    for (key, value) in parsed {
        let mut candidate = merged.clone();
        candidate.insert(key.clone(), value);
        match serde_json::from_value::<Config>(Value::Object(candidate.clone())) {
            Ok(_) => merged = candidate,
            Err(e) => warn!("Ignoring invalid config value for '{}': {}", key, e),
        }
    }

    serde_json::from_value(Value::Object(merged)).context("Failed to merge configuration")
}
