//! Retention policy: count-based eviction of old checkpoints

use crate::Checkpoint;
use rw_core::Config;

/// Retention policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    /// Number of checkpoints to keep (default: 10, never below 1)
    pub max_checkpoints: usize,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RetentionPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_checkpoints: config.max_checkpoints.max(1),
        }
    }

    /// Select the checkpoints to evict
    ///
    /// `checkpoints` must be ordered newest first. Everything past the
    /// first `max_checkpoints` entries is returned, oldest last. No
    /// checkpoint is exempt.
    pub fn select<'a>(&self, checkpoints: &'a [Checkpoint]) -> &'a [Checkpoint] {
        if checkpoints.len() > self.max_checkpoints {
            &checkpoints[self.max_checkpoints..]
        } else {
            &[]
        }
    }
}

/// What an eviction pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvictionReport {
    /// Names of checkpoints removed
    pub evicted: Vec<String>,
    /// Names of checkpoints that could not be removed
    pub failed: Vec<String>,
}
