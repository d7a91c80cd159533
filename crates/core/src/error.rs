//! Error taxonomy surfaced by engine operations

use thiserror::Error;

/// Errors returned by the public checkpoint/restore operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Enumeration produced no files to checkpoint
    #[error("No files found to checkpoint")]
    NoFiles,

    /// No checkpoint name matches the reference
    #[error("Checkpoint not found: {reference}")]
    NotFound {
        reference: String,
        /// Newest checkpoint names, to help the caller retry
        available: Vec<String>,
    },

    /// The pre-restore safety snapshot could not be created.
    /// Nothing in the working tree was touched.
    #[error("Failed to create emergency backup: {reason}")]
    BackupFailed { reason: String },

    /// Reconciliation failed after the emergency backup was taken
    #[error(
        "Restore of '{target}' failed while {stage}: {reason} \
         (emergency backup '{backup}' holds the previous state)"
    )]
    PartialFailure {
        target: String,
        backup: String,
        stage: &'static str,
        reason: String,
    },

    /// Generic filesystem or archive failure
    #[error(transparent)]
    Io(#[from] anyhow::Error),
}

impl EngineError {
    /// Create a NotFound error with a preview of available names
    pub fn not_found(reference: impl Into<String>, available: Vec<String>) -> Self {
        Self::NotFound {
            reference: reference.into(),
            available,
        }
    }

    /// Name of the emergency backup the caller can recover from, if any
    pub fn recovery_backup(&self) -> Option<&str> {
        match self {
            Self::PartialFailure { backup, .. } => Some(backup),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_names_backup() {
        let err = EngineError::PartialFailure {
            target: "initial_2024-01-03T14-30-00".to_string(),
            backup: "emergency_backup_2024-01-03T15-00-00".to_string(),
            stage: "extracting archive",
            reason: "disk full".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("emergency_backup_2024-01-03T15-00-00"));
        assert!(msg.contains("extracting archive"));
        assert_eq!(err.recovery_backup(), Some("emergency_backup_2024-01-03T15-00-00"));
    }

    #[test]
    fn test_io_error_is_transparent() {
        let err: EngineError = anyhow::anyhow!("archive truncated").into();
        assert_eq!(err.to_string(), "archive truncated");
        assert!(err.recovery_backup().is_none());
    }
}
