//! Core error types.

use thiserror::Error;

use semver::Version;

use crate::{BumpType, FileUpdateError};

/// Errors raised while classifying a changelog.
///
/// All of them are terminal for a release: the caller reports them and stops.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The changelog lacks the two-heading structure.
    #[error(
        "malformed changelog: expected an `## Unreleased` heading followed by at least one more `##` heading"
    )]
    MalformedChangelog,

    /// The changelog says there is nothing worth releasing.
    #[error("nothing to release: changelog states \"No public interface changes\"")]
    NothingToRelease,

    /// The override is not a known bump type.
    #[error("invalid bump type override {0:?}: expected one of major, minor, patch")]
    InvalidOverride(String),
}

/// Result type for classification.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Core-related errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Classification error.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// Git error.
    #[error("git error: {0}")]
    Git(#[from] changebump_git::GitError),

    /// Version file error.
    #[error("version file error: {0}")]
    File(#[from] FileUpdateError),

    /// A release step command failed.
    #[error("{step} step failed: `{command}` ({status})")]
    StepFailed {
        step: String,
        command: String,
        status: std::process::ExitStatus,
    },

    /// A release step command could not be started.
    #[error("{step} step failed: could not run `{command}`: {source}")]
    StepSpawn {
        step: String,
        command: String,
        source: std::io::Error,
    },

    /// The bumped version component does not fit in a `u64`.
    #[error("cannot apply a {bump} bump to {version}: version component overflow")]
    VersionOverflow { version: Version, bump: BumpType },

    /// Changelog could not be read or written.
    #[error("changelog {path}: {source}")]
    Changelog {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_override_echoes_value() {
        let err = ClassifyError::InvalidOverride("huge".to_string());
        assert_eq!(
            err.to_string(),
            "invalid bump type override \"huge\": expected one of major, minor, patch"
        );
    }

    #[test]
    fn test_malformed_names_expected_structure() {
        let msg = ClassifyError::MalformedChangelog.to_string();
        assert!(msg.contains("## Unreleased"));
    }

    #[test]
    fn test_classify_error_is_transparent() {
        let err = CoreError::from(ClassifyError::NothingToRelease);
        assert_eq!(err.to_string(), ClassifyError::NothingToRelease.to_string());
    }

    #[cfg(unix)]
    #[test]
    fn test_step_failed_display() {
        use std::os::unix::process::ExitStatusExt;

        let err = CoreError::StepFailed {
            step: "test".to_string(),
            command: "npm test".to_string(),
            status: std::process::ExitStatus::from_raw(1 << 8),
        };
        assert_eq!(
            err.to_string(),
            "test step failed: `npm test` (exit status: 1)"
        );
    }
}
