//! Git error types.

use thiserror::Error;

/// Git-related errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not a git repository.
    #[error("not a git repository: {0}")]
    NotARepo(std::path::PathBuf),

    /// The repository has no working directory to stage files from.
    #[error("repository is bare, cannot stage files")]
    BareRepo,

    /// A path to stage lies outside the working directory.
    #[error("path is outside the repository: {0}")]
    OutsideWorkdir(std::path::PathBuf),

    /// Tag already exists.
    #[error("tag already exists: {0}")]
    TagExists(String),

    /// Git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_not_a_repo_display() {
        let err = GitError::NotARepo(PathBuf::from("/tmp/not-git"));
        assert_eq!(err.to_string(), "not a git repository: /tmp/not-git");
    }

    #[test]
    fn test_tag_exists_display() {
        let err = GitError::TagExists("v1.0.0".to_string());
        assert_eq!(err.to_string(), "tag already exists: v1.0.0");
    }

    #[test]
    fn test_outside_workdir_display() {
        let err = GitError::OutsideWorkdir(PathBuf::from("/etc/passwd"));
        assert_eq!(err.to_string(), "path is outside the repository: /etc/passwd");
    }

    #[test]
    fn test_error_is_debug() {
        let err = GitError::BareRepo;
        let debug = format!("{err:?}");
        assert!(debug.contains("BareRepo"));
    }
}
