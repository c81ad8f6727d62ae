//! Git error types.

use std::path::PathBuf;

use thiserror::Error;

/// Git-related errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// The remote repository does not exist.
    #[error(
        "unable to clone {name} from {url}. Please check if {code} is a valid Apertium language or pair and remove it from the families file if it isn't"
    )]
    RepoNotFound {
        name: String,
        code: String,
        url: String,
    },

    /// The remote exists but could not be reached or transferred.
    #[error("network error while syncing {name}")]
    Network {
        name: String,
        #[source]
        source: git2::Error,
    },

    /// Not a git repository.
    #[error("not a git repository: {0}")]
    NotARepo(PathBuf),

    /// A `git` subprocess exited unsuccessfully.
    #[error("`git {command}` failed: {stderr}")]
    Command { command: String, stderr: String },

    /// Git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for git operations.
pub type GitResult<T> = Result<T, GitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_not_found_display() {
        let err = GitError::RepoNotFound {
            name: "apertium-xyz".to_string(),
            code: "xyz".to_string(),
            url: "https://github.com/apertium/apertium-xyz".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("unable to clone apertium-xyz"));
        assert!(msg.contains("xyz is a valid Apertium language"));
    }

    #[test]
    fn test_not_a_repo_display() {
        let err = GitError::NotARepo(PathBuf::from("/tmp/not-git"));
        assert_eq!(err.to_string(), "not a git repository: /tmp/not-git");
    }

    #[test]
    fn test_command_display() {
        let err = GitError::Command {
            command: "log".to_string(),
            stderr: "fatal: bad revision".to_string(),
        };
        assert_eq!(err.to_string(), "`git log` failed: fatal: bad revision");
    }

    #[test]
    fn test_network_keeps_source() {
        let err = GitError::Network {
            name: "apertium-tat".to_string(),
            source: git2::Error::from_str("connection reset"),
        };
        assert_eq!(err.to_string(), "network error while syncing apertium-tat");
        assert!(std::error::Error::source(&err).is_some());
    }
}
