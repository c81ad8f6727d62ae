//! Core error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a scrape.
///
/// Per-revision problems (a revision that cannot be fetched or counted) are
/// not errors; the merger skips them.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Git error.
    #[error(transparent)]
    Git(#[from] famviz_git::GitError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] famviz_config::ConfigError),

    /// Stats service, wiki or raw content error.
    #[error(transparent)]
    Remote(#[from] famviz_remote::RemoteError),

    /// An output file could not be encoded.
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
