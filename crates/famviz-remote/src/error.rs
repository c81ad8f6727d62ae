//! Error types for remote collaborators.

/// Result type for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote error types.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request could not be completed.
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The body could not be decoded.
    #[error("invalid response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The stats service answered without the expected field.
    #[error(
        "The stats-service seems to be updating at the moment ({url} has no `{field}`). Please try again later"
    )]
    ServiceUpdating { url: String, field: &'static str },

    /// The wiki page has no usable table.
    #[error("unable to read the wiki table at {url}: {reason}")]
    Wiki { url: String, reason: String },
}

impl RemoteError {
    /// Returns true for errors that a retry may resolve.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Request { source, .. } => {
                source.is_timeout() || source.is_connect() || source.is_request()
            }
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
