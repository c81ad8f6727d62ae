//! Counter error types.

use thiserror::Error;

/// Counting errors. All of them are recoverable: the caller skips the
/// revision that produced them.
#[derive(Debug, Error)]
pub enum CounterError {
    /// The source is not valid for its format.
    #[error("malformed {format} source: {reason}")]
    Malformed { format: &'static str, reason: String },

    /// The counter ran but produced no result.
    #[error("counter returned no result")]
    NoResult,

    /// No registered counter handles the format.
    #[error("no counter registered for {0}")]
    Unsupported(String),
}

impl CounterError {
    /// Creates a [`CounterError::Malformed`].
    #[must_use]
    pub fn malformed(format: &'static str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            reason: reason.into(),
        }
    }
}

/// Result type for counter operations.
pub type CounterResult<T> = Result<T, CounterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = CounterError::malformed("lexc", "missing LEXICON Root");
        assert_eq!(err.to_string(), "malformed lexc source: missing LEXICON Root");
    }

    #[test]
    fn test_no_result_display() {
        assert_eq!(CounterError::NoResult.to_string(), "counter returned no result");
    }

    #[test]
    fn test_unsupported_display() {
        let err = CounterError::Unsupported("metadix".to_string());
        assert_eq!(err.to_string(), "no counter registered for metadix");
    }
}
