//! Stem counter interface for the family visualizer scraper.
//!
//! This crate provides the counter seam and the format dispatch around it:
//! - [`Plugin`]: Base trait for all counters
//! - [`StemCounter`]: Counts stems or entries in one dictionary source
//! - [`FileFormat`]: The recognised dictionary formats
//! - [`CounterSet`]: Dispatches content to the counter for its format and
//!   turns every failure into [`CountOutcome::Failed`]

mod adapter;
mod error;
mod format;

pub use adapter::{CountOutcome, CounterSet};
pub use error::{CounterError, CounterResult};
pub use format::FileFormat;

/// Base trait for all plugins.
pub trait Plugin: Send + Sync {
    /// Returns the plugin name.
    fn name(&self) -> &'static str;

    /// Returns the plugin version.
    fn version(&self) -> &'static str;

    /// Returns a short description of the plugin.
    fn description(&self) -> &'static str {
        ""
    }
}

/// Counts the lexical units of one dictionary source.
pub trait StemCounter: Plugin {
    /// Returns whether this counter understands `format`.
    fn supports(&self, format: FileFormat) -> bool;

    /// Counts stems (monolingual) or entries (bilingual) in `content`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be parsed.
    fn count(&self, content: &str, bilingual: bool) -> CounterResult<u64>;
}
