//! Format dispatch to the registered counters.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::debug;

use crate::{CounterError, FileFormat, StemCounter};

/// Result of counting one revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountOutcome {
    /// The number of stems or entries.
    Stems(u64),
    /// The revision could not be counted; the caller skips it.
    Failed(String),
}

/// The set of counters available for dispatch.
#[derive(Default)]
pub struct CounterSet {
    counters: Vec<Box<dyn StemCounter>>,
}

impl CounterSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a counter. Earlier counters win when several support a format.
    #[must_use]
    pub fn with_counter(mut self, counter: Box<dyn StemCounter>) -> Self {
        self.counters.push(counter);
        self
    }

    /// Returns the counter used for `format`.
    #[must_use]
    pub fn counter_for(&self, format: FileFormat) -> Option<&dyn StemCounter> {
        self.counters
            .iter()
            .find(|c| c.supports(format))
            .map(|c| &**c)
    }

    /// Counts `content` with the counter for `format`.
    ///
    /// Never fails: parse errors, missing counters and panics inside a
    /// counter all become [`CountOutcome::Failed`].
    ///
    /// A panic still goes through the process panic hook, so its message is
    /// printed to stderr whatever the log filter. The hook is global and is
    /// left to the binary.
    pub fn count(&self, content: &str, format: FileFormat, bilingual: bool) -> CountOutcome {
        let Some(counter) = self.counter_for(format) else {
            return CountOutcome::Failed(CounterError::Unsupported(format.to_string()).to_string());
        };

        match catch_unwind(AssertUnwindSafe(|| counter.count(content, bilingual))) {
            Ok(Ok(stems)) => CountOutcome::Stems(stems),
            Ok(Err(e)) => CountOutcome::Failed(e.to_string()),
            Err(_) => {
                debug!(counter = counter.name(), "counter panicked");
                CountOutcome::Failed(format!("{} counter aborted", counter.name()))
            }
        }
    }
}
