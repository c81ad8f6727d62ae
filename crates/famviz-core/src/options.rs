//! Scrape options.

/// What a scrape does.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrapeOptions {
    /// Only write the family snapshots, skip the histories.
    pub shallow: bool,

    /// Report committers whose email is missing from the shared mailmap.
    pub audit_mailmap: bool,
}
