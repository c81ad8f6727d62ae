//! HTTP collaborators of the family visualizer scraper.
//!
//! - [`StatsClient`] reads the package catalog and per-file statistics
//! - [`WikiClient`] reads the language state table of a family page
//! - [`RawContent`] fetches a file as it was at a given commit

mod client;
mod error;
mod revision;
mod stats;
mod wiki;

#[cfg(test)]
mod test_server;

pub use client::HttpClient;
pub use error::{RemoteError, RemoteResult};
pub use revision::{RawContent, RevisionFetcher, raw_url};
pub use stats::{PackageCatalog, Stat, StatsClient};
pub use wiki::{StateSource, WikiClient, WikiTable, family_title};
