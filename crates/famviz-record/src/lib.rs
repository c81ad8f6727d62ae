//! Record types for the family visualizer scraper.
//!
//! This crate provides the types that are persisted as JSON and read back by
//! the next run:
//! - [`CommitRecord`]: one counted revision of a dictionary
//! - [`EntityHistory`]: the stem history of a language or a pair
//! - [`PackageDescriptor`]: a repository entry from the stats service catalog
//! - [`MonoData`] / [`PairData`]: per-family snapshots

mod commit;
mod history;
mod package;
mod snapshot;

pub use commit::CommitRecord;
pub use history::EntityHistory;
pub use package::{PackageDescriptor, strip_prefix};
pub use snapshot::{Contributor, MonoData, PairData};
