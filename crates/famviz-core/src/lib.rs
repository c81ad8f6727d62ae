//! Core library for the family visualizer scraper.
//!
//! This crate provides the incremental history aggregation (walk a
//! dictionary's commits, count the stems of each unseen revision, merge into
//! the persisted history) and the orchestration of a whole family scrape.

mod error;
pub mod exceptions;
mod merger;
mod options;
mod scraper;
mod select;
mod store;
mod target;

pub use error::{CoreError, CoreResult};
pub use merger::HistoryMerger;
pub use options::ScrapeOptions;
pub use scraper::{ScrapeReport, Scraper, Sources, UnmappedCommitter};
pub use select::{PairCode, mono_packages, pair_packages, pairs_of};
pub use store::{HistoryStore, PriorHistories};
pub use target::{TrackedFile, detect_dictionary};
