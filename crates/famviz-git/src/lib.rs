//! Git layer for the family visualizer scraper.
//!
//! This crate provides:
//! - [`RepoCache`]: local clones of the project's repositories
//! - [`HistoryWalker`] / [`GitCli`]: rename-following history of one file
//! - Author and committer listings for contributor statistics

mod cache;
mod error;
mod log;

pub use cache::RepoCache;
pub use error::{GitError, GitResult};
pub use log::{GitCli, HistoryWalker, LogEntry, parse_log};
