//! Per-family snapshot records.

use serde::{Deserialize, Serialize};

/// Number of commits by one contributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub user: String,
    pub value: u64,
}

/// Current state of a monolingual dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonoData {
    /// Language code.
    pub lang: String,

    /// Development state from the wiki table, or `unknown`.
    pub state: String,

    /// Stem count reported by the stats service.
    pub stems: u64,

    /// `apertium-<lang> (<topic>)`.
    pub location: String,

    /// Commit counts per contributor, in first-seen order.
    pub contributors: Vec<Contributor>,
}

/// Current state of a bilingual dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairData {
    /// The two language codes.
    pub langs: Vec<String>,

    /// Topic location, e.g. `staging`.
    pub location: String,

    /// Entry count reported by the stats service.
    pub stems: u64,
}
