//! A counted revision of a dictionary file.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// One revision of a tracked dictionary together with its stem count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// The commit hash (SHA).
    pub sha: String,

    /// The mailmap-normalized author name.
    pub author: String,

    /// The author date, kept with its original offset.
    #[serde(with = "iso_date")]
    pub date: DateTime<FixedOffset>,

    /// Stems (monolingual) or entries (bilingual) at this revision.
    pub stems: u64,
}

impl CommitRecord {
    /// Creates a new commit record.
    #[must_use]
    pub fn new(
        sha: impl Into<String>,
        author: impl Into<String>,
        date: DateTime<FixedOffset>,
        stems: u64,
    ) -> Self {
        Self {
            sha: sha.into(),
            author: author.into(),
            date,
            stems,
        }
    }
}

/// RFC 3339 dates, written with `Z` for a zero offset.
mod iso_date {
    use chrono::{DateTime, FixedOffset, SecondsFormat};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&s)
            .map_err(|e| serde::de::Error::custom(format!("invalid date {s:?}: {e}")))
    }
}
