//! Stem history of a single dictionary.

use serde::{Deserialize, Serialize};

use crate::CommitRecord;

/// The counted revisions of a monolingual or bilingual dictionary.
///
/// `name` is a language code (`"tat"`) or a pair code (`"tat-kir"`).
/// No two records share a sha; [`EntityHistory::push`] enforces this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityHistory {
    /// Language or pair code.
    pub name: String,

    /// Counted revisions.
    #[serde(default)]
    pub history: Vec<CommitRecord>,
}

impl EntityHistory {
    /// Creates an empty history.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            history: Vec::new(),
        }
    }

    /// Creates a history from existing records, dropping repeated shas.
    #[must_use]
    pub fn with_records(name: impl Into<String>, records: Vec<CommitRecord>) -> Self {
        let mut history = Self::new(name);
        for record in records {
            history.push(record);
        }
        history
    }

    /// Returns true if a record for this sha exists.
    #[must_use]
    pub fn contains(&self, sha: &str) -> bool {
        self.history.iter().any(|r| r.sha == sha)
    }

    /// Appends a record unless its sha is already present.
    ///
    /// Returns whether the record was appended.
    pub fn push(&mut self, record: CommitRecord) -> bool {
        if self.contains(&record.sha) {
            return false;
        }
        self.history.push(record);
        true
    }

    /// Orders the records oldest first. Records with equal dates keep
    /// their relative order.
    pub fn sort_chronologically(&mut self) {
        self.history.sort_by_key(|r| r.date);
    }

    /// Re-applies the unique-sha invariant to a deserialized history.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self::with_records(self.name, self.history)
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Returns true if there are no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn record(sha: &str, date: &str, stems: u64) -> CommitRecord {
        CommitRecord::new(sha, "Author", DateTime::parse_from_rfc3339(date).unwrap(), stems)
    }

    #[test]
    fn test_push_rejects_duplicate_sha() {
        let mut history = EntityHistory::new("tat");
        assert!(history.push(record("a", "2020-01-01T00:00:00Z", 1)));
        assert!(!history.push(record("a", "2021-01-01T00:00:00Z", 2)));
        assert_eq!(history.len(), 1);
        assert_eq!(history.history[0].stems, 1);
    }

    #[test]
    fn test_with_records_keeps_first_duplicate() {
        let history = EntityHistory::with_records(
            "tat",
            vec![
                record("a", "2020-01-01T00:00:00Z", 1),
                record("b", "2020-02-01T00:00:00Z", 2),
                record("a", "2020-03-01T00:00:00Z", 3),
            ],
        );
        assert_eq!(history.len(), 2);
        assert_eq!(history.history[0].stems, 1);
    }

    #[test]
    fn test_sort_chronologically_is_stable() {
        let mut history = EntityHistory::with_records(
            "tat",
            vec![
                record("c", "2020-03-01T00:00:00Z", 3),
                record("a", "2020-01-01T00:00:00Z", 1),
                record("b1", "2020-02-01T00:00:00Z", 2),
                record("b2", "2020-02-01T00:00:00Z", 2),
            ],
        );
        history.sort_chronologically();
        let shas: Vec<_> = history.history.iter().map(|r| r.sha.as_str()).collect();
        assert_eq!(shas, ["a", "b1", "b2", "c"]);
    }

    #[test]
    fn test_sort_compares_instants_across_offsets() {
        let mut history = EntityHistory::with_records(
            "tat",
            vec![
                record("later", "2020-01-01T10:00:00+00:00", 1),
                record("earlier", "2020-01-01T12:00:00+03:00", 1),
            ],
        );
        history.sort_chronologically();
        assert_eq!(history.history[0].sha, "earlier");
    }

    #[test]
    fn test_deserialize_without_history_field() {
        let history: EntityHistory = serde_json::from_str(r#"{"name":"kir"}"#).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_normalized_drops_duplicates() {
        let json = r#"{"name":"tat","history":[
            {"sha":"a","author":"X","date":"2020-01-01T00:00:00Z","stems":1},
            {"sha":"a","author":"X","date":"2020-01-01T00:00:00Z","stems":1}
        ]}"#;
        let history: EntityHistory = serde_json::from_str(json).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.normalized().len(), 1);
    }
}
