//! Incremental merge of a dictionary's history.

use std::path::Path;

use famviz_counter::{CountOutcome, CounterSet};
use famviz_git::HistoryWalker;
use famviz_record::{CommitRecord, EntityHistory};
use famviz_remote::RevisionFetcher;
use tracing::debug;

use crate::{CoreResult, TrackedFile};

/// Extends a persisted history with the revisions it has not seen yet.
pub struct HistoryMerger<W, F> {
    walker: W,
    fetcher: F,
    counters: CounterSet,
}

impl<W: HistoryWalker, F: RevisionFetcher> HistoryMerger<W, F> {
    /// Creates a merger.
    #[must_use]
    pub fn new(walker: W, fetcher: F, counters: CounterSet) -> Self {
        Self {
            walker,
            fetcher,
            counters,
        }
    }

    /// Merges the current history of `target` into `history`.
    ///
    /// Commits already recorded keep their recorded count and are not
    /// fetched again. A revision that is unavailable or cannot be counted is
    /// skipped. The result is ordered oldest first; merging again without
    /// new commits returns the same history.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be listed or a revision
    /// cannot be fetched.
    pub async fn merge(
        &self,
        repo_dir: &Path,
        target: &TrackedFile,
        mut history: EntityHistory,
    ) -> CoreResult<EntityHistory> {
        let entries = self.walker.walk(repo_dir, &target.path)?;
        let mut added = 0usize;
        let mut skipped = 0usize;

        for entry in entries {
            if history.contains(&entry.sha) {
                continue;
            }

            let Some(content) = self
                .fetcher
                .fetch(&target.repo, &entry.sha, &entry.path)
                .await?
            else {
                debug!(
                    "Unable to fetch {} for {} in commit {}",
                    entry.path, target.entity, entry.sha
                );
                skipped += 1;
                continue;
            };

            match self
                .counters
                .count(&content, target.format, target.bilingual)
            {
                CountOutcome::Stems(stems) => {
                    history.push(CommitRecord::new(
                        entry.sha,
                        entry.author,
                        entry.date,
                        stems,
                    ));
                    added += 1;
                }
                CountOutcome::Failed(reason) => {
                    debug!(
                        %reason,
                        "Unable to count {} stems for {} in commit {}",
                        target.format, target.entity, entry.sha
                    );
                    skipped += 1;
                }
            }
        }

        history.sort_chronologically();
        debug!(
            entity = %target.entity,
            added,
            skipped,
            total = history.len(),
            "merged history"
        );
        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use chrono::DateTime;
    use famviz_counter::{CounterError, CounterResult, FileFormat, Plugin, StemCounter};
    use famviz_git::GitResult;
    use famviz_record::CommitRecord;
    use famviz_remote::RemoteResult;

    // Walker returning a fixed log and remembering the requested file.
    struct FakeWalker {
        log: String,
        requested: RefCell<Vec<String>>,
    }

    impl FakeWalker {
        fn new(commits: &[(&str, &str, &str, &str)]) -> Self {
            let mut log = String::new();
            for (sha, author, date, path) in commits {
                log.push_str(&format!("{sha}<>{author}<>{date}<>\n\n{path}\n"));
            }
            Self {
                log,
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl HistoryWalker for FakeWalker {
        fn raw_log(&self, _repo_dir: &Path, file: &str) -> GitResult<String> {
            self.requested.borrow_mut().push(file.to_string());
            Ok(self.log.clone())
        }
    }

    // Fetcher serving contents by sha and counting requests.
    #[derive(Default)]
    struct FakeFetcher {
        contents: HashMap<String, String>,
        requests: RefCell<Vec<(String, String, String)>>,
    }

    impl FakeFetcher {
        fn with(mut self, sha: &str, content: &str) -> Self {
            self.contents.insert(sha.to_string(), content.to_string());
            self
        }
    }

    impl RevisionFetcher for FakeFetcher {
        async fn fetch(&self, repo: &str, sha: &str, path: &str) -> RemoteResult<Option<String>> {
            self.requests
                .borrow_mut()
                .push((repo.to_string(), sha.to_string(), path.to_string()));
            Ok(self.contents.get(sha).cloned())
        }
    }

    // Counter reading the content as a number.
    struct NumberCounter;

    impl Plugin for NumberCounter {
        fn name(&self) -> &'static str {
            "number"
        }
        fn version(&self) -> &'static str {
            "1.0.0"
        }
    }

    impl StemCounter for NumberCounter {
        fn supports(&self, _format: FileFormat) -> bool {
            true
        }

        fn count(&self, content: &str, _bilingual: bool) -> CounterResult<u64> {
            content
                .trim()
                .parse()
                .map_err(|_| CounterError::malformed("number", "not a number"))
        }
    }

    fn merger(walker: FakeWalker, fetcher: FakeFetcher) -> HistoryMerger<FakeWalker, FakeFetcher> {
        HistoryMerger::new(
            walker,
            fetcher,
            CounterSet::new().with_counter(Box::new(NumberCounter)),
        )
    }

    fn lexc_target() -> TrackedFile {
        TrackedFile::mono("tat", FileFormat::Lexc)
    }

    const FILE: &str = "apertium-tat.tat.lexc";

    #[tokio::test]
    async fn test_merge_counts_new_commits_oldest_first() {
        let walker = FakeWalker::new(&[
            ("c3", "C", "2021-03-01T00:00:00+03:00", FILE),
            ("b2", "B", "2021-02-01T00:00:00Z", FILE),
            ("a1", "A", "2021-01-01T00:00:00Z", FILE),
        ]);
        let fetcher = FakeFetcher::default()
            .with("a1", "10")
            .with("b2", "20")
            .with("c3", "30");
        let merger = merger(walker, fetcher);

        let history = merger
            .merge(Path::new("."), &lexc_target(), EntityHistory::new("tat"))
            .await
            .unwrap();

        let stems: Vec<u64> = history.history.iter().map(|r| r.stems).collect();
        assert_eq!(stems, [10, 20, 30]);
        assert_eq!(history.history[2].author, "C");
        assert_eq!(merger.walker.requested.borrow().as_slice(), [FILE]);
    }

    #[tokio::test]
    async fn test_merge_is_idempotent() {
        let walker = FakeWalker::new(&[
            ("b2", "B", "2021-02-01T00:00:00Z", FILE),
            ("a1", "A", "2021-01-01T00:00:00Z", FILE),
        ]);
        let fetcher = FakeFetcher::default().with("a1", "10").with("b2", "20");
        let merger = merger(walker, fetcher);
        let target = lexc_target();

        let first = merger
            .merge(Path::new("."), &target, EntityHistory::new("tat"))
            .await
            .unwrap();
        let fetches = merger.fetcher.requests.borrow().len();

        let second = merger
            .merge(Path::new("."), &target, first.clone())
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(merger.fetcher.requests.borrow().len(), fetches);
    }

    #[tokio::test]
    async fn test_merge_skips_failed_counts() {
        let walker = FakeWalker::new(&[
            ("c3", "C", "2021-03-01T00:00:00Z", FILE),
            ("b2", "B", "2021-02-01T00:00:00Z", FILE),
            ("a1", "A", "2021-01-01T00:00:00Z", FILE),
        ]);
        let fetcher = FakeFetcher::default()
            .with("a1", "10")
            .with("b2", "LEXICON Root ; broken")
            .with("c3", "30");

        let history = merger(walker, fetcher)
            .merge(Path::new("."), &lexc_target(), EntityHistory::new("tat"))
            .await
            .unwrap();

        let shas: Vec<&str> = history.history.iter().map(|r| r.sha.as_str()).collect();
        assert_eq!(shas, ["a1", "c3"]);
    }

    #[tokio::test]
    async fn test_merge_skips_unavailable_revisions() {
        let walker = FakeWalker::new(&[
            ("b2", "B", "2021-02-01T00:00:00Z", FILE),
            ("a1", "A", "2021-01-01T00:00:00Z", FILE),
        ]);
        let fetcher = FakeFetcher::default().with("a1", "10");

        let history = merger(walker, fetcher)
            .merge(Path::new("."), &lexc_target(), EntityHistory::new("tat"))
            .await
            .unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history.history[0].sha, "a1");
    }

    #[tokio::test]
    async fn test_merge_never_records_sentinel() {
        let mut walker = FakeWalker::new(&[
            ("b2", "B", "2021-02-01T00:00:00Z", FILE),
            ("a1", "A", "2021-01-01T00:00:00Z", FILE),
        ]);
        walker.log.push('\n');
        let fetcher = FakeFetcher::default().with("a1", "1").with("b2", "2");
        let merger = merger(walker, fetcher);

        let history = merger
            .merge(Path::new("."), &lexc_target(), EntityHistory::new("tat"))
            .await
            .unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(merger.fetcher.requests.borrow().len(), 2);
        assert!(history.history.iter().all(|r| !r.sha.is_empty()));
    }

    #[tokio::test]
    async fn test_merge_empty_history() {
        let walker = FakeWalker::new(&[]);
        let history = merger(walker, FakeFetcher::default())
            .merge(Path::new("."), &lexc_target(), EntityHistory::new("tat"))
            .await
            .unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_merge_pair_through_dictionary_alias() {
        let dix = "apertium-tt-ky.tt-ky.dix";
        let walker = FakeWalker::new(&[
            ("b2", "New", "2021-02-01T00:00:00Z", dix),
            ("a1", "Old", "2020-01-01T00:00:00Z", dix),
        ]);
        let fetcher = FakeFetcher::default().with("b2", "1500");
        let merger = merger(walker, fetcher);

        let prior = CommitRecord::new(
            "a1",
            "Old",
            DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z").unwrap(),
            1000,
        );
        let history = EntityHistory::with_records("tat-kir", vec![prior.clone()]);

        let merged = merger
            .merge(Path::new("."), &TrackedFile::pair("tat-kir"), history)
            .await
            .unwrap();

        assert_eq!(merged.name, "tat-kir");
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.history[0], prior);
        assert_eq!(merged.history[1].sha, "b2");
        assert_eq!(merged.history[1].stems, 1500);

        assert_eq!(merger.walker.requested.borrow().as_slice(), [dix]);
        assert_eq!(
            merger.fetcher.requests.borrow().as_slice(),
            [(
                "apertium-tat-kir".to_string(),
                "b2".to_string(),
                dix.to_string()
            )]
        );
    }
}
