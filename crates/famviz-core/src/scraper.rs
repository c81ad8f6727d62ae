//! Scrape of a whole language family.

use std::path::PathBuf;

use famviz_config::Config;
use famviz_counter::CounterSet;
use famviz_git::{GitCli, RepoCache};
use famviz_record::{Contributor, EntityHistory, MonoData, PackageDescriptor, PairData};
use famviz_remote::{
    HttpClient, PackageCatalog, RawContent, RevisionFetcher, StateSource, StatsClient, WikiClient,
    WikiTable, family_title,
};
use tracing::{debug, info, warn};

use crate::exceptions::{self, MONO_LOCATIONS, PAIR_LOCATIONS};
use crate::select::{mono_packages, pair_packages, pairs_of};
use crate::{
    CoreResult, HistoryMerger, HistoryStore, PriorHistories, ScrapeOptions, TrackedFile,
    detect_dictionary,
};

/// Location and state reported when the source has none.
const UNKNOWN: &str = "unknown";

/// A committer of a dictionary whose email is not in the shared mailmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedCommitter {
    /// Language code of the dictionary.
    pub language: String,

    /// `<email> name date short-sha`.
    pub line: String,
}

/// What a scrape wrote.
#[derive(Debug, Clone, Default)]
pub struct ScrapeReport {
    /// Entries in `<family>_pairData.json`.
    pub pairs: usize,

    /// Entries in `<family>_transducers.json`.
    pub transducers: usize,

    /// Histories written across the `<lang>.json` files.
    pub histories: usize,

    /// Committers missing from the mailmap, when auditing.
    pub unmapped: Vec<UnmappedCommitter>,
}

/// The remote collaborators of a scrape.
pub struct Sources<F, C, S> {
    /// Historical file contents.
    pub revisions: F,

    /// Package catalog and statistics.
    pub catalog: C,

    /// Language state tables.
    pub states: S,
}

impl Sources<RawContent, StatsClient, WikiClient> {
    /// Creates the HTTP sources configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let http = HttpClient::new(&config.http)?;
        Ok(Self {
            revisions: RawContent::new(http.clone(), config.remote.raw_base_url.clone()),
            catalog: StatsClient::new(http.clone(), config.remote.stats_url.clone()),
            states: WikiClient::new(http, config.remote.wiki_url.clone()),
        })
    }
}

/// Scrapes the snapshots and histories of one family.
pub struct Scraper<F = RawContent, C = StatsClient, S = WikiClient> {
    family: String,
    languages: Vec<String>,
    options: ScrapeOptions,
    cache: RepoCache,
    git: GitCli,
    merger: HistoryMerger<GitCli, F>,
    catalog: C,
    states: S,
    store: HistoryStore,
    mailmap: PathBuf,
}

impl<F: RevisionFetcher, C: PackageCatalog, S: StateSource> Scraper<F, C, S> {
    /// Creates a scraper for `family`, whose languages are `languages`.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository cache cannot be set up.
    pub fn new(
        config: &Config,
        family: &str,
        languages: Vec<String>,
        counters: CounterSet,
        options: ScrapeOptions,
        sources: Sources<F, C, S>,
    ) -> CoreResult<Self> {
        let mailmap = config.mailmap();
        let cache = RepoCache::new(config.repos_dir(), config.remote.git_base_url.clone())?
            .with_mailmap(mailmap.clone());

        Ok(Self {
            family: family.to_lowercase(),
            languages,
            options,
            cache,
            git: GitCli::new(),
            merger: HistoryMerger::new(GitCli::new(), sources.revisions, counters),
            catalog: sources.catalog,
            states: sources.states,
            store: HistoryStore::new(config.json_dir()),
            mailmap,
        })
    }

    /// Returns the family name as written in titles.
    #[must_use]
    pub fn title(&self) -> String {
        family_title(&self.family)
    }

    /// Writes the family snapshots and, unless shallow, every language's
    /// histories.
    ///
    /// # Errors
    ///
    /// Returns an error if a repository cannot be synced, a remote service
    /// fails or an output file cannot be written.
    pub async fn run(&self) -> CoreResult<ScrapeReport> {
        let mut report = ScrapeReport::default();
        let packages = self.catalog.packages().await?;
        debug!(packages = packages.len(), "fetched package catalog");

        info!("Scraping pair data for {} languages...", self.title());
        let pairs = self.pair_data(&packages).await?;
        self.store.write_pair_data(&self.family, &pairs)?;
        report.pairs = pairs.len();

        info!("Scraping monolingual data for {} languages...", self.title());
        let transducers = self.mono_data(&packages, &mut report.unmapped).await?;
        self.store.write_transducers(&self.family, &transducers)?;
        report.transducers = transducers.len();

        if self.options.shallow {
            return Ok(report);
        }

        for language in &self.languages {
            info!("Getting commits for apertium-{language}...");
            let mut prior = self.store.load(language);

            let mut histories = vec![self.mono_history(language, &mut prior).await?];
            histories.extend(self.pair_history(language, &packages, &mut prior).await?);

            self.store.write_language(language, &histories)?;
            report.histories += histories.len();
        }

        Ok(report)
    }

    /// Snapshot of the family's pairs.
    async fn pair_data(&self, packages: &[PackageDescriptor]) -> CoreResult<Vec<PairData>> {
        let mut data = Vec::new();

        for (package, pair) in pair_packages(packages, &self.languages) {
            let location = package.location(PAIR_LOCATIONS).unwrap_or(UNKNOWN);
            let stems = self
                .catalog
                .stat(&package.name, "bidix", "Entries")
                .await?
                .unwrap_or_else(|| {
                    warn!(repo = %package.name, "no entry count reported");
                    0
                });

            data.push(PairData {
                langs: vec![pair.first.to_string(), pair.second.to_string()],
                location: location.to_string(),
                stems,
            });
        }

        Ok(data)
    }

    /// Snapshot of the family's monolingual dictionaries.
    async fn mono_data(
        &self,
        packages: &[PackageDescriptor],
        unmapped: &mut Vec<UnmappedCommitter>,
    ) -> CoreResult<Vec<MonoData>> {
        let column = exceptions::state_column(&self.family);
        let mailmap = if self.options.audit_mailmap {
            self.read_mailmap()
        } else {
            String::new()
        };
        let mut table: Option<WikiTable> = None;
        let mut data = Vec::new();

        for (package, language) in mono_packages(packages, &self.languages) {
            let dir = self.cache.ensure(&package.name)?;
            let Some(format) = detect_dictionary(&dir, language) else {
                warn!(repo = %package.name, "no monolingual dictionary found, skipping");
                continue;
            };
            let file = TrackedFile::mono(language, format);

            let stems = self
                .catalog
                .stat(&package.name, format.file_type(false), "Stems")
                .await?
                .unwrap_or_else(|| {
                    warn!(repo = %package.name, "no stem count reported");
                    0
                });
            let location = package.location(MONO_LOCATIONS).unwrap_or(UNKNOWN);
            let contributors = count_contributors(self.git.authors(&dir, &file.path)?);

            if self.options.audit_mailmap {
                let committers = self.git.committers(&dir, &file.path)?;
                unmapped.extend(unmapped_committers(committers, &mailmap).into_iter().map(
                    |line| UnmappedCommitter {
                        language: language.to_string(),
                        line,
                    },
                ));
            }

            if table.is_none() {
                table = Some(self.states.fetch_table(&self.family).await?);
            }
            let state = table
                .as_ref()
                .map_or_else(|| UNKNOWN.to_string(), |t| t.state_of(language, column));

            data.push(MonoData {
                lang: language.to_string(),
                state,
                stems,
                location: format!("{} ({location})", package.name),
                contributors,
            });
        }

        Ok(data)
    }

    /// History of a language's monolingual dictionary.
    async fn mono_history(
        &self,
        language: &str,
        prior: &mut PriorHistories,
    ) -> CoreResult<EntityHistory> {
        let history = prior.take(language);
        let dir = self.cache.ensure(&format!("apertium-{language}"))?;

        match detect_dictionary(&dir, language) {
            Some(format) => {
                let target = TrackedFile::mono(language, format);
                self.merger.merge(&dir, &target, history).await
            }
            None => {
                warn!(
                    language,
                    "no monolingual dictionary found, keeping the recorded history"
                );
                Ok(history)
            }
        }
    }

    /// Histories of the family's pairs that include `language`.
    async fn pair_history(
        &self,
        language: &str,
        packages: &[PackageDescriptor],
        prior: &mut PriorHistories,
    ) -> CoreResult<Vec<EntityHistory>> {
        let mut histories = Vec::new();

        for (package, pair) in pairs_of(language, packages, &self.languages) {
            info!("Getting commits for {}...", package.name);
            let dir = self.cache.ensure(&package.name)?;

            let pair = pair.to_string();
            let target = TrackedFile::pair(&pair);
            let history = prior.take(&pair);
            histories.push(self.merger.merge(&dir, &target, history).await?);
        }

        Ok(histories)
    }

    fn read_mailmap(&self) -> String {
        std::fs::read_to_string(&self.mailmap).unwrap_or_else(|e| {
            warn!(path = %self.mailmap.display(), error = %e, "unable to read the shared mailmap");
            String::new()
        })
    }
}

/// Counts commits per author, in order of first appearance.
fn count_contributors(authors: Vec<String>) -> Vec<Contributor> {
    let mut contributors: Vec<Contributor> = Vec::new();
    for author in authors {
        match contributors.iter_mut().find(|c| c.user == author) {
            Some(contributor) => contributor.value += 1,
            None => contributors.push(Contributor {
                user: author,
                value: 1,
            }),
        }
    }
    contributors
}

/// Keeps the committer lines whose `<email>` does not occur in `mailmap`.
fn unmapped_committers(committers: Vec<String>, mailmap: &str) -> Vec<String> {
    committers
        .into_iter()
        .filter(|line| {
            line.split(' ')
                .next()
                .is_some_and(|email| !mailmap.contains(email))
        })
        .collect()
}
