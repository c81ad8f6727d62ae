//! Persisted JSON datasets.

use std::fs;
use std::path::{Path, PathBuf};

use famviz_record::{EntityHistory, MonoData, PairData};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{CoreError, CoreResult};

/// The JSON directory read by the visualizer.
///
/// Files are always replaced whole:
/// - `<lang>.json`: the language's history followed by its pairs' histories
/// - `<family>_pairData.json`: the family's pairs
/// - `<family>_transducers.json`: the family's monolingual dictionaries
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    /// Creates a store over `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads the histories recorded for `language` by a previous run.
    ///
    /// A missing or unreadable file is the same as no prior run.
    #[must_use]
    pub fn load(&self, language: &str) -> PriorHistories {
        let path = self.language_path(language);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no prior histories");
                return PriorHistories::default();
            }
        };

        match serde_json::from_str::<Vec<EntityHistory>>(&content) {
            Ok(histories) => {
                PriorHistories(histories.into_iter().map(EntityHistory::normalized).collect())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed history file");
                PriorHistories::default()
            }
        }
    }

    /// Replaces `<lang>.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_language(&self, language: &str, histories: &[EntityHistory]) -> CoreResult<()> {
        self.write(&self.language_path(language), histories)
    }

    /// Replaces `<family>_pairData.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_pair_data(&self, family: &str, data: &[PairData]) -> CoreResult<()> {
        self.write(&self.dir.join(format!("{family}_pairData.json")), data)
    }

    /// Replaces `<family>_transducers.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_transducers(&self, family: &str, data: &[MonoData]) -> CoreResult<()> {
        self.write(&self.dir.join(format!("{family}_transducers.json")), data)
    }

    fn language_path(&self, language: &str) -> PathBuf {
        self.dir.join(format!("{language}.json"))
    }

    fn write<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> CoreResult<()> {
        let json = serde_json::to_string(value).map_err(|source| CoreError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;

        debug!(path = %path.display(), "wrote dataset");
        Ok(())
    }
}

/// The histories of one `<lang>.json` file from a previous run.
#[derive(Debug, Clone, Default)]
pub struct PriorHistories(Vec<EntityHistory>);

impl PriorHistories {
    /// Removes and returns the history of `name`, or an empty one.
    pub fn take(&mut self, name: &str) -> EntityHistory {
        match self.0.iter().position(|h| h.name == name) {
            Some(index) => self.0.remove(index),
            None => EntityHistory::new(name),
        }
    }
}
