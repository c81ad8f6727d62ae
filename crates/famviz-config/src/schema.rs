//! Configuration schema.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Local paths.
    #[serde(default)]
    pub paths: PathsConfig,

    /// Remote endpoints.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// HTTP client policy.
    #[serde(default)]
    pub http: HttpConfig,

    /// Directory that relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    /// Resolves a configured path against [`Config::base_dir`].
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Directory holding the repository clones.
    #[must_use]
    pub fn repos_dir(&self) -> PathBuf {
        self.resolve(&self.paths.repos_dir)
    }

    /// Directory receiving the JSON datasets.
    #[must_use]
    pub fn json_dir(&self) -> PathBuf {
        self.resolve(&self.paths.json_dir)
    }

    /// Shared mailmap file.
    #[must_use]
    pub fn mailmap(&self) -> PathBuf {
        self.resolve(&self.paths.mailmap)
    }

    /// Families file.
    #[must_use]
    pub fn families(&self) -> PathBuf {
        self.resolve(&self.paths.families)
    }
}

/// Local paths, relative to the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_repos_dir")]
    pub repos_dir: PathBuf,

    #[serde(default = "default_json_dir")]
    pub json_dir: PathBuf,

    #[serde(default = "default_mailmap")]
    pub mailmap: PathBuf,

    #[serde(default = "default_families")]
    pub families: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            repos_dir: default_repos_dir(),
            json_dir: default_json_dir(),
            mailmap: default_mailmap(),
            families: default_families(),
        }
    }
}

fn default_repos_dir() -> PathBuf {
    PathBuf::from("git-repos")
}

fn default_json_dir() -> PathBuf {
    PathBuf::from("../json")
}

fn default_mailmap() -> PathBuf {
    PathBuf::from(".mailmap")
}

fn default_families() -> PathBuf {
    PathBuf::from("families.json")
}

/// Remote endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Clone URLs are `<git_base_url>/<repo>`.
    #[serde(default = "default_git_base_url")]
    pub git_base_url: String,

    /// Revision URLs are `<raw_base_url>/<repo>/<sha>/<path>`.
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,

    /// Stats service root.
    #[serde(default = "default_stats_url")]
    pub stats_url: String,

    /// Wiki root; family pages are `<wiki_url>/<family>_languages`.
    #[serde(default = "default_wiki_url")]
    pub wiki_url: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            git_base_url: default_git_base_url(),
            raw_base_url: default_raw_base_url(),
            stats_url: default_stats_url(),
            wiki_url: default_wiki_url(),
        }
    }
}

fn default_git_base_url() -> String {
    "https://github.com/apertium".to_string()
}

fn default_raw_base_url() -> String {
    "https://raw.githubusercontent.com/apertium".to_string()
}

fn default_stats_url() -> String {
    "https://apertium.projectjj.com/stats-service".to_string()
}

fn default_wiki_url() -> String {
    "http://wiki.apertium.org/wiki".to_string()
}

/// HTTP client policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a transport failure. Zero keeps the historical
    /// fail-fast behaviour.
    #[serde(default)]
    pub retries: u32,

    /// Pause between attempts.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl HttpConfig {
    /// Returns the request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the pause between attempts.
    #[must_use]
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            retries: 0,
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_retry_delay_ms() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.paths.repos_dir, PathBuf::from("git-repos"));
        assert_eq!(config.remote.git_base_url, "https://github.com/apertium");
        assert_eq!(config.http.retries, 0);
        assert_eq!(config.http.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let config = Config {
            base_dir: PathBuf::from("/srv/scrapers"),
            ..Config::default()
        };
        assert_eq!(config.repos_dir(), PathBuf::from("/srv/scrapers/git-repos"));
        assert_eq!(config.json_dir(), PathBuf::from("/srv/scrapers/../json"));
        assert_eq!(
            config.resolve(Path::new("/abs/families.json")),
            PathBuf::from("/abs/families.json")
        );
    }
}
