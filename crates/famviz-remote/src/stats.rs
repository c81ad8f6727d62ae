//! Stats service client.

use famviz_record::PackageDescriptor;
use serde::Deserialize;
use tracing::debug;

use crate::{HttpClient, RemoteError, RemoteResult};

#[derive(Debug, Deserialize)]
struct PackagesResponse {
    packages: Option<Vec<PackageDescriptor>>,
}

#[derive(Debug, Deserialize)]
struct StatsResponse {
    stats: Option<Vec<Stat>>,
}

/// One statistic of a repository file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Stat {
    /// Kind, such as `Stems` or `Entries`.
    pub stat_kind: String,

    /// Value, a number or a numeric string.
    pub value: serde_json::Value,
}

impl Stat {
    /// Returns the value as a count, if it is one.
    #[must_use]
    pub fn count(&self) -> Option<u64> {
        match &self.value {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// Source of the package catalog and per-file statistics.
#[allow(async_fn_in_trait)]
pub trait PackageCatalog {
    /// Lists every known repository.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    async fn packages(&self) -> RemoteResult<Vec<PackageDescriptor>>;

    /// Returns the first statistic of `kind` for a repository's file type.
    ///
    /// # Errors
    ///
    /// Returns an error if the statistics cannot be read.
    async fn stat(&self, repo: &str, file_type: &str, kind: &str) -> RemoteResult<Option<u64>>;
}

/// Client of the stats service.
///
/// A response without its expected field means the service is rebuilding
/// its data; that is reported as [`RemoteError::ServiceUpdating`] and never
/// retried.
pub struct StatsClient {
    http: HttpClient,
    base_url: String,
}

impl StatsClient {
    /// Creates a client for the service rooted at `base_url`.
    #[must_use]
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Lists the statistics of a repository's file type.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service is updating.
    pub async fn stats(&self, repo: &str, file_type: &str) -> RemoteResult<Vec<Stat>> {
        let url = format!("{}/{repo}/{file_type}/", self.base_url);
        debug!(%url, "fetching stats");

        let response: StatsResponse = self.http.get_json(&url).await?;
        response.stats.ok_or(RemoteError::ServiceUpdating {
            url,
            field: "stats",
        })
    }
}

impl PackageCatalog for StatsClient {
    async fn packages(&self) -> RemoteResult<Vec<PackageDescriptor>> {
        let url = format!("{}/packages", self.base_url);
        debug!(%url, "fetching package catalog");

        let response: PackagesResponse = self.http.get_json(&url).await?;
        response.packages.ok_or(RemoteError::ServiceUpdating {
            url,
            field: "packages",
        })
    }

    async fn stat(&self, repo: &str, file_type: &str, kind: &str) -> RemoteResult<Option<u64>> {
        let stats = self.stats(repo, file_type).await?;
        Ok(stats
            .iter()
            .find(|stat| stat.stat_kind == kind)
            .and_then(Stat::count))
    }
}
