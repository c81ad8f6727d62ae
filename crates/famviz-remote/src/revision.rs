//! Historical file contents.

use tracing::debug;

use crate::{HttpClient, RemoteResult};

/// Source of a file's content at a given commit.
#[allow(async_fn_in_trait)]
pub trait RevisionFetcher {
    /// Fetches `path` of `repo` as it was at `sha`.
    ///
    /// Returns `Ok(None)` when the revision is not available.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached.
    async fn fetch(&self, repo: &str, sha: &str, path: &str) -> RemoteResult<Option<String>>;
}

/// Builds the raw-content URL `<base>/<repo>/<sha>/<path>`.
#[must_use]
pub fn raw_url(base: &str, repo: &str, sha: &str, path: &str) -> String {
    format!(
        "{}/{repo}/{sha}/{}",
        base.trim_end_matches('/'),
        path.trim().trim_start_matches('/')
    )
}

/// Fetches revisions from a raw-content host.
pub struct RawContent {
    http: HttpClient,
    base_url: String,
}

impl RawContent {
    /// Creates a fetcher for the host rooted at `base_url`.
    #[must_use]
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

impl RevisionFetcher for RawContent {
    async fn fetch(&self, repo: &str, sha: &str, path: &str) -> RemoteResult<Option<String>> {
        let url = raw_url(&self.base_url, repo, sha, path);
        debug!(%url, "fetching revision");
        self.http.get_text_opt(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{Reply, serve};
    use famviz_config::HttpConfig;

    #[test]
    fn test_raw_url() {
        assert_eq!(
            raw_url(
                "https://raw.githubusercontent.com/apertium/",
                "apertium-tat",
                "abc123",
                "apertium-tat.tat.lexc\n"
            ),
            "https://raw.githubusercontent.com/apertium/apertium-tat/abc123/apertium-tat.tat.lexc"
        );
    }

    #[tokio::test]
    async fn test_fetch() {
        let base = serve(vec![(
            "/apertium-tat/abc123/apertium-tat.tat.lexc",
            Reply::ok("LEXICON Root\n"),
        )])
        .await;
        let raw = RawContent::new(HttpClient::new(&HttpConfig::default()).unwrap(), base);

        let content = raw
            .fetch("apertium-tat", "abc123", "apertium-tat.tat.lexc")
            .await
            .unwrap();
        assert_eq!(content.as_deref(), Some("LEXICON Root\n"));

        let missing = raw
            .fetch("apertium-tat", "def456", "apertium-tat.tat.lexc")
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
