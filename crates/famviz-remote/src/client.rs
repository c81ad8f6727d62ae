//! HTTP client with an explicit timeout and retry policy.

use std::time::Duration;

use famviz_config::HttpConfig;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{RemoteError, RemoteResult};

/// A GET-only HTTP client.
///
/// Transient failures (timeouts, refused connections, 5xx answers) are
/// retried `retries` times; everything else fails immediately.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    retries: u32,
    retry_delay: Duration,
}

impl HttpClient {
    /// Creates a client following the given policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(config: &HttpConfig) -> RemoteResult<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(config.timeout())
            .build()
            .map_err(RemoteError::Client)?;

        Ok(Self {
            inner,
            retries: config.retries,
            retry_delay: config.retry_delay(),
        })
    }

    /// Fetches `url`, returning the response whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error if no attempt completed.
    pub async fn get(&self, url: &str) -> RemoteResult<reqwest::Response> {
        let mut attempt = 0;
        loop {
            let result = self
                .inner
                .get(url)
                .send()
                .await
                .map_err(|source| RemoteError::Request {
                    url: url.to_string(),
                    source,
                })
                .and_then(|response| {
                    let status = response.status();
                    if status.is_server_error() {
                        Err(RemoteError::Status {
                            url: url.to_string(),
                            status: status.as_u16(),
                        })
                    } else {
                        Ok(response)
                    }
                });

            match result {
                Err(e) if e.is_transient() && attempt < self.retries => {
                    attempt += 1;
                    warn!(url, attempt, error = %e, "retrying request");
                    tokio::time::sleep(self.retry_delay).await;
                }
                other => return other,
            }
        }
    }

    /// Fetches `url` as text. Non-success statuses are errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success
    /// or the body is not text.
    pub async fn get_text(&self, url: &str) -> RemoteResult<String> {
        let response = ensure_success(url, self.get(url).await?)?;
        response.text().await.map_err(|source| RemoteError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Fetches `url` as text, or `None` for a 4xx answer.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not text.
    pub async fn get_text_opt(&self, url: &str) -> RemoteResult<Option<String>> {
        let response = self.get(url).await?;
        if response.status().is_client_error() {
            debug!(url, status = response.status().as_u16(), "no content");
            return Ok(None);
        }
        let response = ensure_success(url, response)?;
        response
            .text()
            .await
            .map(Some)
            .map_err(|source| RemoteError::Decode {
                url: url.to_string(),
                source,
            })
    }

    /// Fetches `url` and decodes it as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success
    /// or the body does not decode into `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> RemoteResult<T> {
        let response = ensure_success(url, self.get(url).await?)?;
        response.json().await.map_err(|source| RemoteError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

fn ensure_success(url: &str, response: reqwest::Response) -> RemoteResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(RemoteError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}
