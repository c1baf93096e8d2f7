//! `OmdbClient` - OMDb API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::LocalOmdbApi;
use super::params::{Plot, SearchParams};
use super::rate_limiter::OmdbRateLimiter;
use super::types::{OmdbErrorResponse, SearchPage, TitleDetail};

/// Default base URL for the OMDb API.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff duration between retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// OMDb API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key, sent as the `apikey` query parameter.
    api_key: String,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<OmdbRateLimiter>>,
}

/// Builder for `OmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct OmdbClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl OmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 100ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<OmdbClient> {
        let api_key = self.api_key.context("api_key is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(OmdbRateLimiter::default_interval, OmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(OmdbClient {
            http_client,
            base_url,
            api_key,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl OmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> OmdbClientBuilder {
        OmdbClientBuilder::new()
    }

    /// Sends a GET request with the api key, query params, and rate limiting.
    /// Retries up to `MAX_RETRIES` times on HTTP 429.
    #[instrument(skip_all)]
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        query: &[(&str, String)],
    ) -> Result<T> {
        self.rate_limiter.lock().await.wait().await;

        let mut retries = 0u32;
        loop {
            let request = self
                .http_client
                .get(self.base_url.clone())
                .query(&[("apikey", self.api_key.as_str())])
                .query(query)
                .build()
                .context("failed to build request")?;

            tracing::debug!(url = %request.url(), "OMDb API request");

            let result = self.http_client.execute(request).await;
            let response = result.context("request failed")?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                retries = retries.saturating_add(1);
                if retries > MAX_RETRIES {
                    bail!("OMDb API rate limit exceeded after {MAX_RETRIES} retries");
                }
                tracing::warn!(
                    retry = retries,
                    max_retries = MAX_RETRIES,
                    "OMDb API rate limited (429). Retrying..."
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(retries)).await;
                self.rate_limiter.lock().await.wait().await;
                continue;
            }

            if !status.is_success() {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| String::from("<failed to read body>"));
                if let Ok(error_response) = serde_json::from_str::<OmdbErrorResponse>(&body) {
                    bail!("OMDb API error (HTTP {status}): {}", error_response.error);
                }
                bail!("OMDb API error (HTTP {status}): {body}");
            }

            let body = response
                .text()
                .await
                .context("failed to read response body")?;
            let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
            return match raw_result {
                Ok(parsed) => Ok(parsed),
                Err(parse_err) => {
                    // OMDb rejects some requests (bad id, bad key) with HTTP
                    // 200 and an error payload that fails typed parsing.
                    if let Ok(error_response) = serde_json::from_str::<OmdbErrorResponse>(&body) {
                        bail!("OMDb API error: {}", error_response.error);
                    }
                    Err(parse_err).context("failed to decode JSON response")
                }
            };
        }
    }
}

impl LocalOmdbApi for OmdbClient {
    #[instrument(skip_all)]
    async fn search(&self, params: &SearchParams) -> Result<SearchPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("s", params.query.clone()),
            ("page", params.page.to_string()),
        ];
        if let Some(year) = params.year {
            query.push(("y", year.to_string()));
        }
        if let Some(kind) = params.kind {
            query.push(("type", String::from(kind.as_query_value())));
        }

        self.get_json(&query).await
    }

    #[instrument(skip_all)]
    async fn title_detail(&self, imdb_id: &str, plot: Plot) -> Result<TitleDetail> {
        let query = [
            ("i", String::from(imdb_id)),
            ("plot", String::from(plot.as_query_value())),
        ];
        self.get_json(&query).await
    }
}
