//! HTTP client for listing-page fetches
//!
//! Wraps reqwest with a configured User-Agent, request timeout, limited
//! redirect policy, and a requests-per-second quota so crawl runs stay
//! polite toward the target site.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{Context, Result};
use governor::clock::DefaultClock;
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    pub max_requests_per_second: u32,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("pricewatch/{} (catalog monitor)", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            max_requests_per_second: 2,
        }
    }
}

pub struct HttpClient {
    client: Client,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl HttpClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("invalid user agent")?,
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("failed to create HTTP client")?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.max_requests_per_second)
                .context("rate limit must be greater than 0")?,
        );

        Ok(Self {
            client,
            rate_limiter: RateLimiter::direct(quota),
        })
    }

    /// Fetch a URL and return its body. Any transport failure or
    /// non-success status is an error; callers treat either as fatal for
    /// the current run.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(%url, "fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to fetch {url}"))?;

        if !response.status().is_success() {
            anyhow::bail!("request for {url} returned status {}", response.status());
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body from {url}"))?;

        tracing::debug!(%url, bytes = body.len(), "fetched page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_default_config() {
        assert!(HttpClient::new(&HttpClientConfig::default()).is_ok());
    }

    #[test]
    fn rejects_zero_rate_limit() {
        let config = HttpClientConfig {
            max_requests_per_second: 0,
            ..Default::default()
        };
        assert!(HttpClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn fails_on_non_success_status() {
        let server = httpmock::MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.path("/gone");
                then.status(404);
            })
            .await;

        let client = HttpClient::new(&HttpClientConfig::default()).unwrap();
        let err = client.get_text(&server.url("/gone")).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}
