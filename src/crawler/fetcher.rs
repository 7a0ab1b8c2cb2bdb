//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, in two layers:
//! - `HttpClient`: one shared `reqwest::Client` plus low-level retries on
//!   connection errors
//! - `RetryTransport`: retries rate-limited responses with exponential
//!   backoff and jitter, and exposes the result through the `Fetch` trait
//!
//! Status codes other than the retryable set are final, and transport errors
//! are never retried by `RetryTransport`.

use crate::config::{HttpClientConfig, RetryConfig};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Request header carrying the zero-based attempt number
pub const ATTEMPT_HEADER: &str = "x-attempt-number";

/// Doubling stops here; later attempts reuse the same exponential term
const MAX_BACKOFF_EXPONENT: u32 = 30;

/// Errors from the fetch layer
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, timeout, DNS failure and the like
    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Failed to read response body from {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

/// A fully-read HTTP response
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Final URL after redirects
    pub url: Url,

    pub status: StatusCode,

    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    async fn read(requested: &Url, response: Response) -> Result<Self, FetchError> {
        let url = response.url().clone();
        let status = response.status();
        let body = response.text().await.map_err(|source| FetchError::Body {
            url: requested.to_string(),
            source,
        })?;

        Ok(Self { url, status, body })
    }
}

/// The fetch capability consumed by crawl workers
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Performs a GET, returning the final response or a transport error
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &HttpClientConfig) -> Result<Client, reqwest::Error> {
    let redirect = if config.follow_redirects {
        Policy::limited(10)
    } else {
        Policy::none()
    };

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
        .pool_max_idle_per_host(config.max_idle_per_host)
        .redirect(redirect)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Raw GET capability shared by every worker
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    connection_retries: u32,
}

impl HttpClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::from_client(
            build_http_client(config)?,
            config.connection_retries,
        ))
    }

    pub fn from_client(client: Client, connection_retries: u32) -> Self {
        Self {
            client,
            connection_retries,
        }
    }

    /// Sends a GET annotated with `attempt`
    ///
    /// Connection errors are retried immediately up to `connection_retries`
    /// times; every other error is returned as is.
    pub async fn get(&self, url: &Url, attempt: u32) -> Result<Response, FetchError> {
        let mut connection_attempt = 0;

        loop {
            let result = self
                .client
                .get(url.clone())
                .header(ATTEMPT_HEADER, attempt.to_string())
                .send()
                .await;

            match result {
                Ok(response) => return Ok(response),
                Err(e) if e.is_connect() && connection_attempt < self.connection_retries => {
                    connection_attempt += 1;
                    tracing::debug!(
                        url = %url,
                        connection_attempt,
                        "Connection failed, retrying: {}",
                        e
                    );
                }
                Err(source) => {
                    return Err(FetchError::Transport {
                        url: url.to_string(),
                        source,
                    })
                }
            }
        }
    }
}

/// Backoff settings for rate-limited responses
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Extra attempts after the first
    pub status_retries: u32,

    /// Base delay in seconds, doubled per attempt
    pub backoff_factor: f64,

    /// Upper bound of the uniform jitter in seconds
    pub jitter_range: f64,

    /// Response codes that trigger a retry
    pub retryable_statuses: Vec<StatusCode>,
}

impl RetryPolicy {
    /// Delay before the retry that follows `attempt`
    ///
    /// `backoff_factor * 2^attempt + uniform(0, jitter_range)` seconds, with
    /// the exponent capped at `MAX_BACKOFF_EXPONENT`. Delays too large for a
    /// `Duration` saturate; negative or NaN delays are zero.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(MAX_BACKOFF_EXPONENT) as i32;
        let exponential = self.backoff_factor * 2f64.powi(exponent);
        let jitter = if self.jitter_range > 0.0 {
            rand::rng().random_range(0.0..=self.jitter_range)
        } else {
            0.0
        };

        let seconds = exponential + jitter;
        if seconds.is_nan() || seconds <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
    }

    pub fn is_retryable(&self, status: StatusCode) -> bool {
        self.retryable_statuses.contains(&status)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            status_retries: config.status_retries,
            backoff_factor: config.backoff_factor,
            jitter_range: config.jitter_range,
            retryable_statuses: vec![StatusCode::TOO_MANY_REQUESTS],
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

/// Retries rate-limited responses on top of `HttpClient`
#[derive(Debug, Clone)]
pub struct RetryTransport {
    client: HttpClient,
    policy: RetryPolicy,
}

impl RetryTransport {
    pub fn new(client: HttpClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Builds the transport from the HTTP and retry configuration
    pub fn from_config(
        http: &HttpClientConfig,
        retry: &RetryConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self::new(HttpClient::new(http)?, RetryPolicy::from(retry)))
    }

    /// Fetches a URL, retrying rate-limited responses
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | Retryable status, attempts left | Drain body, back off, retry |
    /// | Retryable status, retries exhausted | Return the last response |
    /// | Any other status | Return immediately |
    /// | Transport error | Return the error, no retry |
    pub async fn get(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let mut attempt = 0;

        loop {
            let response = self.client.get(url, attempt).await?;
            let status = response.status();

            if !self.policy.is_retryable(status) {
                return FetchResponse::read(url, response).await;
            }

            if attempt >= self.policy.status_retries {
                tracing::warn!(
                    url = %url,
                    attempts = attempt + 1,
                    "Still rate limited ({}) after all retries",
                    status
                );
                return FetchResponse::read(url, response).await;
            }

            // Release the connection back to the pool before sleeping
            if let Err(e) = response.bytes().await {
                tracing::debug!(
                    url = %url,
                    attempt,
                    "Failed to drain rate-limited response: {}",
                    e
                );
            }

            let delay = self.policy.backoff(attempt);
            tracing::warn!(
                url = %url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Rate limited ({}), backing off",
                status
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

#[async_trait]
impl Fetch for RetryTransport {
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        self.get(url).await
    }
}
