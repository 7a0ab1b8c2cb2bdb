use serde::Deserialize;

/// Main configuration structure for webscraper
///
/// Every section and key is optional; missing values take the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default log filter when no verbosity flag is given
    #[serde(rename = "log-level")]
    pub log_level: String,

    pub crawler: CrawlerConfig,
    pub http: HttpClientConfig,
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            crawler: CrawlerConfig::default(),
            http: HttpClientConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Worker pool configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of concurrent workers pulling from the frontier
    #[serde(rename = "num-workers")]
    pub num_workers: usize,

    /// Maximum number of fetches in flight at once
    #[serde(rename = "fetch-concurrency")]
    pub fetch_concurrency: usize,

    /// How long an idle worker sleeps before polling the frontier again (milliseconds)
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            num_workers: 10,
            fetch_concurrency: 5,
            poll_interval_ms: 1000,
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// How long an idle pooled connection is kept (seconds)
    #[serde(rename = "pool-idle-timeout-secs")]
    pub pool_idle_timeout_secs: u64,

    /// Maximum idle connections kept per host
    #[serde(rename = "max-idle-per-host")]
    pub max_idle_per_host: usize,

    /// Extra attempts after a connection error; status codes are never retried here
    #[serde(rename = "connection-retries")]
    pub connection_retries: u32,

    /// Whether redirects are followed (up to 10 hops)
    #[serde(rename = "follow-redirects")]
    pub follow_redirects: bool,

    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 15,
            pool_idle_timeout_secs: 60,
            max_idle_per_host: 50,
            connection_retries: 3,
            follow_redirects: true,
            user_agent: format!("webscraper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Rate-limit retry configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Extra attempts after the first when the response is rate limited
    #[serde(rename = "status-retries")]
    pub status_retries: u32,

    /// Base backoff (seconds), doubled on each attempt
    #[serde(rename = "backoff-factor")]
    pub backoff_factor: f64,

    /// Upper bound of the uniform jitter added to each backoff (seconds)
    #[serde(rename = "jitter-range")]
    pub jitter_range: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            status_retries: 3,
            backoff_factor: 0.5,
            jitter_range: 0.5,
        }
    }
}
