use crate::config::types::{Config, CrawlerConfig, HttpClientConfig, RetryConfig};
use crate::{ConfigError, ConfigResult};

/// Log levels accepted by `log-level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Upper bound for `retry.status-retries`
const MAX_STATUS_RETRIES: u32 = 20;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_log_level(&config.log_level)?;
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_retry_config(&config.retry)?;
    Ok(())
}

fn validate_log_level(level: &str) -> ConfigResult<()> {
    if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        return Err(ConfigError::Validation(format!(
            "log_level must be one of {:?}, got '{}'",
            LOG_LEVELS, level
        )));
    }
    Ok(())
}

/// Validates worker pool configuration
fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.num_workers < 1 {
        return Err(ConfigError::Validation(format!(
            "num_workers must be >= 1, got {}",
            config.num_workers
        )));
    }

    if config.fetch_concurrency < 1 || config.fetch_concurrency > config.num_workers {
        return Err(ConfigError::Validation(format!(
            "fetch_concurrency must be between 1 and num_workers ({}), got {}",
            config.num_workers, config.fetch_concurrency
        )));
    }

    if config.poll_interval_ms < 1 {
        return Err(ConfigError::Validation(
            "poll_interval_ms must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpClientConfig) -> ConfigResult<()> {
    if config.timeout_secs < 1 || config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got timeout={}s connect={}s",
            config.timeout_secs, config.connect_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates rate-limit retry configuration
fn validate_retry_config(config: &RetryConfig) -> ConfigResult<()> {
    if config.status_retries > MAX_STATUS_RETRIES {
        return Err(ConfigError::Validation(format!(
            "status_retries must be <= {}, got {}",
            MAX_STATUS_RETRIES, config.status_retries
        )));
    }

    for (name, value) in [
        ("backoff_factor", config.backoff_factor),
        ("jitter_range", config.jitter_range),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "{} must be a non-negative number of seconds, got {}",
                name, value
            )));
        }
    }

    Ok(())
}
