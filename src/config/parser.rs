use crate::config::types::Config;
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

/// Environment variable overriding `log-level`
pub const ENV_LOG_LEVEL: &str = "WEBSCRAPER_LOG_LEVEL";

/// Environment variable overriding `crawler.num-workers`
pub const ENV_NUM_WORKERS: &str = "WEBSCRAPER_NUM_WORKERS";

/// Environment variable overriding `crawler.fetch-concurrency`
pub const ENV_FETCH_CONCURRENCY: &str = "WEBSCRAPER_FETCH_CONCURRENCY";

/// Environment variable overriding `http.connection-retries`
pub const ENV_CONNECTION_RETRIES: &str = "WEBSCRAPER_CONNECTION_RETRIES";

/// Environment variable overriding `http.timeout-secs`
pub const ENV_TIMEOUT: &str = "WEBSCRAPER_TIMEOUT";

/// Environment variable overriding `http.pool-idle-timeout-secs`
pub const ENV_POOL_TIMEOUT: &str = "WEBSCRAPER_POOL_TIMEOUT";

/// Environment variable overriding `http.max-idle-per-host`
pub const ENV_MAX_KEEPALIVE_CONNECTIONS: &str = "WEBSCRAPER_MAX_KEEPALIVE_CONNECTIONS";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use webscraper::config::load_config;
///
/// let config = load_config(Path::new("webscraper.toml")).unwrap();
/// println!("Workers: {}", config.crawler.num_workers);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Parses configuration from a TOML string without validating it
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    Ok(toml::from_str(content)?)
}

/// Builds the runtime configuration
///
/// Starts from the file at `path` (or the defaults when `None`), applies
/// `WEBSCRAPER_*` environment overrides, then validates the result.
pub fn load_config_with_env(path: Option<&Path>) -> ConfigResult<Config> {
    let config = match path {
        Some(path) => parse_config(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    let config = apply_env_overrides(config, |key| std::env::var(key).ok())?;
    validate(&config)?;
    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables
fn apply_env_overrides<F>(mut config: Config, lookup: F) -> ConfigResult<Config>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.log_level = level;
    }

    if let Some(value) = lookup(ENV_NUM_WORKERS) {
        config.crawler.num_workers = parse_env_number(ENV_NUM_WORKERS, &value)?;
    }

    if let Some(value) = lookup(ENV_FETCH_CONCURRENCY) {
        config.crawler.fetch_concurrency = parse_env_number(ENV_FETCH_CONCURRENCY, &value)?;
    }

    if let Some(value) = lookup(ENV_CONNECTION_RETRIES) {
        config.http.connection_retries = parse_env_number(ENV_CONNECTION_RETRIES, &value)?;
    }

    if let Some(value) = lookup(ENV_TIMEOUT) {
        config.http.timeout_secs = parse_env_number(ENV_TIMEOUT, &value)?;
    }

    if let Some(value) = lookup(ENV_POOL_TIMEOUT) {
        config.http.pool_idle_timeout_secs = parse_env_number(ENV_POOL_TIMEOUT, &value)?;
    }

    if let Some(value) = lookup(ENV_MAX_KEEPALIVE_CONNECTIONS) {
        config.http.max_idle_per_host =
            parse_env_number(ENV_MAX_KEEPALIVE_CONNECTIONS, &value)?;
    }

    Ok(config)
}

fn parse_env_number<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::Validation(format!(
            "{} must be a non-negative integer, got '{}'",
            key, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
log-level = "debug"

[crawler]
num-workers = 4
fetch-concurrency = 2
poll-interval-ms = 50

[http]
timeout-secs = 5
connection-retries = 1

[retry]
status-retries = 2
backoff-factor = 0.1
jitter-range = 0.0
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.crawler.num_workers, 4);
        assert_eq!(config.crawler.fetch_concurrency, 2);
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.connection_retries, 1);
        assert_eq!(config.http.max_idle_per_host, 50);
        assert_eq!(config.retry.status_retries, 2);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.crawler.num_workers, 10);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/webscraper.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[crawler]\nnum-workers = 0\n");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_LOG_LEVEL, "warn"),
            (ENV_NUM_WORKERS, "3"),
            (ENV_FETCH_CONCURRENCY, "2"),
        ]);

        let config = apply_env_overrides(Config::default(), |key| {
            env.get(key).map(|value| value.to_string())
        })
        .unwrap();

        assert_eq!(config.log_level, "warn");
        assert_eq!(config.crawler.num_workers, 3);
        assert_eq!(config.crawler.fetch_concurrency, 2);
    }

    #[test]
    fn test_http_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_CONNECTION_RETRIES, "0"),
            (ENV_TIMEOUT, "30"),
            (ENV_POOL_TIMEOUT, "90"),
            (ENV_MAX_KEEPALIVE_CONNECTIONS, "8"),
        ]);

        let config = apply_env_overrides(Config::default(), |key| {
            env.get(key).map(|value| value.to_string())
        })
        .unwrap();

        assert_eq!(config.http.connection_retries, 0);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.pool_idle_timeout_secs, 90);
        assert_eq!(config.http.max_idle_per_host, 8);
        assert_eq!(config.http.connect_timeout_secs, 15);
        assert_eq!(config.crawler, Config::default().crawler);
    }

    #[test]
    fn test_http_env_override_rejects_negative() {
        let result = apply_env_overrides(Config::default(), |key| {
            (key == ENV_TIMEOUT).then(|| "-5".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_env_override_not_a_number() {
        let result = apply_env_overrides(Config::default(), |key| {
            (key == ENV_NUM_WORKERS).then(|| "many".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
