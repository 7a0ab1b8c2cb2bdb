//! Configuration module for webscraper
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file and its environment overrides.
//!
//! # Example
//!
//! ```no_run
//! use webscraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("webscraper.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.num_workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpClientConfig, RetryConfig};

// Re-export parser functions
pub use parser::{
    load_config, load_config_with_env, parse_config, ENV_CONNECTION_RETRIES,
    ENV_FETCH_CONCURRENCY, ENV_LOG_LEVEL, ENV_MAX_KEEPALIVE_CONNECTIONS, ENV_NUM_WORKERS,
    ENV_POOL_TIMEOUT, ENV_TIMEOUT,
};
pub use validation::validate;
