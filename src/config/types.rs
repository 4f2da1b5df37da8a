use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::job::JobSpec;

/// Main configuration structure for Burrow
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Default crawl parameters for jobs started from this configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum number of pages a job may visit
    #[serde(rename = "max-links")]
    pub max_links: usize,

    /// Number of concurrent fetch workers per job
    #[serde(rename = "pool-size")]
    pub pool_size: usize,

    /// Delay before each request (milliseconds)
    #[serde(rename = "request-delay-ms", default)]
    pub request_delay_ms: u64,

    /// Extra HTTP headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl Config {
    /// Combines the configured defaults with a start URL into a job spec.
    pub fn job_spec(&self, start_url: &str) -> JobSpec {
        JobSpec {
            start_url: start_url.to_string(),
            max_links: self.crawler.max_links,
            request_delay: Duration::from_millis(self.crawler.request_delay_ms),
            custom_headers: self.crawler.headers.clone(),
            pool_size: self.crawler.pool_size,
        }
    }
}
