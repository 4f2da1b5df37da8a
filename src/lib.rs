//! Burrow: a same-origin crawl job engine
//!
//! This crate implements a web crawler that runs as a background job: given a
//! start URL it fetches pages, extracts titles, visible text and outbound
//! links, recursively follows in-domain links up to a configured budget,
//! persists each page, and reports live progress while the job runs.

pub mod config;
pub mod crawler;
pub mod job;
pub mod progress;
pub mod storage;

use thiserror::Error;

/// Main error type for Burrow operations
#[derive(Debug, Error)]
pub enum BurrowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid start URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

/// Result type alias for Burrow operations
pub type Result<T> = std::result::Result<T, BurrowError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use job::{JobManager, JobSnapshot, JobSpec, JobStatus};
pub use progress::{ChannelSink, LogSink, ProgressEvent, ProgressSink};
