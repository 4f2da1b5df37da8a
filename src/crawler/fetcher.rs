//! HTTP fetcher for crawl workers
//!
//! One fetch is one GET with the job's custom headers, preceded by the
//! configured per-worker delay. Non-2xx responses are best-effort
//! successes with the status recorded in the page metadata; only network,
//! timeout, and body-read failures are errors. The fetcher has no side
//! effects beyond the request itself: it never touches the frontier, the
//! job, or the store, which keeps it testable against a mock HTTP server.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;

use crate::crawler::parser::parse_page;
use crate::job::JobSpec;
use crate::{BurrowError, ConfigError};

/// Everything extracted from one successfully fetched URL
#[derive(Debug, Clone)]
pub struct PageData {
    /// The URL that was fetched
    pub url: String,

    /// Page title, if the document has one
    pub title: Option<String>,

    /// Visible body text
    pub content: String,

    /// Raw href values found on the page
    pub hrefs: Vec<String>,

    /// HTTP status code of the response
    pub status_code: u16,

    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

/// Issues the HTTP requests for one job's workers
pub struct Fetcher {
    client: Client,
    delay: Duration,
}

impl Fetcher {
    /// Builds a fetcher from a job spec.
    ///
    /// The custom headers are installed as client defaults so every
    /// request carries them.
    pub fn new(spec: &JobSpec) -> Result<Self, BurrowError> {
        let client = build_http_client(&spec.custom_headers)?;
        Ok(Self {
            client,
            delay: spec.request_delay,
        })
    }

    /// Fetches one URL and extracts its page data.
    ///
    /// Suspends for the configured delay first; rate limiting is
    /// per-worker, with the pool size capping the total in-flight rate.
    pub async fn fetch(&self, url: &str) -> Result<PageData, BurrowError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| BurrowError::Http {
                url: url.to_string(),
                source,
            })?;

        let status_code = response.status().as_u16();

        let body = response
            .text()
            .await
            .map_err(|source| BurrowError::Http {
                url: url.to_string(),
                source,
            })?;

        let parsed = parse_page(&body);

        Ok(PageData {
            url: url.to_string(),
            title: parsed.title,
            content: parsed.text,
            hrefs: parsed.hrefs,
            status_code,
            fetched_at: Utc::now(),
        })
    }
}

/// Builds an HTTP client with the job's custom headers and sane timeouts
pub fn build_http_client(headers: &HashMap<String, String>) -> Result<Client, BurrowError> {
    let mut header_map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(format!("invalid header name '{}'", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ConfigError::InvalidHeader(format!("invalid value for '{}'", name)))?;
        header_map.insert(name, value);
    }

    let client = Client::builder()
        .default_headers(header_map)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}
