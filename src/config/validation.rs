use crate::config::types::Config;
use crate::job::JobSpec;
use crate::ConfigError;
use reqwest::header::{HeaderName, HeaderValue};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_limits(config.crawler.max_links, config.crawler.pool_size)?;
    validate_headers(config.crawler.headers.iter())?;

    if config.output.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a job spec before any worker starts
///
/// Checks the visitation budget, pool size, custom headers, and that the
/// start URL parses as an http(s) URL with a host. Returns the parsed
/// start URL so callers do not have to parse it twice.
pub fn validate_spec(spec: &JobSpec) -> Result<Url, ConfigError> {
    validate_limits(spec.max_links, spec.pool_size)?;
    validate_headers(spec.custom_headers.iter())?;

    let url = Url::parse(&spec.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", spec.start_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "start URL must be http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "start URL has no host: {}",
            spec.start_url
        )));
    }

    Ok(url)
}

fn validate_limits(max_links: usize, pool_size: usize) -> Result<(), ConfigError> {
    if max_links < 1 {
        return Err(ConfigError::Validation(format!(
            "max_links must be >= 1, got {}",
            max_links
        )));
    }

    if pool_size < 1 || pool_size > 100 {
        return Err(ConfigError::Validation(format!(
            "pool_size must be between 1 and 100, got {}",
            pool_size
        )));
    }

    Ok(())
}

fn validate_headers<'a>(
    headers: impl Iterator<Item = (&'a String, &'a String)>,
) -> Result<(), ConfigError> {
    for (name, value) in headers {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(format!("invalid header name '{}'", name)))?;
        HeaderValue::from_str(value).map_err(|_| {
            ConfigError::InvalidHeader(format!("invalid value for header '{}'", name))
        })?;
    }
    Ok(())
}
