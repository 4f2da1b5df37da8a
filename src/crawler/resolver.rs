//! Same-origin link resolution
//!
//! Discovered hrefs are resolved against the page they were found on, not
//! the job's start URL, and only links that stay on the job's host survive.

use url::Url;

/// Resolves a raw href against its page and the job's scope boundary
///
/// Returns the absolute URL when the href is a fetchable page resource on
/// `host`, or `None` when it should be dropped:
/// - malformed or empty hrefs
/// - `mailto:`, `tel:`, `javascript:`, and `data:` links
/// - anything carrying a fragment marker
/// - non-http(s) schemes and cross-host results
///
/// Pure function, safe to call concurrently without synchronization.
pub fn resolve(base: &Url, host: &str, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
        || href.starts_with("data:")
    {
        return None;
    }

    let resolved = base.join(href).ok()?;

    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }

    if resolved.fragment().is_some() {
        return None;
    }

    if host_of(&resolved)? != host {
        return None;
    }

    Some(resolved)
}

/// Returns the authority of a URL as `host` or `host:port`
///
/// The port is kept as written, so `example.com` and `example.com:8080`
/// are distinct scope boundaries.
pub fn host_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}
