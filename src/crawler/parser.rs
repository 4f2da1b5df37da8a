//! HTML parsing for page extraction
//!
//! Extracts the three things the engine needs from a fetched body:
//! the page title, the visible body text, and the raw href values of
//! anchor elements. Href resolution and scoping happen later in
//! [`crate::crawler::resolver`]; this module never interprets them.

use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// The page title (from the first <title> tag)
    pub title: Option<String>,

    /// Visible body text, whitespace-collapsed
    pub text: String,

    /// Raw href attribute values of all anchors, document order
    pub hrefs: Vec<String>,
}

/// Parses HTML content and extracts title, body text, and anchor hrefs.
pub fn parse_page(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        text: extract_text(&document),
        hrefs: extract_hrefs(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the visible body text, collapsing runs of whitespace
fn extract_text(document: &Html) -> String {
    let selector = match Selector::parse("body") {
        Ok(s) => s,
        Err(_) => return String::new(),
    };

    document
        .select(&selector)
        .next()
        .map(|body| {
            body.text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

/// Extracts raw href attribute values from anchor elements
fn extract_hrefs(document: &Html) -> Vec<String> {
    let mut hrefs = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                hrefs.push(href.to_string());
            }
        }
    }

    hrefs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_title() {
        let parsed =
            parse_page(r#"<html><head><title>Test Page</title></head><body></body></html>"#);
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_extract_title_with_whitespace() {
        let parsed =
            parse_page(r#"<html><head><title>  Test Page  </title></head><body></body></html>"#);
        assert_eq!(parsed.title, Some("Test Page".to_string()));
    }

    #[test]
    fn test_no_title() {
        let parsed = parse_page(r#"<html><head></head><body></body></html>"#);
        assert_eq!(parsed.title, None);
    }

    #[test]
    fn test_extract_body_text() {
        let parsed = parse_page(
            r#"<html><body><h1>Heading</h1>
            <p>First   paragraph.</p>
            <p>Second paragraph.</p></body></html>"#,
        );
        assert_eq!(parsed.text, "Heading First paragraph. Second paragraph.");
    }

    #[test]
    fn test_extract_hrefs_raw() {
        let parsed = parse_page(
            r#"<html><body>
            <a href="/page1">One</a>
            <a href="https://other.com/page2">Two</a>
            <a href="mailto:x@example.com">Mail</a>
            </body></html>"#,
        );
        // Hrefs come back unfiltered; the resolver decides what survives
        assert_eq!(
            parsed.hrefs,
            vec!["/page1", "https://other.com/page2", "mailto:x@example.com"]
        );
    }

    #[test]
    fn test_duplicate_hrefs_kept() {
        let parsed = parse_page(
            r#"<html><body>
            <a href="/same">First</a>
            <a href="/same">Second</a>
            </body></html>"#,
        );
        assert_eq!(parsed.hrefs, vec!["/same", "/same"]);
    }

    #[test]
    fn test_anchor_without_href_ignored() {
        let parsed = parse_page(r#"<html><body><a name="anchor">No href</a></body></html>"#);
        assert!(parsed.hrefs.is_empty());
    }
}
