//! Structural metric extraction
//!
//! Counts the elements of a parsed page that matter for a quick SEO check:
//! - Page title and meta description
//! - Headers, images, links, scripts and stylesheets
//! - Presence of the viewport and description meta tags
//!
//! Extraction never fails; missing elements give zero counts, empty strings
//! and `false` flags.

use crate::scoring::MetricValue;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

/// Counts and flags derived from a parsed HTML document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralMetrics {
    /// Text of the first `<title>`, trimmed
    pub title: String,

    /// `content` of the description meta tag, trimmed
    pub meta_description: String,

    /// Number of `<h1>` to `<h6>` elements
    pub header_count: u64,

    /// Number of `<h1>` elements
    pub h1_count: u64,

    pub image_count: u64,

    /// Number of `<a href>` elements
    pub link_count: u64,

    pub meta_tag_count: u64,

    pub script_count: u64,

    /// Number of `<link rel="stylesheet">` elements
    pub stylesheet_count: u64,

    pub has_meta_description: bool,

    pub has_viewport_meta: bool,
}

impl StructuralMetrics {
    /// Named fields in export order
    pub fn fields(&self) -> Vec<(&'static str, MetricValue)> {
        vec![
            ("title", MetricValue::from(self.title.as_str())),
            (
                "meta_description",
                MetricValue::from(self.meta_description.as_str()),
            ),
            ("header_count", MetricValue::Count(self.header_count)),
            ("h1_count", MetricValue::Count(self.h1_count)),
            ("image_count", MetricValue::Count(self.image_count)),
            ("link_count", MetricValue::Count(self.link_count)),
            ("meta_tag_count", MetricValue::Count(self.meta_tag_count)),
            ("script_count", MetricValue::Count(self.script_count)),
            ("stylesheet_count", MetricValue::Count(self.stylesheet_count)),
            (
                "has_meta_description",
                MetricValue::Flag(self.has_meta_description),
            ),
            ("has_viewport_meta", MetricValue::Flag(self.has_viewport_meta)),
        ]
    }
}

/// Extracts structural metrics from a parsed document
///
/// # Example
///
/// ```
/// use pagescope::page::extract_metrics;
/// use scraper::Html;
///
/// let html = r#"<html><head><title>Home</title></head><body><h1>Hi</h1></body></html>"#;
/// let metrics = extract_metrics(&Html::parse_document(html));
/// assert_eq!(metrics.title, "Home");
/// assert_eq!(metrics.h1_count, 1);
/// ```
pub fn extract_metrics(document: &Html) -> StructuralMetrics {
    let meta_description = meta_content(document, "description");
    let viewport = meta_content(document, "viewport");

    StructuralMetrics {
        title: extract_title(document).unwrap_or_default(),
        has_meta_description: meta_description.as_deref().is_some_and(|d| !d.is_empty()),
        meta_description: meta_description.unwrap_or_default(),
        header_count: count(document, "h1, h2, h3, h4, h5, h6"),
        h1_count: count(document, "h1"),
        image_count: count(document, "img"),
        link_count: count(document, "a[href]"),
        meta_tag_count: count(document, "meta"),
        script_count: count(document, "script"),
        stylesheet_count: count_stylesheets(document),
        has_viewport_meta: viewport.is_some(),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Returns the trimmed `content` of the first `<meta name=...>` matching `name`
///
/// The name comparison ignores ASCII case. A matching tag without a `content`
/// attribute yields an empty string.
fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse("meta[name]").ok()?;

    document
        .select(&selector)
        .find(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .map(|element| {
            element
                .value()
                .attr("content")
                .unwrap_or_default()
                .trim()
                .to_string()
        })
}

fn count(document: &Html, selector: &str) -> u64 {
    Selector::parse(selector)
        .map(|s| document.select(&s).count() as u64)
        .unwrap_or(0)
}

fn count_stylesheets(document: &Html) -> u64 {
    let Ok(selector) = Selector::parse("link[rel]") else {
        return 0;
    };

    document
        .select(&selector)
        .filter(|element| {
            element.value().attr("rel").is_some_and(|rel| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("stylesheet"))
            })
        })
        .count() as u64
}
