//! URL handling module for Pagescope
//!
//! This module provides the URL validator used before any network call and
//! the reader for bulk URL lists.

mod list;

use crate::ValidationError;
use url::Url;

pub use list::parse_url_list;

/// Returns true if `candidate` is an absolute http(s) URL with a host
///
/// Never panics; anything that fails to parse is simply invalid.
///
/// # Examples
///
/// ```
/// use pagescope::url::validate;
///
/// assert!(validate("https://example.com"));
/// assert!(validate("http://example.com/path?q=1"));
/// assert!(!validate("not-a-url"));
/// assert!(!validate("ftp://example.com"));
/// ```
pub fn validate(candidate: &str) -> bool {
    parse_candidate(candidate).is_some()
}

/// Validates every candidate before any of them is used
///
/// # Arguments
///
/// * `candidates` - The input URLs, in request order
///
/// # Returns
///
/// * `Ok(Vec<Url>)` - Parsed URLs, in the same order as the input
/// * `Err(ValidationError)` - Every invalid input, in input order
pub fn validate_all<S: AsRef<str>>(candidates: &[S]) -> Result<Vec<Url>, ValidationError> {
    let mut parsed = Vec::with_capacity(candidates.len());
    let mut invalid = Vec::new();

    for candidate in candidates {
        let candidate = candidate.as_ref();
        match parse_candidate(candidate) {
            Some(url) => parsed.push(url),
            None => invalid.push(candidate.to_string()),
        }
    }

    if invalid.is_empty() {
        Ok(parsed)
    } else {
        Err(ValidationError { invalid })
    }
}

fn parse_candidate(candidate: &str) -> Option<Url> {
    if !has_authority(candidate) {
        return None;
    }

    let url = Url::parse(candidate).ok()?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Some(url),
        _ => None,
    }
}

/// True when the raw text carries a non-empty authority after `scheme:`
///
/// The parser repairs inputs such as `http:///path` or `http:example.com`
/// into URLs with a host the caller never wrote, so the check runs on the
/// original text.
fn has_authority(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    let Some((_, rest)) = trimmed.split_once(':') else {
        return false;
    };

    let mut chars = rest.chars();
    let slashes = chars.by_ref().take(2).filter(|c| *c == '/' || *c == '\\').count();
    if slashes < 2 {
        return false;
    }

    matches!(chars.next(), Some(c) if c != '/' && c != '\\')
}
