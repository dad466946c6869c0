//! HTTP page loader
//!
//! This module handles the lightweight structural path:
//! - Building the HTTP client with the configured user agent and timeout
//! - A single GET per URL, no retries
//! - Error classification into transport failures
//! - Handing the body to the HTML parser

use crate::config::FetcherConfig;
use crate::page::extractor::{extract_metrics, StructuralMetrics};
use crate::{TaskError, TaskResult};
use reqwest::{redirect::Policy, Client};
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for one page
const MAX_REDIRECTS: usize = 10;

/// Fetches pages and parses them into HTML documents
#[derive(Debug, Clone)]
pub struct PageLoader {
    client: Client,
}

impl PageLoader {
    /// Builds a page loader from the fetcher configuration
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pagescope::config::FetcherConfig;
    /// use pagescope::page::PageLoader;
    ///
    /// let loader = PageLoader::new(&FetcherConfig::default()).unwrap();
    /// ```
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }

    /// Fetches a page and parses it
    ///
    /// Any successful body is handed to the HTML parser, whatever its
    /// `Content-Type`.
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Timeout, connection failure | `Transport` |
    /// | Non-2xx status | `Transport` |
    /// | Body could not be read | `Transport` |
    pub async fn load(&self, url: &Url) -> TaskResult<Html> {
        tracing::debug!("Fetching page {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| TaskError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TaskError::Transport(format!(
                "Failed to fetch page: HTTP {}",
                status.as_u16()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| TaskError::from_reqwest(&e))?;

        Ok(Html::parse_document(&body))
    }

    /// Fetches a page and extracts its structural metrics
    pub async fn structural_metrics(&self, url: &Url) -> TaskResult<StructuralMetrics> {
        let document = self.load(url).await?;
        Ok(extract_metrics(&document))
    }
}
