//! PageSpeed Insights API client
//!
//! One `runPagespeed` request is made per (URL, device profile) pair. The
//! client never retries; each call either yields a normalized score bundle or
//! a task error classified as configuration, transport or protocol.

use crate::config::ScoringConfig;
use crate::scoring::response::parse_score_bundle;
use crate::scoring::types::{DeviceProfile, ScoreBundle};
use crate::{ConfigError, TaskError, TaskResult};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::time::Duration;
use url::Url;

/// The scoring service credential
///
/// `Debug` output is redacted so the key never reaches the logs.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key for use in a request
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Client for the remote page-speed scoring service
#[derive(Debug, Clone)]
pub struct ScoringClient {
    client: Client,
    endpoint: Url,
    api_key: Option<ApiKey>,
    api_key_env: String,
}

impl ScoringClient {
    /// Builds a scoring client
    ///
    /// The API key is passed in explicitly. A client without a key can still be
    /// built; every `score` call on it then fails with a configuration error
    /// before any request is sent.
    ///
    /// # Arguments
    ///
    /// * `config` - The scoring service configuration
    /// * `api_key` - The credential, if one was found
    ///
    /// # Returns
    ///
    /// * `Ok(ScoringClient)` - Successfully built client
    /// * `Err(PagescopeError)` - Invalid endpoint or HTTP client failure
    pub fn new(config: &ScoringConfig, api_key: Option<ApiKey>) -> crate::Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid scoring endpoint: {}", e))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            api_key_env: config.api_key_env.clone(),
        })
    }

    /// Returns true if the client was given a credential
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Scores one URL for one device profile
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | No API key | `Configuration` (no request sent) |
    /// | HTTP 400/403 mentioning the key | `Configuration` |
    /// | Timeout, connection failure, other non-2xx | `Transport` |
    /// | Body is not the expected JSON shape | `Protocol` |
    pub async fn score(&self, url: &Url, profile: DeviceProfile) -> TaskResult<ScoreBundle> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            TaskError::Configuration(format!(
                "API key not found: set the {} environment variable",
                self.api_key_env
            ))
        })?;

        tracing::debug!("Scoring {} ({})", url, profile);

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[
                ("url", url.as_str()),
                ("strategy", profile.as_str()),
                ("category", "performance"),
                ("key", api_key.expose()),
            ])
            .send()
            .await
            .map_err(|e| TaskError::from_reqwest(&e.without_url()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TaskError::from_reqwest(&e.without_url()))?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        parse_score_bundle(&body)
    }
}

/// Maps a non-2xx scoring response to a task error
fn classify_failure(status: StatusCode, body: &[u8]) -> TaskError {
    let text = String::from_utf8_lossy(body);
    let mentions_key = text.contains("API key") || text.contains("API_KEY");

    if mentions_key && (status == StatusCode::BAD_REQUEST || status == StatusCode::FORBIDDEN) {
        TaskError::Configuration(format!(
            "Scoring service rejected the API key (HTTP {})",
            status.as_u16()
        ))
    } else {
        TaskError::Transport(format!(
            "Failed to fetch metrics: scoring service returned HTTP {}",
            status.as_u16()
        ))
    }
}
