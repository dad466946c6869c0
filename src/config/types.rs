use crate::scoring::DeviceProfile;
use serde::Deserialize;

/// Default PageSpeed Insights v5 endpoint
pub const DEFAULT_SCORING_ENDPOINT: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Default environment variable holding the PageSpeed Insights API key
pub const DEFAULT_API_KEY_ENV: &str = "PAGESPEED_API_KEY";

/// Main configuration structure for Pagescope
///
/// Every section is optional in the TOML file; missing sections and keys
/// fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub scoring: ScoringConfig,
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

/// Batch analysis behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum number of fetch tasks in flight at once
    #[serde(rename = "max-concurrent-tasks")]
    pub max_concurrent_tasks: u32,

    /// Device profiles requested from the scoring service
    pub profiles: Vec<DeviceProfile>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_concurrent_tasks: 8,
            profiles: vec![DeviceProfile::Desktop, DeviceProfile::Mobile],
        }
    }
}

/// Scoring service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Base URL of the runPagespeed endpoint
    pub endpoint: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Name of the environment variable holding the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SCORING_ENDPOINT.to_string(),
            timeout_secs: 60,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

/// Page loader configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// User agent sent with page requests
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: format!("pagescope/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Export format name (json, csv or excel)
    pub format: String,

    /// Path of the export artifact; defaults to the format's file name
    pub path: Option<String>,

    /// Path of the markdown report, if one should be written
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            path: None,
            summary_path: None,
        }
    }
}
