//! Pagescope: a webpage performance and SEO snapshot tool
//!
//! This crate analyzes batches of URLs, either by scoring them through the
//! PageSpeed Insights API for one or more device profiles or by fetching the
//! page and counting its structural elements, and exports the results as
//! JSON, CSV or an Excel workbook.

pub mod analysis;
pub mod config;
pub mod output;
pub mod page;
pub mod scoring;
pub mod url;

use thiserror::Error;

/// Main error type for Pagescope operations
#[derive(Debug, Error)]
pub enum PagescopeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Analysis(#[from] analysis::AnalysisError),

    #[error("Export error: {0}")]
    Export(#[from] output::ExportError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Analysis interrupted")]
    Interrupted,
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("API key not found: set the {var} environment variable")]
    MissingCredential { var: String },
}

/// Rejected input URLs, reported all at once before any request is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid URLs found: {}", .invalid.join(", "))]
pub struct ValidationError {
    /// The offending inputs, in input order
    pub invalid: Vec<String>,
}

/// Failure of a single fetch task
///
/// Task errors never cross the batch boundary: the orchestrator records them
/// as diagnostics and drops the affected URL from the batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl TaskError {
    /// Classifies a reqwest failure as a transport error
    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            TaskError::Transport("request timed out".to_string())
        } else if err.is_connect() {
            TaskError::Transport(format!("connection failed: {}", err))
        } else if let Some(status) = err.status() {
            TaskError::Transport(format!("HTTP {}", status))
        } else {
            TaskError::Transport(err.to_string())
        }
    }

    /// Short category name used in reports
    pub fn category(&self) -> &'static str {
        match self {
            TaskError::Configuration(_) => "configuration",
            TaskError::Transport(_) => "transport",
            TaskError::Protocol(_) => "protocol",
        }
    }

    /// Human-readable message shown before the raw error detail
    pub fn user_message(&self) -> &'static str {
        match self {
            TaskError::Configuration(_) => {
                "Configuration Error: the PageSpeed Insights API key is missing or was rejected."
            }
            TaskError::Transport(_) => {
                "Network Error: unable to fetch data for this URL. Please try again later."
            }
            TaskError::Protocol(_) => {
                "API Error: received a response that could not be understood."
            }
        }
    }
}

/// Result type alias for Pagescope operations
pub type Result<T> = std::result::Result<T, PagescopeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for single fetch tasks
pub type TaskResult<T> = std::result::Result<T, TaskError>;

// Re-export commonly used types
pub use analysis::{AnalysisBatch, AnalysisMode, AnalysisResult, Orchestrator};
pub use config::Config;
pub use output::{export, ExportFormat};
pub use scoring::{DeviceProfile, MetricValue, ScoreBundle};
pub use url::{validate, validate_all};
