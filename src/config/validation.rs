use crate::config::types::{AnalysisConfig, Config, FetcherConfig, OutputConfig, ScoringConfig};
use crate::output::ExportFormat;
use crate::{ConfigError, ConfigResult};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_analysis_config(&config.analysis)?;
    validate_scoring_config(&config.scoring)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates batch analysis configuration
fn validate_analysis_config(config: &AnalysisConfig) -> ConfigResult<()> {
    if config.max_concurrent_tasks < 1 || config.max_concurrent_tasks > 100 {
        return Err(ConfigError::Validation(format!(
            "max-concurrent-tasks must be between 1 and 100, got {}",
            config.max_concurrent_tasks
        )));
    }

    if config.profiles.is_empty() {
        return Err(ConfigError::Validation(
            "profiles must list at least one device profile".to_string(),
        ));
    }

    Ok(())
}

/// Validates scoring service configuration
fn validate_scoring_config(config: &ScoringConfig) -> ConfigResult<()> {
    let endpoint = Url::parse(&config.endpoint)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid scoring endpoint: {}", e)))?;

    if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Scoring endpoint must use http or https, got '{}'",
            config.endpoint
        )));
    }

    validate_timeout("scoring", config.timeout_secs)?;

    if !is_env_var_name(&config.api_key_env) {
        return Err(ConfigError::Validation(format!(
            "api-key-env must be a valid environment variable name, got '{}'",
            config.api_key_env
        )));
    }

    Ok(())
}

/// Validates page loader configuration
fn validate_fetcher_config(config: &FetcherConfig) -> ConfigResult<()> {
    validate_timeout("fetcher", config.timeout_secs)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates export configuration
fn validate_output_config(config: &OutputConfig) -> ConfigResult<()> {
    config
        .format
        .parse::<ExportFormat>()
        .map_err(|e| ConfigError::Validation(e.to_string()))?;

    if matches!(&config.path, Some(p) if p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    if matches!(&config.summary_path, Some(p) if p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "summary-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_timeout(section: &str, timeout_secs: u64) -> ConfigResult<()> {
    if timeout_secs < 1 || timeout_secs > 600 {
        return Err(ConfigError::Validation(format!(
            "{} timeout-secs must be between 1 and 600, got {}",
            section, timeout_secs
        )));
    }
    Ok(())
}

/// Letters, digits and underscores, not starting with a digit
fn is_env_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
