use crate::config::types::Config;
use crate::config::validation::validate;
use crate::scoring::ApiKey;
use crate::{ConfigError, ConfigResult};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use pagescope::config::load_config;
///
/// let config = load_config(Path::new("pagescope.toml")).unwrap();
/// println!("Concurrency: {}", config.analysis.max_concurrent_tasks);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Reads the scoring API key from the environment variable named in the config
///
/// Empty or whitespace-only values count as missing.
pub fn load_credential(config: &Config) -> ConfigResult<ApiKey> {
    let var = &config.scoring.api_key_env;
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(ApiKey::new(value.trim())),
        _ => Err(ConfigError::MissingCredential { var: var.clone() }),
    }
}
