//! Configuration module for Pagescope
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file, and reading the scoring API key from the environment.
//!
//! # Example
//!
//! ```no_run
//! use pagescope::config::{load_config, load_credential};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pagescope.toml")).unwrap();
//! let api_key = load_credential(&config).ok();
//! println!("Scoring endpoint: {}", config.scoring.endpoint);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AnalysisConfig, Config, FetcherConfig, OutputConfig, ScoringConfig, DEFAULT_API_KEY_ENV,
    DEFAULT_SCORING_ENDPOINT,
};

// Re-export parser functions
pub use parser::{load_config, load_credential, parse_config};
pub use validation::validate;
