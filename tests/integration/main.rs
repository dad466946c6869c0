//! Integration tests for Pagescope
//!
//! These tests use wiremock to stand in for the scoring service and for
//! the pages themselves, and run whole batches end-to-end.

mod analysis_tests;

use pagescope::analysis::Orchestrator;
use pagescope::config::{Config, FetcherConfig, ScoringConfig};
use pagescope::scoring::ApiKey;

/// Creates a test configuration pointing the scoring client at the mock server
pub fn create_test_config(base_url: &str, timeout_secs: u64) -> Config {
    let mut config = Config::default();
    config.analysis.max_concurrent_tasks = 4;
    config.scoring = ScoringConfig {
        endpoint: format!("{}/runPagespeed", base_url),
        timeout_secs,
        ..ScoringConfig::default()
    };
    config.fetcher = FetcherConfig {
        timeout_secs,
        user_agent: "PagescopeTest/1.0".to_string(),
    };
    config
}

/// Builds an orchestrator with a test key
pub fn create_orchestrator(config: &Config) -> Orchestrator {
    Orchestrator::from_config(config, Some(ApiKey::new("test-key")))
        .expect("Failed to build orchestrator")
}

/// A scoring response with every metric present
pub fn scoring_body(score: f64) -> String {
    format!(
        r#"{{
            "loadingExperience": {{ "overall_category": "AVERAGE" }},
            "lighthouseResult": {{
                "categories": {{ "performance": {{ "score": {} }} }},
                "audits": {{
                    "first-contentful-paint": {{ "numericValue": 900.5 }},
                    "largest-contentful-paint": {{ "numericValue": 2100.0 }},
                    "speed-index": {{ "numericValue": 1500.2 }},
                    "total-blocking-time": {{ "numericValue": 120 }},
                    "cumulative-layout-shift": {{ "numericValue": 0.05 }}
                }}
            }}
        }}"#,
        score
    )
}
