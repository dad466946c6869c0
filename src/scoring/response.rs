//! PageSpeed Insights response normalization

use crate::scoring::types::{
    MetricValue, ScoreBundle, CUMULATIVE_LAYOUT_SHIFT, FIELD_DATA_CATEGORY,
    FIRST_CONTENTFUL_PAINT_MS, LARGEST_CONTENTFUL_PAINT_MS, PERFORMANCE_SCORE, SPEED_INDEX_MS,
    TOTAL_BLOCKING_TIME_MS,
};
use crate::{TaskError, TaskResult};
use serde::Deserialize;
use std::collections::HashMap;

/// Lighthouse audits copied into the bundle, with their bundle keys
const TIMING_AUDITS: &[(&str, &str)] = &[
    ("first-contentful-paint", FIRST_CONTENTFUL_PAINT_MS),
    ("largest-contentful-paint", LARGEST_CONTENTFUL_PAINT_MS),
    ("speed-index", SPEED_INDEX_MS),
    ("total-blocking-time", TOTAL_BLOCKING_TIME_MS),
    ("cumulative-layout-shift", CUMULATIVE_LAYOUT_SHIFT),
];

#[derive(Debug, Deserialize)]
struct PageSpeedResponse {
    #[serde(rename = "lighthouseResult")]
    lighthouse_result: Option<LighthouseResult>,

    #[serde(rename = "loadingExperience")]
    loading_experience: Option<LoadingExperience>,
}

#[derive(Debug, Deserialize)]
struct LighthouseResult {
    #[serde(default)]
    categories: HashMap<String, Category>,

    #[serde(default)]
    audits: HashMap<String, Audit>,
}

#[derive(Debug, Deserialize)]
struct Category {
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Audit {
    #[serde(rename = "numericValue")]
    numeric_value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LoadingExperience {
    overall_category: Option<String>,
}

/// Normalizes a raw runPagespeed response body into a score bundle
///
/// The performance score is scaled to 0–100. Every timing audit in
/// `TIMING_AUDITS` must carry a numeric value; anything missing is a
/// protocol error rather than a zero.
pub fn parse_score_bundle(body: &[u8]) -> TaskResult<ScoreBundle> {
    let response: PageSpeedResponse = serde_json::from_slice(body)
        .map_err(|e| TaskError::Protocol(format!("Invalid API response: {}", e)))?;

    let lighthouse = response.lighthouse_result.ok_or_else(|| {
        TaskError::Protocol("Invalid API response: missing lighthouseResult".to_string())
    })?;

    let score = lighthouse
        .categories
        .get("performance")
        .and_then(|c| c.score)
        .ok_or_else(|| {
            TaskError::Protocol("Invalid API response: missing performance score".to_string())
        })?;

    let mut bundle = ScoreBundle::new();
    bundle.insert(
        PERFORMANCE_SCORE.to_string(),
        MetricValue::Count((score.clamp(0.0, 1.0) * 100.0).round() as u64),
    );

    for (audit_id, key) in TIMING_AUDITS {
        let value = lighthouse
            .audits
            .get(*audit_id)
            .and_then(|a| a.numeric_value)
            .ok_or_else(|| {
                TaskError::Protocol(format!(
                    "Invalid API response: missing audit '{}'",
                    audit_id
                ))
            })?;
        bundle.insert(key.to_string(), MetricValue::Number(value));
    }

    let category = response
        .loading_experience
        .and_then(|le| le.overall_category)
        .unwrap_or_else(|| "UNAVAILABLE".to_string());
    bundle.insert(FIELD_DATA_CATEGORY.to_string(), MetricValue::Text(category));

    Ok(bundle)
}
