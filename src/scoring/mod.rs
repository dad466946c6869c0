//! Scoring module: the PageSpeed Insights client and its data types
//!
//! This module contains:
//! - Device profiles and metric values
//! - The scoring client, one request per (URL, profile)
//! - Normalization of the raw API response into a score bundle

mod client;
mod response;
mod types;

pub use client::{ApiKey, ScoringClient};
pub use response::parse_score_bundle;
pub use types::{
    DeviceProfile, MetricValue, ScoreBundle, CUMULATIVE_LAYOUT_SHIFT, FIELD_DATA_CATEGORY,
    FIRST_CONTENTFUL_PAINT_MS, LARGEST_CONTENTFUL_PAINT_MS, PERFORMANCE_SCORE, SPEED_INDEX_MS,
    TOTAL_BLOCKING_TIME_MS,
};
