use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Device emulation requested from the scoring service
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceProfile {
    Desktop,
    Mobile,
}

impl DeviceProfile {
    /// All profiles, in report order
    pub const ALL: [DeviceProfile; 2] = [DeviceProfile::Desktop, DeviceProfile::Mobile];

    /// Wire name, also used as the `strategy` query parameter and export prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceProfile::Desktop => "desktop",
            DeviceProfile::Mobile => "mobile",
        }
    }
}

impl fmt::Display for DeviceProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desktop" => Ok(DeviceProfile::Desktop),
            "mobile" => Ok(DeviceProfile::Mobile),
            other => Err(format!(
                "unknown device profile '{}' (expected desktop or mobile)",
                other
            )),
        }
    }
}

/// A single metric value
///
/// Serialized untagged, so JSON output carries plain numbers, strings and
/// booleans. Integers deserialize as `Count`, other numbers as `Number`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Number(f64),
    Flag(bool),
    Text(String),
}

impl MetricValue {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Count(n) => Some(*n as f64),
            MetricValue::Number(x) => Some(*x),
            _ => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{}", n),
            MetricValue::Number(x) => write!(f, "{}", x),
            MetricValue::Flag(b) => write!(f, "{}", b),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for MetricValue {
    fn from(n: u64) -> Self {
        MetricValue::Count(n)
    }
}

impl From<f64> for MetricValue {
    fn from(x: f64) -> Self {
        MetricValue::Number(x)
    }
}

impl From<bool> for MetricValue {
    fn from(b: bool) -> Self {
        MetricValue::Flag(b)
    }
}

impl From<String> for MetricValue {
    fn from(s: String) -> Self {
        MetricValue::Text(s)
    }
}

impl From<&str> for MetricValue {
    fn from(s: &str) -> Self {
        MetricValue::Text(s.to_string())
    }
}

/// Normalized scoring output for one URL and one device profile
pub type ScoreBundle = BTreeMap<String, MetricValue>;

/// Lighthouse performance score, 0 to 100
pub const PERFORMANCE_SCORE: &str = "performance_score";
pub const FIRST_CONTENTFUL_PAINT_MS: &str = "first_contentful_paint_ms";
pub const LARGEST_CONTENTFUL_PAINT_MS: &str = "largest_contentful_paint_ms";
pub const SPEED_INDEX_MS: &str = "speed_index_ms";
pub const TOTAL_BLOCKING_TIME_MS: &str = "total_blocking_time_ms";
pub const CUMULATIVE_LAYOUT_SHIFT: &str = "cumulative_layout_shift";
/// CrUX overall category (`FAST`, `AVERAGE`, `SLOW`) or `UNAVAILABLE`
pub const FIELD_DATA_CATEGORY: &str = "field_data_category";
