//! Page module for the lightweight structural path
//!
//! This module contains:
//! - The page loader (HTTP GET with a bounded timeout)
//! - The metric extractor over the parsed document

mod extractor;
mod loader;

pub use extractor::{extract_metrics, StructuralMetrics};
pub use loader::PageLoader;
