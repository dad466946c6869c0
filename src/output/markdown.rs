//! Markdown report generation
//!
//! This module generates a human-readable markdown report of an analysis
//! batch: score tables, structural tables and the list of failed tasks.

use crate::analysis::{AnalysisBatch, Findings};
use crate::output::OutputResult;
use crate::scoring::{
    DeviceProfile, ScoreBundle, CUMULATIVE_LAYOUT_SHIFT, FIELD_DATA_CATEGORY,
    FIRST_CONTENTFUL_PAINT_MS, LARGEST_CONTENTFUL_PAINT_MS, PERFORMANCE_SCORE, SPEED_INDEX_MS,
    TOTAL_BLOCKING_TIME_MS,
};
use chrono::Utc;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes a markdown report of the batch to a file
///
/// # Arguments
///
/// * `batch` - The analysis batch (results and diagnostics)
/// * `output_path` - Path where the markdown file should be written
pub fn write_markdown_report(batch: &AnalysisBatch, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_report(batch);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a batch as markdown
pub fn format_markdown_report(batch: &AnalysisBatch) -> String {
    let mut md = String::new();

    md.push_str("# Pagescope Report\n\n");

    md.push_str("## Overview\n\n");
    md.push_str(&format!("- **Generated**: {}\n", Utc::now().to_rfc3339()));
    md.push_str(&format!("- **URLs Analyzed**: {}\n", batch.len()));
    md.push_str(&format!(
        "- **URLs Failed**: {}\n",
        batch.failed_urls().len()
    ));
    md.push_str(&format!(
        "- **Failed Tasks**: {}\n\n",
        batch.diagnostics.len()
    ));

    // Score tables
    let scored: Vec<_> = batch
        .results
        .iter()
        .filter_map(|r| match &r.findings {
            Findings::Scores(bundles) => Some((r.url.as_str(), bundles)),
            Findings::Structure(_) => None,
        })
        .collect();

    if !scored.is_empty() {
        md.push_str("## Performance Scores\n\n");
        md.push_str("| URL | Profile | Performance | FCP (ms) | LCP (ms) | Speed Index (ms) | TBT (ms) | CLS | Field Data |\n");
        md.push_str("|-----|---------|-------------|----------|----------|------------------|----------|-----|------------|\n");

        for (url, bundles) in &scored {
            for (profile, bundle) in bundles.iter() {
                md.push_str(&score_row(url, *profile, bundle));
            }
        }
        md.push('\n');
    }

    // Structural tables
    let structural: Vec<_> = batch
        .results
        .iter()
        .filter_map(|r| r.structure().map(|m| (r.url.as_str(), m)))
        .collect();

    if !structural.is_empty() {
        md.push_str("## Structural Metrics\n\n");
        md.push_str("| URL | Title | Headers | H1 | Images | Links | Scripts | Stylesheets | Viewport | Description |\n");
        md.push_str("|-----|-------|---------|----|--------|-------|---------|-------------|----------|-------------|\n");

        for (url, m) in &structural {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
                escape_cell(url),
                escape_cell(&m.title),
                m.header_count,
                m.h1_count,
                m.image_count,
                m.link_count,
                m.script_count,
                m.stylesheet_count,
                yes_no(m.has_viewport_meta),
                yes_no(m.has_meta_description),
            ));
        }
        md.push('\n');
    }

    // Failures
    if !batch.diagnostics.is_empty() {
        md.push_str("## Failures\n\n");
        md.push_str("| URL | Profile | Category | Detail |\n");
        md.push_str("|-----|---------|----------|--------|\n");

        for diagnostic in &batch.diagnostics {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                escape_cell(&diagnostic.url),
                diagnostic
                    .profile
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                diagnostic.error.category(),
                escape_cell(&diagnostic.error.to_string()),
            ));
        }
        md.push('\n');
    }

    md
}

fn score_row(url: &str, profile: DeviceProfile, bundle: &ScoreBundle) -> String {
    format!(
        "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
        escape_cell(url),
        profile,
        cell(bundle, PERFORMANCE_SCORE, 0),
        cell(bundle, FIRST_CONTENTFUL_PAINT_MS, 0),
        cell(bundle, LARGEST_CONTENTFUL_PAINT_MS, 0),
        cell(bundle, SPEED_INDEX_MS, 0),
        cell(bundle, TOTAL_BLOCKING_TIME_MS, 0),
        cell(bundle, CUMULATIVE_LAYOUT_SHIFT, 3),
        bundle
            .get(FIELD_DATA_CATEGORY)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string()),
    )
}

/// Numeric cell with fixed precision, `-` when the metric is absent
pub(crate) fn cell(bundle: &ScoreBundle, key: &str, precision: usize) -> String {
    bundle
        .get(key)
        .and_then(|v| v.as_f64())
        .map(|x| format!("{:.*}", precision, x))
        .unwrap_or_else(|| "-".to_string())
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
