//! Terminal summary of an analysis batch

use crate::analysis::{AnalysisBatch, Diagnostic, Findings};
use crate::output::markdown::{cell, yes_no};
use crate::scoring::{
    CUMULATIVE_LAYOUT_SHIFT, FIELD_DATA_CATEGORY, FIRST_CONTENTFUL_PAINT_MS,
    LARGEST_CONTENTFUL_PAINT_MS, PERFORMANCE_SCORE, SPEED_INDEX_MS, TOTAL_BLOCKING_TIME_MS,
};

/// Formats the batch for the terminal
///
/// Each failure is shown with its category message first and the raw error
/// detail underneath.
pub fn format_summary(batch: &AnalysisBatch) -> String {
    let mut out = String::new();

    out.push_str("=== Analysis Results ===\n\n");

    for result in &batch.results {
        out.push_str(&format!("{}\n", result.url));
        match &result.findings {
            Findings::Scores(bundles) => {
                for (profile, bundle) in bundles {
                    out.push_str(&format!(
                        "  {:<8} performance {} | FCP {} ms | LCP {} ms | SI {} ms | TBT {} ms | CLS {} | field data {}\n",
                        format!("{}:", profile),
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
                    ));
                }
            }
            Findings::Structure(m) => {
                out.push_str(&format!("  title: {:?}\n", m.title));
                out.push_str(&format!(
                    "  headers {} (h1 {}) | images {} | links {} | scripts {} | stylesheets {} | viewport {} | description {}\n",
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
        }
    }

    if !batch.diagnostics.is_empty() {
        out.push('\n');
        out.push_str(&format_failures(&batch.diagnostics));
    }

    if !batch.is_empty() {
        out.push_str(&format!(
            "\n✓ Analysis completed for {} URLs\n",
            batch.len()
        ));
    }

    out
}

/// Formats failed tasks, message first and detail second
pub fn format_failures(diagnostics: &[Diagnostic]) -> String {
    let mut out = format!("Failures ({}):\n", diagnostics.len());

    for diagnostic in diagnostics {
        match diagnostic.profile {
            Some(profile) => out.push_str(&format!("  ✗ {} ({})\n", diagnostic.url, profile)),
            None => out.push_str(&format!("  ✗ {}\n", diagnostic.url)),
        }
        out.push_str(&format!("    {}\n", diagnostic.error.user_message()));
        out.push_str(&format!("    detail: {}\n", diagnostic.error));
    }

    out
}

/// Prints the batch summary to stdout
pub fn print_summary(batch: &AnalysisBatch) {
    print!("{}", format_summary(batch));
}
