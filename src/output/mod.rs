//! Output module for exporting and reporting analysis results
//!
//! This module handles:
//! - Exporting a batch as JSON, CSV or an Excel workbook
//! - Generating a markdown report
//! - Printing the terminal summary

mod export;
mod markdown;
mod summary;

pub use export::{export, flatten_batch, flatten_result, ExportError, ExportFormat, FlatRecord};
pub use markdown::{format_markdown_report, write_markdown_report};
pub use summary::{format_failures, format_summary, print_summary};

use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing output files
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes a finished export artifact to disk
///
/// Refuses to write an empty artifact.
pub fn write_artifact(bytes: &[u8], path: &Path) -> OutputResult<()> {
    if bytes.is_empty() {
        return Err(OutputError::Write(format!(
            "refusing to write empty artifact to {}",
            path.display()
        )));
    }
    std::fs::write(path, bytes)?;
    tracing::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
