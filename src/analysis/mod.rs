//! Analysis module: validation, fan-out and aggregation of a URL batch
//!
//! This module contains the core batch logic, including:
//! - The orchestrator that runs scoring or structural tasks concurrently
//! - The result, batch and diagnostic types
//! - Batch-level errors

mod orchestrator;
mod types;

pub use orchestrator::Orchestrator;
pub use types::{AnalysisBatch, AnalysisMode, AnalysisResult, Diagnostic, Findings};

use crate::ValidationError;
use thiserror::Error;

/// Errors that fail a whole analysis request
///
/// Per-URL failures are not errors at this level; they are returned as
/// diagnostics alongside the successful results.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No URLs to analyze")]
    EmptyRequest,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("No device profiles requested")]
    NoProfiles,

    #[error("Analysis yielded no results ({} failed tasks)", .diagnostics.len())]
    NoResults { diagnostics: Vec<Diagnostic> },
}
