use crate::page::StructuralMetrics;
use crate::scoring::{DeviceProfile, ScoreBundle};
use crate::TaskError;
use std::collections::BTreeMap;

/// Which analysis path a batch takes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Score every URL once per listed device profile
    Scoring(Vec<DeviceProfile>),

    /// Fetch every URL once and count its structural elements
    Structure,
}

/// What was learned about one URL
#[derive(Debug, Clone, PartialEq)]
pub enum Findings {
    /// One score bundle per requested profile
    Scores(BTreeMap<DeviceProfile, ScoreBundle>),

    /// Structural metrics from the page itself
    Structure(StructuralMetrics),
}

/// One successfully analyzed URL
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// The URL exactly as given in the request
    pub url: String,

    pub findings: Findings,
}

impl AnalysisResult {
    /// Score bundle for a profile, if this result came from the scoring path
    pub fn scores(&self, profile: DeviceProfile) -> Option<&ScoreBundle> {
        match &self.findings {
            Findings::Scores(bundles) => bundles.get(&profile),
            Findings::Structure(_) => None,
        }
    }

    /// Structural metrics, if this result came from the structural path
    pub fn structure(&self) -> Option<&StructuralMetrics> {
        match &self.findings {
            Findings::Structure(metrics) => Some(metrics),
            Findings::Scores(_) => None,
        }
    }
}

/// A failed task, kept for reporting
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// The URL exactly as given in the request
    pub url: String,

    /// The profile of the failed scoring task; `None` on the structural path
    pub profile: Option<DeviceProfile>,

    pub error: TaskError,
}

/// Results of one analysis request, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisBatch {
    pub results: Vec<AnalysisResult>,

    /// One entry per failed task
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisBatch {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// URLs of the successful results, in order
    pub fn urls(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.url.as_str()).collect()
    }

    /// Distinct URLs that failed, in order of first failure
    pub fn failed_urls(&self) -> Vec<&str> {
        let mut urls: Vec<&str> = Vec::new();
        for diagnostic in &self.diagnostics {
            if !urls.contains(&diagnostic.url.as_str()) {
                urls.push(diagnostic.url.as_str());
            }
        }
        urls
    }
}
