//! Analysis orchestrator - batch fan-out and aggregation
//!
//! This module contains the batch logic that coordinates:
//! - Validating every input before any request is made
//! - Planning one task per (URL, profile) pair, or per URL on the structural path
//! - Running all tasks together under a concurrency cap
//! - Assembling the batch in input order, dropping URLs with any failed task

use crate::analysis::types::{AnalysisBatch, AnalysisMode, AnalysisResult, Diagnostic, Findings};
use crate::analysis::AnalysisError;
use crate::config::Config;
use crate::page::{PageLoader, StructuralMetrics};
use crate::scoring::{ApiKey, DeviceProfile, ScoreBundle, ScoringClient};
use crate::url::validate_all;
use crate::{TaskError, TaskResult};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::time::Instant;
use tokio::sync::Semaphore;
use url::Url;

/// Drives batch analysis over the scoring client and the page loader
#[derive(Debug, Clone)]
pub struct Orchestrator {
    scorer: ScoringClient,
    loader: PageLoader,
    max_concurrent_tasks: usize,
}

/// A single unit of work: one URL on one path
struct Task<'a> {
    /// Index of the URL in the request
    slot: usize,
    url: &'a Url,
    kind: TaskKind,
}

#[derive(Debug, Clone, Copy)]
enum TaskKind {
    Score(DeviceProfile),
    Structure,
}

impl TaskKind {
    fn profile(&self) -> Option<DeviceProfile> {
        match self {
            TaskKind::Score(profile) => Some(*profile),
            TaskKind::Structure => None,
        }
    }
}

enum TaskOutput {
    Scores(DeviceProfile, ScoreBundle),
    Structure(StructuralMetrics),
}

/// Per-URL collection point for task outputs
#[derive(Default)]
struct Slot {
    scores: BTreeMap<DeviceProfile, ScoreBundle>,
    structure: Option<StructuralMetrics>,
    failed: bool,
}

impl Slot {
    fn into_findings(self) -> Option<Findings> {
        if self.failed {
            return None;
        }
        if let Some(metrics) = self.structure {
            return Some(Findings::Structure(metrics));
        }
        if self.scores.is_empty() {
            None
        } else {
            Some(Findings::Scores(self.scores))
        }
    }
}

impl Orchestrator {
    /// Creates an orchestrator from already-built clients
    ///
    /// A concurrency cap of zero is treated as one.
    pub fn new(scorer: ScoringClient, loader: PageLoader, max_concurrent_tasks: usize) -> Self {
        Self {
            scorer,
            loader,
            max_concurrent_tasks: max_concurrent_tasks.max(1),
        }
    }

    /// Builds the scoring client and page loader from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `api_key` - The scoring credential, if one was found
    pub fn from_config(config: &Config, api_key: Option<ApiKey>) -> crate::Result<Self> {
        let scorer = ScoringClient::new(&config.scoring, api_key)?;
        let loader = PageLoader::new(&config.fetcher)?;
        Ok(Self::new(
            scorer,
            loader,
            config.analysis.max_concurrent_tasks as usize,
        ))
    }

    /// Analyzes a batch of URLs
    ///
    /// Every input is validated first; a single invalid entry fails the whole
    /// call and no request is made. Otherwise all tasks run concurrently and
    /// the call waits for every one of them. A URL appears in the batch only if
    /// all of its tasks succeeded; failed tasks are returned as diagnostics.
    /// Results keep the input order.
    ///
    /// Dropping the returned future cancels every in-flight request.
    ///
    /// # Arguments
    ///
    /// * `urls` - Candidate URLs, in request order
    /// * `mode` - Scoring with a set of profiles, or the structural path
    ///
    /// # Returns
    ///
    /// * `Ok(AnalysisBatch)` - At least one URL succeeded
    /// * `Err(AnalysisError)` - Empty request, invalid input, no profiles, or no successes
    ///
    /// # Example
    ///
    /// ```no_run
    /// use pagescope::analysis::{AnalysisMode, Orchestrator};
    /// use pagescope::config::Config;
    /// use pagescope::scoring::{ApiKey, DeviceProfile};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let orchestrator = Orchestrator::from_config(&Config::default(), Some(ApiKey::new("key")))?;
    /// let mode = AnalysisMode::Scoring(vec![DeviceProfile::Desktop, DeviceProfile::Mobile]);
    /// let batch = orchestrator.analyze(&["https://example.com"], &mode).await?;
    /// println!("{} results", batch.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn analyze<S: AsRef<str>>(
        &self,
        urls: &[S],
        mode: &AnalysisMode,
    ) -> Result<AnalysisBatch, AnalysisError> {
        if urls.is_empty() {
            return Err(AnalysisError::EmptyRequest);
        }

        let parsed = validate_all(urls)?;
        let tasks = plan_tasks(&parsed, mode)?;

        tracing::info!(
            "Analyzing {} URLs ({} tasks, up to {} at once)",
            parsed.len(),
            tasks.len(),
            self.max_concurrent_tasks
        );
        let start_time = Instant::now();

        let semaphore = Semaphore::new(self.max_concurrent_tasks);
        let outcomes = join_all(tasks.iter().map(|task| self.run_task(&semaphore, task))).await;

        let batch = assemble(urls, &tasks, outcomes);

        tracing::info!(
            "Analysis completed: {} of {} URLs succeeded, {} failed tasks in {:?}",
            batch.len(),
            urls.len(),
            batch.diagnostics.len(),
            start_time.elapsed()
        );

        if batch.is_empty() {
            return Err(AnalysisError::NoResults {
                diagnostics: batch.diagnostics,
            });
        }

        Ok(batch)
    }

    async fn run_task(&self, semaphore: &Semaphore, task: &Task<'_>) -> TaskResult<TaskOutput> {
        let _permit = semaphore
            .acquire()
            .await
            .map_err(|_| TaskError::Transport("task pool closed".to_string()))?;

        match task.kind {
            TaskKind::Score(profile) => self
                .scorer
                .score(task.url, profile)
                .await
                .map(|bundle| TaskOutput::Scores(profile, bundle)),
            TaskKind::Structure => self
                .loader
                .structural_metrics(task.url)
                .await
                .map(TaskOutput::Structure),
        }
    }
}

/// Plans the tasks of a batch, URL-major
///
/// Repeated profiles are requested once.
fn plan_tasks<'a>(urls: &'a [Url], mode: &AnalysisMode) -> Result<Vec<Task<'a>>, AnalysisError> {
    match mode {
        AnalysisMode::Scoring(requested) => {
            let mut profiles: Vec<DeviceProfile> = Vec::with_capacity(requested.len());
            for profile in requested {
                if !profiles.contains(profile) {
                    profiles.push(*profile);
                }
            }

            if profiles.is_empty() {
                return Err(AnalysisError::NoProfiles);
            }

            Ok(urls
                .iter()
                .enumerate()
                .flat_map(|(slot, url)| {
                    profiles.iter().map(move |profile| Task {
                        slot,
                        url,
                        kind: TaskKind::Score(*profile),
                    })
                })
                .collect())
        }
        AnalysisMode::Structure => Ok(urls
            .iter()
            .enumerate()
            .map(|(slot, url)| Task {
                slot,
                url,
                kind: TaskKind::Structure,
            })
            .collect()),
    }
}

/// Groups task outcomes by URL and keeps the URLs whose tasks all succeeded
fn assemble<S: AsRef<str>>(
    inputs: &[S],
    tasks: &[Task<'_>],
    outcomes: Vec<TaskResult<TaskOutput>>,
) -> AnalysisBatch {
    let mut slots: Vec<Slot> = inputs.iter().map(|_| Slot::default()).collect();
    let mut diagnostics = Vec::new();

    for (task, outcome) in tasks.iter().zip(outcomes) {
        let slot = &mut slots[task.slot];
        match outcome {
            Ok(TaskOutput::Scores(profile, bundle)) => {
                slot.scores.insert(profile, bundle);
            }
            Ok(TaskOutput::Structure(metrics)) => {
                slot.structure = Some(metrics);
            }
            Err(error) => {
                let url = inputs[task.slot].as_ref();
                match task.kind.profile() {
                    Some(profile) => tracing::warn!("Failed to analyze {} ({}): {}", url, profile, error),
                    None => tracing::warn!("Failed to analyze {}: {}", url, error),
                }
                slot.failed = true;
                diagnostics.push(Diagnostic {
                    url: url.to_string(),
                    profile: task.kind.profile(),
                    error,
                });
            }
        }
    }

    let results = inputs
        .iter()
        .zip(slots)
        .filter_map(|(input, slot)| {
            slot.into_findings().map(|findings| AnalysisResult {
                url: input.as_ref().to_string(),
                findings,
            })
        })
        .collect();

    AnalysisBatch {
        results,
        diagnostics,
    }
}
