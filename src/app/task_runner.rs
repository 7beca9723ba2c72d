use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use anyhow::{anyhow, Context};
use chrono::Utc;
use tokio::task::{JoinError, JoinHandle};

use crate::{
    analysis::{AnalysisResult, AnalysisUpdate, PageAnalysis},
    bookmarks::BookmarkManager,
    eid::Eid,
};

use super::enrichment::Enricher;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Completed(Box<AnalysisResult>),
    Failed(String),
    /// A newer run for the same bookmark was scheduled, the result was dropped.
    Superseded,
}

/// Handle to one detached enrichment run.
#[derive(Debug)]
pub struct AnalysisJob {
    pub id: Eid,
    pub bookmark_id: u64,
    pub generation: u64,
    pub handle: JoinHandle<AnalysisOutcome>,
}

impl AnalysisJob {
    /// Wait for the run to finish. Never fails, a lost task counts as a failure.
    pub async fn wait(self) -> AnalysisOutcome {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) => {
                let reason = join_error_reason(&err);
                log::error!(
                    "[{}] analysis of bookmark {} (generation {}) lost: {reason}",
                    self.id,
                    self.bookmark_id,
                    self.generation
                );
                AnalysisOutcome::Failed(reason)
            }
        }
    }
}

fn join_error_reason(err: &JoinError) -> String {
    if err.is_panic() {
        "analysis panicked".to_string()
    } else {
        "analysis was cancelled".to_string()
    }
}

/// Generation numbers are never reused, so a stale run can't match a
/// bookmark's entry after it was dropped and recreated.
#[derive(Debug, Default)]
struct Generations {
    next: u64,
    /// Latest generation of every bookmark with a run in flight.
    latest: HashMap<u64, u64>,
}

/// Spawns enrichment runs and writes their results back.
///
/// Every schedule hands the bookmark a new generation. A run only writes if its
/// generation is still the latest when it finishes, the check and the write
/// happen under the same lock.
#[derive(Clone)]
pub struct AnalysisRunner {
    bmark_mgr: Arc<dyn BookmarkManager>,
    enricher: Enricher,
    generations: Arc<Mutex<Generations>>,
}

impl AnalysisRunner {
    pub fn new(bmark_mgr: Arc<dyn BookmarkManager>, enricher: Enricher) -> Self {
        Self {
            bmark_mgr,
            enricher,
            generations: Arc::new(Mutex::new(Generations::default())),
        }
    }

    fn lock_generations(&self) -> MutexGuard<'_, Generations> {
        // counters stay valid after a panic
        self.generations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mark the bookmark pending and start analyzing `url` in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, bookmark_id: u64, url: &str) -> anyhow::Result<AnalysisJob> {
        let runtime = tokio::runtime::Handle::try_current()
            .context("analysis must be scheduled from a tokio runtime")?;

        let generation = {
            let mut generations = self.lock_generations();

            self.bmark_mgr
                .update_analysis(bookmark_id, AnalysisUpdate::Pending { at: Utc::now() })?
                .ok_or_else(|| anyhow!("bookmark {bookmark_id} not found"))?;

            generations.next += 1;
            let generation = generations.next;
            generations.latest.insert(bookmark_id, generation);
            generation
        };

        let id = Eid::new();
        log::debug!("[{id}] scheduling analysis of bookmark {bookmark_id} ({url}), generation {generation}");

        let handle = runtime.spawn({
            let runner = self.clone();
            let url = url.to_string();
            let id = id.clone();

            async move {
                // nested so a panic in the pipeline surfaces as a JoinError here
                let pipeline = tokio::spawn({
                    let enricher = runner.enricher.clone();
                    async move { enricher.analyze(&url).await }
                });

                let analysis = pipeline.await.map_err(|err| join_error_reason(&err));
                runner.finish(&id, bookmark_id, generation, analysis)
            }
        });

        Ok(AnalysisJob {
            id,
            bookmark_id,
            generation,
            handle,
        })
    }

    fn finish(
        &self,
        id: &Eid,
        bookmark_id: u64,
        generation: u64,
        analysis: Result<PageAnalysis, String>,
    ) -> AnalysisOutcome {
        let now = Utc::now();

        let (update, outcome) = match analysis {
            Ok(analysis) if analysis.is_degraded() => {
                let reason = analysis.fetch_error.unwrap_or_default();
                (
                    AnalysisUpdate::Failed { at: now },
                    AnalysisOutcome::Failed(reason),
                )
            }
            Ok(analysis) => {
                let result = AnalysisResult::completed(analysis, now);
                (
                    AnalysisUpdate::Completed(Box::new(result.clone())),
                    AnalysisOutcome::Completed(Box::new(result)),
                )
            }
            Err(reason) => (
                AnalysisUpdate::Failed { at: now },
                AnalysisOutcome::Failed(reason),
            ),
        };

        let mut generations = self.lock_generations();

        let latest = generations.latest.get(&bookmark_id).copied();
        if latest != Some(generation) {
            log::warn!(
                "[{id}] dropping result for bookmark {bookmark_id}: generation {generation} superseded by {latest:?}"
            );
            return AnalysisOutcome::Superseded;
        }
        generations.latest.remove(&bookmark_id);

        let was_completed = matches!(update, AnalysisUpdate::Completed(_));

        let outcome = match self.bmark_mgr.update_analysis(bookmark_id, update) {
            Ok(Some(_)) => outcome,
            Ok(None) => {
                log::error!("[{id}] bookmark {bookmark_id} disappeared during analysis");
                return AnalysisOutcome::Failed(format!("bookmark {bookmark_id} not found"));
            }
            Err(err) => {
                log::error!("[{id}] failed to store analysis for bookmark {bookmark_id}: {err:?}");

                // don't leave the bookmark pending
                if was_completed {
                    if let Err(err) = self
                        .bmark_mgr
                        .update_analysis(bookmark_id, AnalysisUpdate::Failed { at: now })
                    {
                        log::error!("[{id}] failed to mark bookmark {bookmark_id} as failed: {err:?}");
                    }
                }

                return AnalysisOutcome::Failed(err.to_string());
            }
        };

        drop(generations);

        match &outcome {
            AnalysisOutcome::Completed(result) => log::info!(
                "[{id}] analyzed bookmark {bookmark_id}: {} ({} words)",
                result.content_type,
                result.word_count
            ),
            AnalysisOutcome::Failed(reason) => {
                log::error!("[{id}] analysis of bookmark {bookmark_id} failed: {reason}")
            }
            AnalysisOutcome::Superseded => {}
        }

        outcome
    }
}
