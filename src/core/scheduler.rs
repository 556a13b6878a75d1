use crate::core::fetcher::process_source;
use crate::domain::model::{ScheduleMode, SourceOutcome};
use crate::domain::ports::SourceFetcher;
use crate::utils::error::SourceError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::{self, JoinSet};

pub const DEFAULT_MAX_CONCURRENCY: usize = 100;

/// Dispatches one fetch task per source under a global concurrency cap.
///
/// Every task owns its own [`crate::domain::model::PerSourceResult`] and hands
/// the finished [`SourceOutcome`] back through a [`JoinSet`]; there is no state
/// shared between running tasks. Outcomes are returned in source-list order.
pub struct BatchScheduler<F: SourceFetcher + 'static> {
    fetcher: Arc<F>,
    max_concurrency: usize,
    mode: ScheduleMode,
}

type Pending = HashMap<task::Id, (usize, String)>;

impl<F: SourceFetcher + 'static> BatchScheduler<F> {
    pub fn new(fetcher: Arc<F>, max_concurrency: usize, mode: ScheduleMode) -> Self {
        Self {
            fetcher,
            max_concurrency: max_concurrency.max(1),
            mode,
        }
    }

    /// `W = min(total_sources, max_concurrency)`, never below one.
    pub fn concurrency_cap(&self, total_sources: usize) -> usize {
        total_sources.min(self.max_concurrency).max(1)
    }

    pub async fn run(&self, sources: Vec<String>) -> Vec<SourceOutcome> {
        let cap = self.concurrency_cap(sources.len());
        tracing::info!(
            "Dispatching {} sources ({} mode, at most {} in flight)",
            sources.len(),
            self.mode,
            cap
        );

        let mut outcomes = match self.mode {
            ScheduleMode::Wave => self.run_waves(sources, cap).await,
            ScheduleMode::Window => self.run_window(sources, cap).await,
        };
        outcomes.sort_by_key(|outcome| outcome.index);
        outcomes
    }

    async fn run_waves(&self, sources: Vec<String>, cap: usize) -> Vec<SourceOutcome> {
        let mut outcomes = Vec::with_capacity(sources.len());
        let indexed: Vec<(usize, String)> = sources.into_iter().enumerate().collect();

        for (wave, batch) in indexed.chunks(cap).enumerate() {
            tracing::debug!("Starting wave {} with {} sources", wave + 1, batch.len());
            let mut join_set = JoinSet::new();
            let mut pending = Pending::new();
            for (index, source) in batch.iter().cloned() {
                self.spawn_fetch(&mut join_set, &mut pending, index, source, None);
            }
            drain(&mut join_set, &mut pending, &mut outcomes).await;
        }

        outcomes
    }

    async fn run_window(&self, sources: Vec<String>, cap: usize) -> Vec<SourceOutcome> {
        let mut outcomes = Vec::with_capacity(sources.len());
        let semaphore = Arc::new(Semaphore::new(cap));
        let mut join_set = JoinSet::new();
        let mut pending = Pending::new();

        for (index, source) in sources.into_iter().enumerate() {
            // The semaphore is never closed, so acquisition only fails if that changes.
            let permit = match Arc::clone(&semaphore).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    outcomes.push(SourceOutcome {
                        index,
                        source,
                        result: Err(SourceError::TaskFailed {
                            reason: e.to_string(),
                        }),
                    });
                    continue;
                }
            };
            self.spawn_fetch(&mut join_set, &mut pending, index, source, Some(permit));
        }
        drain(&mut join_set, &mut pending, &mut outcomes).await;

        outcomes
    }

    fn spawn_fetch(
        &self,
        join_set: &mut JoinSet<SourceOutcome>,
        pending: &mut Pending,
        index: usize,
        source: String,
        permit: Option<OwnedSemaphorePermit>,
    ) {
        let fetcher = Arc::clone(&self.fetcher);
        let task_source = source.clone();
        let handle = join_set.spawn(async move {
            let outcome = process_source(&*fetcher, index, task_source).await;
            drop(permit);
            outcome
        });
        pending.insert(handle.id(), (index, source));
    }
}

async fn drain(
    join_set: &mut JoinSet<SourceOutcome>,
    pending: &mut Pending,
    outcomes: &mut Vec<SourceOutcome>,
) {
    while let Some(joined) = join_set.join_next_with_id().await {
        match joined {
            Ok((id, outcome)) => {
                pending.remove(&id);
                outcomes.push(outcome);
            }
            Err(e) => {
                if let Some((index, source)) = pending.remove(&e.id()) {
                    tracing::error!("Fetch task for {} did not complete: {}", source, e);
                    outcomes.push(SourceOutcome {
                        index,
                        source,
                        result: Err(SourceError::TaskFailed {
                            reason: e.to_string(),
                        }),
                    });
                }
            }
        }
    }
}
