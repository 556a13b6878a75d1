use crate::adapters::http::HttpFetcher;
use crate::core::merger::merge_outcomes;
use crate::core::scheduler::BatchScheduler;
use crate::core::sources::source_list_from_bytes;
use crate::core::statistics;
use crate::core::{
    AggregateState, ConfigProvider, Pipeline, SourceFetcher, SourceOutcome, StatsReport, Storage,
};
use crate::utils::error::Result;
use chrono::Utc;
use std::sync::Arc;

/// Source list in, statistics out.
///
/// * extract: read the source list and fetch every source concurrently
/// * transform: merge the per-source results
/// * load: compute the statistics and optionally persist a JSON report
pub struct StatsPipeline<S: Storage, C: ConfigProvider, F: SourceFetcher + 'static> {
    storage: S,
    config: C,
    fetcher: Arc<F>,
}

impl<S: Storage, C: ConfigProvider> StatsPipeline<S, C, HttpFetcher> {
    pub fn new(storage: S, config: C) -> Self {
        let fetcher = HttpFetcher::new().with_timeout(config.request_timeout());
        Self::with_fetcher(storage, config, fetcher)
    }
}

impl<S: Storage, C: ConfigProvider, F: SourceFetcher + 'static> StatsPipeline<S, C, F> {
    pub fn with_fetcher(storage: S, config: C, fetcher: F) -> Self {
        Self {
            storage,
            config,
            fetcher: Arc::new(fetcher),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, F: SourceFetcher + 'static> Pipeline for StatsPipeline<S, C, F> {
    async fn extract(&self) -> Result<Vec<SourceOutcome>> {
        tracing::debug!("Reading source list from: {}", self.config.sources_file());
        let data = self.storage.read_file(self.config.sources_file()).await?;
        let sources = source_list_from_bytes(&data)?;
        tracing::info!("Need to retrieve {} csv sources", sources.len());

        let scheduler = BatchScheduler::new(
            Arc::clone(&self.fetcher),
            self.config.max_concurrency(),
            self.config.schedule_mode(),
        );
        Ok(scheduler.run(sources).await)
    }

    async fn transform(&self, outcomes: Vec<SourceOutcome>) -> Result<AggregateState> {
        Ok(merge_outcomes(outcomes))
    }

    async fn load(&self, state: AggregateState) -> Result<StatsReport> {
        let report = StatsReport {
            sources_total: state.sources_succeeded + state.failed_sources.len(),
            sources_succeeded: state.sources_succeeded,
            statistics: statistics::compute(&state),
            failed_sources: state.failed_sources,
            generated_at: Utc::now(),
        };

        if let Some(path) = self.config.report_path() {
            let json = serde_json::to_string_pretty(&report)?;
            tracing::debug!("Writing report ({} bytes) to {}", json.len(), path);
            self.storage.write_file(path, json.as_bytes()).await?;
        }

        Ok(report)
    }
}
