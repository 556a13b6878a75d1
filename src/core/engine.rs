use crate::core::{Pipeline, Statistics, StatsReport};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives a [`Pipeline`] through its three phases.
pub struct StatsEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> StatsEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<StatsReport> {
        tracing::info!("Starting statistics run");
        self.monitor.log_stats("Start");

        // Fetch
        let outcomes = self.pipeline.extract().await?;
        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        tracing::info!(
            "Fetched {} sources ({} failed)",
            outcomes.len(),
            failed
        );
        self.monitor.log_stats("Fetch");

        // Merge
        let state = self.pipeline.transform(outcomes).await?;
        tracing::info!(
            "Merged {} records across {} distinct ages",
            state.total_records(),
            state.counts.len()
        );
        self.monitor.log_stats("Merge");

        // Statistics
        let report = self.pipeline.load(state).await?;
        match &report.statistics {
            Statistics::NoData => tracing::warn!("No records were aggregated"),
            Statistics::Summary { mean, median, .. } => {
                tracing::info!("Mean age {:.3}, median age {}", mean, median.age)
            }
        }
        self.monitor.log_final_stats();

        Ok(report)
    }
}
