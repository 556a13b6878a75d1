use crate::domain::model::{AggregateState, ScheduleMode, SourceOutcome, StatsReport};
use crate::utils::error::{Result, SourceError};
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn sources_file(&self) -> &str;
    fn max_concurrency(&self) -> usize;
    fn schedule_mode(&self) -> ScheduleMode;
    fn request_timeout(&self) -> Option<Duration>;
    fn report_path(&self) -> Option<&str>;
}

/// Retrieves the raw payload of one source.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    async fn fetch(&self, source: &str) -> std::result::Result<Vec<u8>, SourceError>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceOutcome>>;
    async fn transform(&self, outcomes: Vec<SourceOutcome>) -> Result<AggregateState>;
    async fn load(&self, state: AggregateState) -> Result<StatsReport>;
}
