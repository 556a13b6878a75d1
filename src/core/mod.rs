pub mod engine;
pub mod fetcher;
pub mod merger;
pub mod parser;
pub mod pipeline;
pub mod scheduler;
pub mod sources;
pub mod statistics;

pub use crate::domain::model::{
    AggregateState, Median, PerSourceResult, ScheduleMode, SourceOutcome, Statistics, StatsReport,
    ValidatedRecord,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SourceFetcher, Storage};
pub use crate::utils::error::Result;
