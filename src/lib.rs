pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::{http::HttpFetcher, storage::LocalStorage};
pub use core::{engine::StatsEngine, pipeline::StatsPipeline};
pub use domain::model::{Median, ScheduleMode, Statistics, StatsReport};
pub use utils::error::{Result, StatsError};
