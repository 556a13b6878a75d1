use crate::utils::error::SourceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A row that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRecord {
    pub age: i64,
    pub name: String,
}

/// Frequency distribution and representative names for one source.
///
/// `names` holds an entry for every key of `counts`: the name of the first
/// accepted record with that age.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerSourceResult {
    pub counts: BTreeMap<i64, u64>,
    pub names: BTreeMap<i64, String>,
    pub rows_rejected: usize,
}

impl PerSourceResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: ValidatedRecord) {
        *self.counts.entry(record.age).or_insert(0) += 1;
        self.names.entry(record.age).or_insert(record.name);
    }

    pub fn total_records(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// What one fetch task hands back to the scheduler.
#[derive(Debug, Clone)]
pub struct SourceOutcome {
    /// Position of the source in the (filtered) source list.
    pub index: usize,
    pub source: String,
    pub result: std::result::Result<PerSourceResult, SourceError>,
}

impl SourceOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Counts and names merged across every successful source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateState {
    pub counts: BTreeMap<i64, u64>,
    pub names: BTreeMap<i64, String>,
    pub failed_sources: Vec<String>,
    pub sources_succeeded: usize,
}

impl AggregateState {
    pub fn total_records(&self) -> u64 {
        self.counts.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Median {
    /// Median age; for an even total with distinct boundary ages this is the
    /// truncated integer average of the two.
    pub age: i64,
    /// Precise average of the two boundary ages.
    pub exact: f64,
    pub low: i64,
    pub high: i64,
    /// `None` when `age` is not itself a key of the distribution.
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Statistics {
    NoData,
    Summary {
        total_records: u64,
        mean: f64,
        median: Median,
    },
}

impl Statistics {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Statistics::NoData)
    }
}

/// Final result handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsReport {
    pub sources_total: usize,
    pub sources_succeeded: usize,
    pub failed_sources: Vec<String>,
    pub statistics: Statistics,
    pub generated_at: DateTime<Utc>,
}

impl StatsReport {
    pub fn no_data(&self) -> bool {
        self.statistics.is_no_data()
    }
}

/// How fetch tasks are released onto the runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    /// Semaphore-gated pool: a new fetch starts as soon as a slot frees up.
    #[default]
    Window,
    /// Fixed waves of at most `W` fetches; each wave waits for its slowest task.
    Wave,
}

impl std::fmt::Display for ScheduleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScheduleMode::Window => write!(f, "window"),
            ScheduleMode::Wave => write!(f, "wave"),
        }
    }
}
