use crate::core::scheduler::DEFAULT_MAX_CONCURRENCY;
use crate::core::{ConfigProvider, ScheduleMode};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_range, validate_required_field, Validate,
    MAX_CONCURRENCY_LIMIT,
};
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "csv-age-stats")]
#[command(about = "Mean and median age across a list of remote CSV sources")]
pub struct CliConfig {
    /// File with one source URL per line
    #[arg(required_unless_present = "config")]
    pub sources_file: Option<String>,

    /// Upper bound on concurrent fetches
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    #[arg(long, value_enum, default_value_t = ScheduleMode::Window)]
    pub schedule: ScheduleMode,

    /// Per-request timeout; requests wait indefinitely when unset
    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Write the result as JSON to this path
    #[arg(long)]
    pub output: Option<String>,

    /// Load settings from a TOML file instead of the flags above
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory per phase")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn sources_file(&self) -> &str {
        self.sources_file.as_deref().unwrap_or_default()
    }

    fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    fn schedule_mode(&self) -> ScheduleMode {
        self.schedule
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn report_path(&self) -> Option<&str> {
        self.output.as_deref()
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let sources_file = validate_required_field("sources_file", &self.sources_file)?;
        validate_path("sources_file", sources_file)?;
        validate_range("max_concurrency", self.max_concurrency, 1, MAX_CONCURRENCY_LIMIT)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::try_parse_from(["csv-age-stats", "urls.txt"]).unwrap();
        assert_eq!(config.sources_file(), "urls.txt");
        assert_eq!(config.max_concurrency(), 100);
        assert_eq!(config.schedule_mode(), ScheduleMode::Window);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.report_path(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags() {
        let config = CliConfig::try_parse_from([
            "csv-age-stats",
            "urls.txt",
            "--max-concurrency",
            "8",
            "--schedule",
            "wave",
            "--timeout-seconds",
            "30",
            "--output",
            "report.json",
        ])
        .unwrap();
        assert_eq!(config.max_concurrency(), 8);
        assert_eq!(config.schedule_mode(), ScheduleMode::Wave);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.report_path(), Some("report.json"));
    }

    #[test]
    fn test_sources_file_required_without_config() {
        assert!(CliConfig::try_parse_from(["csv-age-stats"]).is_err());
        assert!(CliConfig::try_parse_from(["csv-age-stats", "--config", "stats.toml"]).is_ok());
    }

    #[test]
    fn test_out_of_range_concurrency_fails_validation() {
        let config =
            CliConfig::try_parse_from(["csv-age-stats", "urls.txt", "--max-concurrency", "0"])
                .unwrap();
        assert!(config.validate().is_err());
    }
}
