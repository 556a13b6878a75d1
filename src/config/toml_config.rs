use crate::core::scheduler::DEFAULT_MAX_CONCURRENCY;
use crate::core::{ConfigProvider, ScheduleMode};
use crate::utils::error::{Result, StatsError};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_range, validate_required_field, Validate,
    MAX_CONCURRENCY_LIMIT,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub sources: SourcesConfig,
    pub fetch: Option<FetchConfig>,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    pub list_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchConfig {
    pub max_concurrency: Option<usize>,
    pub schedule: Option<ScheduleMode>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub report_path: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replace `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| StatsError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    fn fetch(&self) -> FetchConfig {
        self.fetch.clone().unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn sources_file(&self) -> &str {
        self.sources.list_file.as_deref().unwrap_or_default()
    }

    fn max_concurrency(&self) -> usize {
        self.fetch().max_concurrency.unwrap_or(DEFAULT_MAX_CONCURRENCY)
    }

    fn schedule_mode(&self) -> ScheduleMode {
        self.fetch().schedule.unwrap_or_default()
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.fetch().timeout_seconds.map(Duration::from_secs)
    }

    fn report_path(&self) -> Option<&str> {
        self.output.as_ref().and_then(|o| o.report_path.as_deref())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let list_file = validate_required_field("sources.list_file", &self.sources.list_file)?;
        validate_path("sources.list_file", list_file)?;
        validate_range(
            "fetch.max_concurrency",
            self.max_concurrency(),
            1,
            MAX_CONCURRENCY_LIMIT,
        )?;
        if let Some(timeout) = self.fetch().timeout_seconds {
            validate_positive_number("fetch.timeout_seconds", timeout, 1)?;
        }
        if let Some(path) = self.report_path() {
            validate_path("output.report_path", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[sources]
list_file = "urls.txt"

[fetch]
max_concurrency = 20
schedule = "wave"
timeout_seconds = 15

[output]
report_path = "out/report.json"
"#,
        )
        .unwrap();

        assert_eq!(config.sources_file(), "urls.txt");
        assert_eq!(config.max_concurrency(), 20);
        assert_eq!(config.schedule_mode(), ScheduleMode::Wave);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.report_path(), Some("out/report.json"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optional_sections_use_defaults() {
        let config = TomlConfig::from_toml_str("[sources]\nlist_file = \"urls.txt\"\n").unwrap();
        assert_eq!(config.max_concurrency(), DEFAULT_MAX_CONCURRENCY);
        assert_eq!(config.schedule_mode(), ScheduleMode::Window);
        assert_eq!(config.request_timeout(), None);
        assert_eq!(config.report_path(), None);
    }

    #[test]
    fn test_missing_list_file_fails_validation() {
        let config = TomlConfig::from_toml_str("[sources]\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(StatsError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_unknown_schedule_is_a_parse_error() {
        let result = TomlConfig::from_toml_str(
            "[sources]\nlist_file = \"u\"\n[fetch]\nschedule = \"fifo\"\n",
        );
        assert!(matches!(result, Err(StatsError::TomlError(_))));
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("CSV_AGE_STATS_TEST_LIST", "from-env.txt");
        let config = TomlConfig::from_toml_str(
            "[sources]\nlist_file = \"${CSV_AGE_STATS_TEST_LIST}\"\n",
        )
        .unwrap();
        assert_eq!(config.sources_file(), "from-env.txt");

        let config = TomlConfig::from_toml_str(
            "[sources]\nlist_file = \"${CSV_AGE_STATS_TEST_UNSET_VAR}\"\n",
        )
        .unwrap();
        assert_eq!(config.sources_file(), "${CSV_AGE_STATS_TEST_UNSET_VAR}");
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[sources]\nlist_file = \"urls.txt\"\n[fetch]\nmax_concurrency = 0").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert!(config.validate().is_err());
    }
}
