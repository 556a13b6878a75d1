use thiserror::Error;

/// Run-level failures. Anything in here stops the run before or after the
/// fetch phase; per-source and per-row problems use [`SourceError`] and
/// [`RowError`] instead.
#[derive(Error, Debug)]
pub enum StatsError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StatsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StatsError::ConfigError { .. }
            | StatsError::MissingConfigError { .. }
            | StatsError::InvalidConfigValueError { .. }
            | StatsError::TomlError(_) => ErrorCategory::Configuration,
            StatsError::IoError(_) => ErrorCategory::Io,
            StatsError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StatsError::ConfigError { .. } => {
                "Check that the source list names at least one URL"
            }
            StatsError::MissingConfigError { .. } => "Provide the missing setting",
            StatsError::InvalidConfigValueError { .. } => {
                "Adjust the value to the allowed range and rerun"
            }
            StatsError::TomlError(_) => "Fix the syntax of the TOML config file",
            StatsError::IoError(_) => "Make sure the file exists and is readable",
            StatsError::SerializationError(_) => "Check the report output path",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Io => format!("Could not access a file: {}", self),
            ErrorCategory::Data => format!("Could not process results: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StatsError>;

/// Why a single source was excluded from aggregation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("invalid source URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("HTTP request failed: {reason}")]
    Transport { reason: String },

    #[error("HTTP request returned status {status}")]
    Status { status: u16 },

    #[error("payload is not valid CSV: {reason}")]
    Decode { reason: String },

    #[error("payload contains no rows")]
    EmptyPayload,

    #[error("fetch task did not complete: {reason}")]
    TaskFailed { reason: String },
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Transport {
            reason: err.to_string(),
        }
    }
}

impl From<csv::Error> for SourceError {
    fn from(err: csv::Error) -> Self {
        SourceError::Decode {
            reason: err.to_string(),
        }
    }
}

/// Why a single row was skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("row {row} is malformed: expected 3 fields, found {fields}")]
    MalformedRow { row: usize, fields: usize },

    #[error("row {row} does not have a valid value for age: '{value}'")]
    InvalidAge { row: usize, value: String },
}
