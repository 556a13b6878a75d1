use crate::utils::error::{Result, StatsError};

/// Split a newline-separated source list into trimmed identifiers.
///
/// Blank lines are dropped rather than dispatched as failing sources. A list
/// without a single identifier is a configuration error.
pub fn parse_source_list(buffer: &str) -> Result<Vec<String>> {
    if buffer.is_empty() {
        return Err(StatsError::ConfigError {
            message: "source list does not contain any data".to_string(),
        });
    }

    let sources: Vec<String> = buffer
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if sources.is_empty() {
        return Err(StatsError::ConfigError {
            message: "source list contains only blank lines".to_string(),
        });
    }

    Ok(sources)
}

/// Decode a raw source-list file and parse it.
pub fn source_list_from_bytes(data: &[u8]) -> Result<Vec<String>> {
    let buffer = std::str::from_utf8(data).map_err(|e| StatsError::ConfigError {
        message: format!("source list is not valid UTF-8: {}", e),
    })?;
    parse_source_list(buffer)
}
