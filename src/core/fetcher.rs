use crate::core::parser::parse_row;
use crate::domain::model::{PerSourceResult, SourceOutcome};
use crate::domain::ports::SourceFetcher;
use crate::utils::error::SourceError;
use csv::{ByteRecord, ReaderBuilder, StringRecord, Trim};

/// Decode a CSV payload and fold its rows into a [`PerSourceResult`].
///
/// The first row is a header and is dropped without looking at it. Rows that
/// fail validation are counted and skipped; only an unreadable or empty
/// payload fails the source. Fields are not required to be UTF-8: invalid
/// bytes are replaced with U+FFFD.
pub fn aggregate_payload(source: &str, payload: &[u8]) -> Result<PerSourceResult, SourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::None)
        .from_reader(payload);

    let rows = reader
        .byte_records()
        .collect::<std::result::Result<Vec<ByteRecord>, csv::Error>>()?;

    if rows.is_empty() {
        return Err(SourceError::EmptyPayload);
    }

    let mut result = PerSourceResult::new();
    for (row, record) in rows.iter().enumerate().skip(1) {
        match parse_row(&lossy_record(record), row) {
            Ok(validated) => result.add(validated),
            Err(e) => {
                tracing::warn!("Skipping row in {}: {}", source, e);
                result.rows_rejected += 1;
            }
        }
    }

    tracing::debug!(
        "Aggregated {} records ({} rejected) from {}",
        result.total_records(),
        result.rows_rejected,
        source
    );

    Ok(result)
}

fn lossy_record(record: &ByteRecord) -> StringRecord {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

/// Fetch one source and classify it as succeeded or failed.
pub async fn process_source<F>(fetcher: &F, index: usize, source: String) -> SourceOutcome
where
    F: SourceFetcher + ?Sized,
{
    tracing::info!("Retrieving data from: {}", source);

    let result = match fetcher.fetch(&source).await {
        Ok(payload) => aggregate_payload(&source, &payload),
        Err(e) => Err(e),
    };

    if let Err(e) = &result {
        tracing::warn!("Source {} failed: {}", source, e);
    }

    SourceOutcome {
        index,
        source,
        result,
    }
}
