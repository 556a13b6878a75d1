use crate::domain::model::ValidatedRecord;
use crate::utils::error::RowError;
use csv::StringRecord;

const FIELDS_PER_ROW: usize = 3;

/// Validate one decoded row.
///
/// `row` is the zero-based position of the row in the payload, counting the
/// header as row 0. It is only used for diagnostics.
pub fn parse_row(record: &StringRecord, row: usize) -> Result<ValidatedRecord, RowError> {
    if record.len() != FIELDS_PER_ROW {
        return Err(RowError::MalformedRow {
            row,
            fields: record.len(),
        });
    }

    let first = record[0].trim();
    let last = record[1].trim();
    let age_text = record[2].trim();

    let age = age_text
        .parse::<i64>()
        .map_err(|_| RowError::InvalidAge {
            row,
            value: age_text.to_string(),
        })?;

    Ok(ValidatedRecord {
        age,
        name: format!("{} {}", first, last),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_parse_valid_row_trims_fields() {
        let record = parse_row(&row(&["  Ada ", "Lovelace  ", " 36 "]), 1).unwrap();
        assert_eq!(record.age, 36);
        assert_eq!(record.name, "Ada Lovelace");
    }

    #[test]
    fn test_negative_and_zero_ages_are_accepted() {
        assert_eq!(parse_row(&row(&["A", "B", "-4"]), 1).unwrap().age, -4);
        assert_eq!(parse_row(&row(&["A", "B", "0"]), 2).unwrap().age, 0);
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let err = parse_row(&row(&["Ada", "36"]), 3).unwrap_err();
        assert_eq!(err, RowError::MalformedRow { row: 3, fields: 2 });

        let err = parse_row(&row(&["Ada", "Lovelace", "36", "extra"]), 5).unwrap_err();
        assert_eq!(err, RowError::MalformedRow { row: 5, fields: 4 });
    }

    #[test]
    fn test_non_integer_age_is_rejected() {
        let err = parse_row(&row(&["Ada", "Lovelace", "thirty"]), 2).unwrap_err();
        assert_eq!(
            err,
            RowError::InvalidAge {
                row: 2,
                value: "thirty".to_string()
            }
        );
        assert!(parse_row(&row(&["Ada", "Lovelace", "36.5"]), 2).is_err());
        assert!(parse_row(&row(&["Ada", "Lovelace", ""]), 2).is_err());
    }

    #[test]
    fn test_empty_name_parts_keep_single_space() {
        let record = parse_row(&row(&["", "Solo", "20"]), 1).unwrap();
        assert_eq!(record.name, " Solo");
    }
}
