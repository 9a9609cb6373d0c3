// file: src/extractor/infer.rs
// description: column type inference over raw CSV cells
// reference: data-driven schema detection

use crate::models::{Column, ColumnData};
use chrono::{NaiveDate, NaiveDateTime};

/// Timestamp formats accepted for date-time inference, tried in order.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Markers treated as missing values, compared case-insensitively.
const MISSING_MARKERS: &[&str] = &["", "na", "n/a", "null", "nan"];

pub fn is_missing(cell: &str) -> bool {
    let trimmed = cell.trim();
    MISSING_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
}

fn parse_numeric(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_datetime(cell: &str) -> Option<NaiveDateTime> {
    let trimmed = cell.trim();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Infers one typed column from raw cells.
///
/// A column is numeric when every non-missing cell parses as a finite float,
/// date-time when every non-missing cell parses under the fixed format set,
/// otherwise categorical. An all-missing column is categorical.
pub fn infer_column(name: &str, cells: &[String]) -> Column {
    let present: Vec<&str> = cells
        .iter()
        .map(|c| c.as_str())
        .filter(|c| !is_missing(c))
        .collect();

    if !present.is_empty() && present.iter().all(|c| parse_numeric(c).is_some()) {
        let values = cells
            .iter()
            .map(|c| {
                if is_missing(c) {
                    None
                } else {
                    parse_numeric(c)
                }
            })
            .collect();
        return Column::new(name, ColumnData::Numeric(values));
    }

    if !present.is_empty() && present.iter().all(|c| parse_datetime(c).is_some()) {
        let values = cells
            .iter()
            .map(|c| {
                if is_missing(c) {
                    None
                } else {
                    parse_datetime(c)
                }
            })
            .collect();
        return Column::new(name, ColumnData::DateTime(values));
    }

    let values = cells
        .iter()
        .map(|c| {
            if is_missing(c) {
                None
            } else {
                Some(c.trim().to_string())
            }
        })
        .collect();
    Column::new(name, ColumnData::Categorical(values))
}
