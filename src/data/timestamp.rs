use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use super::error::DataError;

/// Accepted layouts, tried in order. All are timezone-naive.
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a timestamp cell.
///
/// Blank text is an absent value (`Ok(None)`); a date without a time of day
/// resolves to midnight. Anything else that does not parse is an error.
pub fn parse_timestamp(text: &str) -> Result<Option<NaiveDateTime>, DataError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Some(ts));
        }
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(Some)
        .ok_or_else(|| DataError::InvalidTimestamp {
            value: text.to_string(),
        })
}

/// Convert epoch milliseconds, as written by `df.to_json()` for datetime
/// columns, to a naive timestamp.
pub fn from_epoch_millis(millis: i64) -> Result<NaiveDateTime, DataError> {
    DateTime::from_timestamp_millis(millis)
        .map(|ts| ts.naive_utc())
        .ok_or_else(|| DataError::InvalidTimestamp {
            value: millis.to_string(),
        })
}

/// Timestamp cells are text in CSV exports and epoch milliseconds in
/// records-oriented JSON.
#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampCell {
    Millis(i64),
    Text(String),
}

/// `serde` adapter for optional timestamp columns (`null` or blank → `None`).
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let cell: Option<TimestampCell> = Option::deserialize(deserializer)?;
    let parsed = match cell {
        Some(TimestampCell::Millis(millis)) => from_epoch_millis(millis).map(Some),
        Some(TimestampCell::Text(text)) => parse_timestamp(&text),
        None => Ok(None),
    };
    parsed.map_err(serde::de::Error::custom)
}
