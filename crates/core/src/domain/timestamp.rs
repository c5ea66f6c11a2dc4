// Timestamp normalization for device last-seen values
//
// The inventory service does not commit to one timestamp shape. Every accepted
// shape is tried in a fixed order and the first that parses wins; offsets are
// folded into UTC so all instants compare on one naive-UTC scale.

use chrono::{DateTime, NaiveDateTime};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("Empty timestamp")]
    Empty,

    #[error("Unrecognized timestamp format: {0}")]
    FormatUnrecognized(String),
}

/// `01/31/2023 04:05:06 PM`
const LOCALE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";
/// `2023-01-31T16:05:06Z`
const ISO_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
/// `2023-01-31T16:05:06+0100`
const ISO_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";
/// `2023-01-31T16:05:06+01:00`
const ISO_COLON_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

type Attempt = fn(&str) -> Option<NaiveDateTime>;

/// Parse attempts in priority order
const ATTEMPTS: [Attempt; 4] = [
    parse_locale,
    parse_iso_utc,
    parse_iso_offset,
    parse_iso_colon_offset,
];

fn parse_locale(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, LOCALE_FORMAT).ok()
}

fn parse_iso_utc(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, ISO_UTC_FORMAT).ok()
}

fn parse_iso_offset(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_str(s, ISO_OFFSET_FORMAT)
        .ok()
        .map(|dt| dt.naive_utc())
}

fn parse_iso_colon_offset(s: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_str(s, ISO_COLON_OFFSET_FORMAT)
        .ok()
        .map(|dt| dt.naive_utc())
}

/// Normalize a device timestamp into a naive UTC instant
///
/// # Errors
/// - `TimestampError::Empty` for blank input
/// - `TimestampError::FormatUnrecognized` when no accepted shape matches
///
/// # Example
/// ```text
/// let a = parse_timestamp("2023-01-01T00:00:00Z")?;
/// let b = parse_timestamp("01/01/2023 12:00:00 AM")?;
/// assert_eq!(a, b);
/// ```
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::Empty);
    }

    ATTEMPTS
        .iter()
        .find_map(|attempt| attempt(trimmed))
        .ok_or_else(|| TimestampError::FormatUnrecognized(raw.to_string()))
}
