//! Timestamp parsing at the ingestion boundary.
//!
//! Devices and legacy registries hand us two textual encodings: ISO 8601
//! (`2024-05-01T08:30:00`, optionally with fraction and offset) and a
//! space-separated `2024-05-01 08:30:00`. Both normalize to `DateTime<Utc>`;
//! the core never sees text.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{Error, Result};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a textual timestamp. Naive values are taken as UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    // RFC 3339 requires the `T`; accept a space-separated value with offset too.
    if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::InvalidTimestamp(input.to_string()))
}

/// Elapsed seconds from `earlier` to `later`, with sub-second precision.
///
/// Negative when `later` precedes `earlier`.
pub fn seconds_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let delta = later - earlier;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}
