use chrono::{DateTime, NaiveDateTime, Timelike};
use thiserror::Error;

/// Timestamp layouts documented by the upstream APIs we read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// Twitter v1.1 `created_at`, e.g. `Wed Oct 10 20:19:24 +0000 2018`
    TwitterV1,
    /// Twitter v2 `created_at`, e.g. `2018-10-10T20:19:24.000Z`
    Iso8601Millis,
    /// MediaWiki `timestamp`, e.g. `2018-10-10T20:19:24Z`
    Iso8601Utc,
    /// Facebook Graph `created_time`, e.g. `2018-10-10T20:19:24+0000`
    Iso8601Offset,
}

impl TimestampFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            TimestampFormat::TwitterV1 => "%a %b %d %H:%M:%S %z %Y",
            TimestampFormat::Iso8601Millis => "%Y-%m-%dT%H:%M:%S%.fZ",
            TimestampFormat::Iso8601Utc => "%Y-%m-%dT%H:%M:%SZ",
            TimestampFormat::Iso8601Offset => "%Y-%m-%dT%H:%M:%S%z",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("timestamp {raw:?} does not match {pattern:?}: {source}")]
pub struct TimestampError {
    pub raw: String,
    pub pattern: String,
    source: chrono::ParseError,
}

/// Parse a source timestamp into a naive date-time with second precision.
pub fn normalize(raw: &str, format: TimestampFormat) -> Result<NaiveDateTime, TimestampError> {
    normalize_with_pattern(raw, format.pattern())
}

/// Same as [`normalize`] for an arbitrary chrono pattern.
///
/// The offset is dropped without converting: the wall-clock value as written
/// by the source is what comes back.
pub fn normalize_with_pattern(raw: &str, pattern: &str) -> Result<NaiveDateTime, TimestampError> {
    let parsed = if has_offset(pattern) {
        DateTime::parse_from_str(raw, pattern).map(|dt| dt.naive_local())
    } else {
        NaiveDateTime::parse_from_str(raw, pattern)
    };

    let parsed = parsed.map_err(|source| TimestampError {
        raw: raw.to_string(),
        pattern: pattern.to_string(),
        source,
    })?;

    Ok(parsed.with_nanosecond(0).unwrap_or(parsed))
}

fn has_offset(pattern: &str) -> bool {
    pattern.contains("%z") || pattern.contains("%:z") || pattern.contains("%#z")
}
