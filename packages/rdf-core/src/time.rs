//! Timestamp values and their string conversions.
//!
//! A timestamp is stored as a signed 64-bit count of nanoseconds since the
//! Unix epoch, UTC. String conversion is only used for display and for
//! ingesting text, never by the record codec itself.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{RdfError, Result};

/// Nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp(0);

    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Converts a UTC datetime. Returns `None` outside the ~584 year range
    /// representable in nanoseconds.
    pub fn from_datetime(dt: DateTime<Utc>) -> Option<Self> {
        dt.timestamp_nanos_opt().map(Self)
    }

    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.0)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        // Utc::now() stays inside the nanosecond range until 2262.
        Self(Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX))
    }
}

impl From<i64> for Timestamp {
    fn from(nanos: i64) -> Self {
        Self(nanos)
    }
}

/// Parses `input` with a chrono strftime `pattern` as a UTC timestamp.
pub fn parse_timestamp(input: &str, pattern: &str) -> Result<Timestamp> {
    let naive = NaiveDateTime::parse_from_str(input, pattern).map_err(|e| RdfError::TimeParse {
        input: input.to_string(),
        format: pattern.to_string(),
        message: e.to_string(),
    })?;
    Timestamp::from_datetime(naive.and_utc()).ok_or_else(|| RdfError::TimeParse {
        input: input.to_string(),
        format: pattern.to_string(),
        message: "out of nanosecond range".to_string(),
    })
}

/// Renders `ts` with a chrono strftime `pattern`.
pub fn format_timestamp(ts: Timestamp, pattern: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", ts.to_datetime().format(pattern)).map_err(|_| RdfError::TimeFormat {
        format: pattern.to_string(),
    })?;
    Ok(out)
}
