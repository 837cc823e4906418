//! # Timestamp Handling
//!
//! All Attestia timestamps are RFC 3339 UTC with millisecond precision.
//! Normalization happens at this boundary: a local-time leak would break
//! canonicalization equality across processes.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Format a UTC instant as RFC 3339 with exactly millisecond precision.
///
/// Example output: `2025-06-15T00:00:00.000Z`.
pub fn format_rfc3339_millis(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp, normalizing any offset to UTC.
pub fn parse_rfc3339_utc(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

/// Milliseconds since the Unix epoch for an instant.
pub fn epoch_millis(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

/// Abstract time source, so domain code stays deterministic under test.
pub trait Clock: Send + Sync {
    /// Current instant in UTC.
    fn now(&self) -> DateTime<Utc>;

    /// Current instant rendered in the canonical wire form.
    fn now_rfc3339(&self) -> String {
        format_rfc3339_millis(self.now())
    }
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    instant: DateTime<Utc>,
}

impl FixedClock {
    /// Pin the clock to the given epoch milliseconds.
    pub fn at_epoch_millis(millis: i64) -> Self {
        Self {
            instant: Utc.timestamp_millis_opt(millis).single().unwrap_or_default(),
        }
    }

    /// Pin the clock to a parsed RFC 3339 instant.
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { instant }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }
}
