//! Entity timestamps.

use chrono::format::ParseError;
use chrono::{NaiveDateTime, Timelike, Utc};
use std::fmt;

/// Format written to representations: ISO-8601 with microsecond precision.
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Format accepted when parsing: the fractional part is optional.
const ISO_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A creation or update timestamp.
///
/// Timestamps are naive UTC datetimes truncated to microsecond precision,
/// so a value always survives the round trip through its ISO-8601 string
/// form unchanged. Microsecond resolution keeps sequential constructions
/// observably ordered at well under 100ms spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Returns the current UTC time, truncated to microseconds.
    #[must_use]
    pub fn now() -> Self {
        let now = Utc::now().naive_utc();
        let truncated = now
            .with_nanosecond(now.nanosecond() / 1_000 * 1_000)
            .unwrap_or(now);
        Self(truncated)
    }

    /// Renders the timestamp in its ISO-8601 representation form.
    #[must_use]
    pub fn to_iso(self) -> String {
        self.0.format(ISO_FORMAT).to_string()
    }

    /// Parses a timestamp from its ISO-8601 representation form.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not a valid ISO-8601 datetime.
    pub fn parse_iso(value: &str) -> Result<Self, ParseError> {
        NaiveDateTime::parse_from_str(value, ISO_PARSE_FORMAT).map(Self)
    }

    /// Returns the underlying naive UTC datetime.
    #[must_use]
    pub fn as_naive(self) -> NaiveDateTime {
        self.0
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self(value)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso())
    }
}
