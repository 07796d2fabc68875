//! # Temporal Types — UTC Timestamps With Defined Precision
//!
//! The ledger records ingestion times, seal times, transition times, and
//! retention horizons. All of them use the one `Timestamp` type defined
//! here.
//!
//! ## Design Decision: UTC Only, Seconds Precision
//!
//! Timestamps are UTC with sub-second precision truncated away. Two
//! producers recording "the same moment" must canonicalize to the same
//! string, and audit-chain hashes depend on it. Offset-bearing inputs are
//! rejected by the strict parser rather than silently normalized; the
//! lenient parser exists for operator-supplied filters, not for stored
//! data.

use std::fmt;

use chrono::{DateTime, Months, SecondsFormat, TimeZone, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// A UTC timestamp truncated to whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current time, truncated to seconds.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    /// Wrap a chrono datetime, truncating sub-second precision.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        // with_nanosecond(0) only fails for leap-second nanos >= 2e9,
        // which chrono never produces from a valid datetime.
        Self(dt.with_nanosecond(0).unwrap_or(dt))
    }

    /// Build from unix seconds.
    pub fn from_unix(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Strict parser: requires the `Z` suffix, rejects numeric offsets.
    ///
    /// Stored timestamps must round-trip byte-identically through
    /// canonicalization, so only the exact serialized form is accepted.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::Validation(format!(
                "timestamp must be UTC with Z suffix: {s}"
            )));
        }
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CoreError::Validation(format!("invalid timestamp {s}: {e}")))?;
        Ok(Self::from_datetime(dt.with_timezone(&Utc)))
    }

    /// Lenient parser for operator input: accepts any RFC 3339 form and
    /// normalizes to UTC.
    pub fn parse_lenient(s: &str) -> Result<Self, CoreError> {
        let dt = DateTime::parse_from_rfc3339(s)
            .map_err(|e| CoreError::Validation(format!("invalid timestamp {s}: {e}")))?;
        Ok(Self::from_datetime(dt.with_timezone(&Utc)))
    }

    /// Canonical serialized form: `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// The wrapped chrono datetime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Calendar-aware month addition; used for retention horizons.
    pub fn add_months(&self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(Self)
    }

    /// Whole seconds elapsed from `earlier` to `self`. Negative when
    /// `self` precedes `earlier`.
    pub fn seconds_since(&self, earlier: &Timestamp) -> i64 {
        (self.0 - earlier.0).num_seconds()
    }

    /// Fractional hours elapsed from `earlier` to `self`.
    pub fn hours_since(&self, earlier: &Timestamp) -> f64 {
        self.seconds_since(earlier) as f64 / 3600.0
    }

    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(serde::de::Error::custom)
    }
}
