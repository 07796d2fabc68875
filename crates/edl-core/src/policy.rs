//! # Retention and SLA Policy Arithmetic
//!
//! Pure functions for the two pieces of policy math the ledger applies
//! everywhere: the seven-year retention horizon stamped onto evidence at
//! ingestion, and the remaining-hours figure shown on open work items.
//!
//! Both are kept out of the state machines so they can be unit tested
//! against fixed timestamps without constructing records.

use crate::error::CoreError;
use crate::temporal::Timestamp;
use crate::workflow::Priority;

/// Evidence is retained for seven years from ingestion.
pub const RETENTION_YEARS: u32 = 7;

/// Compute the retention horizon for an ingestion timestamp.
///
/// Calendar-aware: Feb 29 ingestion dates clamp to Feb 28 in the target
/// year.
///
/// # Errors
///
/// Fails only if the addition overflows chrono's representable range,
/// which cannot happen for timestamps produced by this system.
pub fn retention_end(ingested_at: &Timestamp) -> Result<Timestamp, CoreError> {
    ingested_at
        .add_months(RETENTION_YEARS * 12)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "retention horizon overflows calendar range: {ingested_at}"
            ))
        })
}

/// Default SLA window in hours for a newly created work item.
pub fn default_sla_hours(priority: Priority) -> u32 {
    match priority {
        Priority::Critical => 4,
        Priority::High => 24,
        Priority::Medium => 72,
        Priority::Low => 168,
    }
}

/// Hours remaining in an SLA window, rounded to the nearest hour and
/// clamped at zero.
///
/// An expired SLA reads `0`, never negative. A `created_at` in the future
/// (clock skew between producers) yields more than `sla_hours` rather
/// than an error.
pub fn sla_remaining_hours(sla_hours: u32, created_at: &Timestamp, now: &Timestamp) -> u32 {
    let remaining = f64::from(sla_hours) - now.hours_since(created_at);
    remaining.round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).expect("test timestamp should parse")
    }

    #[test]
    fn retention_is_seven_years() {
        let ingested = ts("2024-03-01T10:00:00Z");
        let end = retention_end(&ingested).unwrap();
        assert_eq!(end.to_iso8601(), "2031-03-01T10:00:00Z");
    }

    #[test]
    fn retention_clamps_leap_day() {
        let ingested = ts("2024-02-29T00:00:00Z");
        let end = retention_end(&ingested).unwrap();
        assert_eq!(end.to_iso8601(), "2031-02-28T00:00:00Z");
    }

    #[test]
    fn sla_defaults_by_priority() {
        assert_eq!(default_sla_hours(Priority::Critical), 4);
        assert_eq!(default_sla_hours(Priority::High), 24);
        assert_eq!(default_sla_hours(Priority::Medium), 72);
        assert_eq!(default_sla_hours(Priority::Low), 168);
    }

    #[test]
    fn sla_remaining_simple_elapsed() {
        let created = ts("2024-03-01T10:00:00Z");
        let now = ts("2024-03-01T13:00:00Z");
        assert_eq!(sla_remaining_hours(24, &created, &now), 21);
    }

    #[test]
    fn sla_remaining_rounds_to_nearest_hour() {
        let created = ts("2024-03-01T10:00:00Z");
        // 24 minutes elapsed: 71.6 remaining rounds to 72.
        let now = ts("2024-03-01T10:24:00Z");
        assert_eq!(sla_remaining_hours(72, &created, &now), 72);
        // 36 minutes elapsed: 71.4 remaining rounds to 71.
        let now = ts("2024-03-01T10:36:00Z");
        assert_eq!(sla_remaining_hours(72, &created, &now), 71);
    }

    #[test]
    fn sla_remaining_clamps_at_zero() {
        let created = ts("2024-03-01T10:00:00Z");
        let now = ts("2024-03-10T10:00:00Z");
        assert_eq!(sla_remaining_hours(4, &created, &now), 0);
    }

    #[test]
    fn sla_remaining_exactly_expired() {
        let created = ts("2024-03-01T10:00:00Z");
        let now = ts("2024-03-02T10:00:00Z");
        assert_eq!(sla_remaining_hours(24, &created, &now), 0);
    }

    #[test]
    fn future_created_at_extends_window() {
        // Clock skew: the producer stamped a creation time after "now".
        let created = ts("2024-03-01T12:00:00Z");
        let now = ts("2024-03-01T10:00:00Z");
        assert_eq!(sla_remaining_hours(24, &created, &now), 26);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// With non-negative elapsed time, remaining never exceeds the
        /// window.
        #[test]
        fn remaining_bounded_by_window(
            sla in 1u32..10_000,
            elapsed_secs in 0i64..1_000_000_000,
        ) {
            let created = Timestamp::from_unix(1_700_000_000).unwrap();
            let now = Timestamp::from_unix(1_700_000_000 + elapsed_secs).unwrap();
            prop_assert!(sla_remaining_hours(sla, &created, &now) <= sla);
        }

        /// More elapsed time never increases the remaining hours.
        #[test]
        fn remaining_monotonic(
            sla in 1u32..10_000,
            a in 0i64..500_000_000,
            delta in 0i64..500_000_000,
        ) {
            let created = Timestamp::from_unix(1_700_000_000).unwrap();
            let earlier = Timestamp::from_unix(1_700_000_000 + a).unwrap();
            let later = Timestamp::from_unix(1_700_000_000 + a + delta).unwrap();
            prop_assert!(
                sla_remaining_hours(sla, &created, &later)
                    <= sla_remaining_hours(sla, &created, &earlier)
            );
        }
    }
}
