// src/gate.rs

use chrono::{DateTime, Utc};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Hours elapsed between `since` and `now`. Negative if `since` is in the future.
pub fn hours_since(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - since).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Decides whether the active region is due for another collection pass.
///
/// A region that has never been queried is always due. Otherwise it is due once
/// the elapsed time reaches the interval; landing exactly on the interval counts.
pub fn should_query_now(
    last_queried_at: Option<DateTime<Utc>>,
    interval_hours: f64,
    now: DateTime<Utc>,
) -> bool {
    match last_queried_at {
        None => true,
        Some(last) => hours_since(last, now) >= interval_hours,
    }
}

/// Hours left before the gate opens. Zero when already due.
pub fn hours_remaining(
    last_queried_at: Option<DateTime<Utc>>,
    interval_hours: f64,
    now: DateTime<Utc>,
) -> f64 {
    match last_queried_at {
        None => 0.0,
        Some(last) => (interval_hours - hours_since(last, now)).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, h, m, 0).unwrap()
    }

    #[test]
    fn never_queried_is_always_due() {
        for interval in [0.0, 0.5, 1.3, 24.0, 10_000.0] {
            assert!(should_query_now(None, interval, at(9, 0)));
        }
    }

    #[test]
    fn due_when_elapsed_exceeds_interval() {
        assert!(should_query_now(Some(at(6, 0)), 2.5, at(9, 0)));
    }

    #[test]
    fn not_due_before_interval() {
        assert!(!should_query_now(Some(at(8, 0)), 1.5, at(9, 0)));
    }

    #[test]
    fn exact_boundary_is_due() {
        let last = at(7, 15);
        let now = last + Duration::minutes(90);
        assert!(should_query_now(Some(last), 1.5, now));
        assert!(!should_query_now(Some(last), 1.5, now - Duration::milliseconds(1)));
    }

    #[test]
    fn gate_matches_elapsed_comparison() {
        let last = at(0, 0);
        for elapsed_min in [0_i64, 30, 59, 60, 61, 120, 719, 720, 1440] {
            let now = last + Duration::minutes(elapsed_min);
            for interval in [0.0, 1.0, 2.0, 12.0] {
                let expected = elapsed_min as f64 / 60.0 >= interval;
                assert_eq!(should_query_now(Some(last), interval, now), expected);
            }
        }
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        let last = at(8, 0);
        assert!((hours_remaining(Some(last), 2.0, at(8, 30)) - 1.5).abs() < 1e-9);
        assert_eq!(hours_remaining(Some(last), 2.0, at(11, 0)), 0.0);
        assert_eq!(hours_remaining(None, 2.0, at(11, 0)), 0.0);
    }
}
