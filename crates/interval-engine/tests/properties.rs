//! Property tests for the quantified invariants the engine's algorithms are
//! expected to hold over arbitrary bounded windows, not just the handful of
//! example dates exercised by `readiness.rs`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use interval_engine::IntervalSet;
use proptest::prelude::*;

fn epoch_day(n: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).unwrap() + Duration::days(n)
}

fn daily_set_days(start_day: i64, span_days: i64) -> IntervalSet {
    IntervalSet::new("@daily", epoch_day(start_day), epoch_day(start_day + span_days)).unwrap()
}

proptest! {
    /// The generated sequence is strictly ascending and contiguous: each
    /// interval's end equals the next one's start, with no gaps or overlaps.
    #[test]
    fn data_intervals_are_contiguous(start_day in 0i64..365, span_days in 1i64..60) {
        let set = daily_set_days(start_day, span_days);
        let intervals = set.data_intervals();
        for pair in intervals.windows(2) {
            prop_assert_eq!(pair[0].end, pair[1].start);
            prop_assert!(pair[0].start < pair[0].end);
        }
    }

    /// ready() is monotonic: advancing current_time never shrinks the ready set.
    #[test]
    fn ready_is_monotonic_in_current_time(
        start_day in 0i64..365,
        span_days in 2i64..60,
        t1_offset in 0i64..60,
        t2_offset in 0i64..60,
    ) {
        let set = daily_set_days(start_day, span_days);
        let t1 = epoch_day(start_day) + Duration::days(t1_offset.min(t2_offset));
        let t2 = epoch_day(start_day) + Duration::days(t1_offset.max(t2_offset));

        let ready_early = set.ready(t1);
        let ready_late = set.ready(t2);

        prop_assert!(ready_early.len() <= ready_late.len());
        for interval in &ready_early {
            prop_assert!(ready_late.contains(interval));
        }
    }

    /// Without lookback, missing() is always a subset of ready() and
    /// contains exactly the not-present entries.
    #[test]
    fn missing_without_lookback_is_ready_filtered_by_presence(
        start_day in 0i64..365,
        span_days in 1i64..30,
        current_offset in 0i64..30,
    ) {
        let set = daily_set_days(start_day, span_days);
        let current_time = epoch_day(start_day) + Duration::days(current_offset);

        let ready = set.ready(current_time);
        let missing = set.missing(Some(current_time), 0, None).unwrap();

        prop_assert_eq!(missing.len(), ready.iter().filter(|i| i.missing).count());
        for interval in &missing {
            prop_assert!(ready.contains(interval));
            prop_assert!(interval.missing);
        }
    }

    /// Marking the same range present twice is the same as marking it once.
    #[test]
    fn mark_present_ranges_is_idempotent(
        start_day in 0i64..365,
        span_days in 2i64..30,
        present_from in 0i64..30,
        present_span in 1i64..15,
    ) {
        let set_once = daily_set_days(start_day, span_days);
        let set_twice = daily_set_days(start_day, span_days);

        let range = (
            (epoch_day(start_day) + Duration::days(present_from)).timestamp(),
            (epoch_day(start_day) + Duration::days(present_from + present_span)).timestamp(),
        );

        set_once.mark_present_ranges(&[range]);
        set_twice.mark_present_ranges(&[range]);
        set_twice.mark_present_ranges(&[range]);

        let end = epoch_day(start_day + span_days);
        prop_assert_eq!(
            set_once.missing(Some(end), 0, None).unwrap(),
            set_twice.missing(Some(end), 0, None).unwrap()
        );
    }

    /// Lookback never pulls in more than `lookback` predecessors of the
    /// earliest post-collapse missing interval, plus that interval's own
    /// span forward to the cutoff.
    #[test]
    fn lookback_cap_bounds_how_far_missing_can_extend_backward(
        start_day in 0i64..365,
        span_days in 3i64..30,
        lookback in 0u32..10,
    ) {
        let set = daily_set_days(start_day, span_days);
        let end = epoch_day(start_day + span_days);
        let missing = set.missing(Some(end), lookback, None).unwrap();

        if let Some(earliest) = missing.iter().map(|i| i.start).min() {
            prop_assert!(earliest >= set.start);
        }
    }
}
