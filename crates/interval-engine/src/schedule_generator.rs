//! Lazy materialization of a contiguous, non-overlapping interval sequence
//! from a [`CronSource`] and a bounding window.

use chrono::{DateTime, Utc};
use interval_kernel::CronSource;

use crate::interval::{epoch_to_instant, Interval};

/// Generates the list of [`Interval`]s a cron source produces over
/// `[start, end)`, pruning any partial leading interval.
///
/// ```text
/// current <- start
/// for each next produced by the source:
///     if next != current:
///         if (next - current) == expected_unit_duration:
///             emit Interval(current, next)
///     current <- next
///     if next >= end: stop
/// ```
///
/// The source's `next` is "strictly after" (see [`CronSource::next`]); the
/// very first probe uses `start - 1 second` rather than `start` so that an
/// already-aligned `start` can still be returned as the first tick, matching
/// the inclusive-on-first-call behavior of a stateful cron cursor seeded at
/// `start` without needing the source itself to be stateful.
pub struct ScheduleGenerator;

impl ScheduleGenerator {
    pub fn generate(source: &dyn CronSource, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Interval> {
        let mut intervals = Vec::new();
        let expected_duration = source.interval_seconds();

        let mut current = start;
        let mut probe = start.timestamp() - 1;

        while let Some(next_epoch) = source.next(probe) {
            let next = epoch_to_instant(next_epoch);

            if next != current {
                let generated_seconds = (next - current).num_seconds();
                if generated_seconds == expected_duration {
                    intervals.push(Interval::new(current, next));
                }
            }

            current = next;
            probe = current.timestamp();

            if next >= end {
                break;
            }
        }

        intervals
    }
}
