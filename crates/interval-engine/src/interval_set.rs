//! Owns the cron-fire and data-unit interval sequences for a bounded window
//! and answers readiness, presence, and missing-interval queries.

use std::collections::HashSet;
use std::sync::{OnceLock, RwLock};

use chrono::{DateTime, Utc};
use interval_kernel::{CronSource, IntervalError, IntervalUnit, PrimitiveInterval};

use crate::cron_source::{CronExpressionSource, UnitGridSource};
use crate::interval::{epoch_to_instant, Interval};
use crate::schedule_generator::ScheduleGenerator;

/// A contiguous set of cron-driven and data-unit-aligned intervals over
/// `[start, end)`.
///
/// Construction derives the data-alignment unit from the cron expression
/// (`0 12 * * *` derives [`IntervalUnit::Day`], not hourly, because its data
/// unit is a midnight-aligned day despite firing at noon). `cron_intervals`
/// and `data_intervals` are generated lazily on first access and cached for
/// the lifetime of the set.
///
/// Presence tracking (`mark_present*`) is interior-mutable so queries can be
/// issued through a shared `&IntervalSet`; per the engine's concurrency
/// model this is only safe to mutate single-threaded, but safe to read
/// concurrently once all `mark_present*` calls have completed.
pub struct IntervalSet {
    pub cron: String,
    pub interval_unit: IntervalUnit,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    cron_source: CronExpressionSource,
    data_source: UnitGridSource,
    cron_intervals: OnceLock<Vec<Interval>>,
    data_intervals: OnceLock<Vec<Interval>>,
    /// Indices into the canonical `data_intervals` cache that have been
    /// marked present. The canonical cache itself is never mutated — see the
    /// module docs' design note on keeping interval values immutable.
    present: RwLock<HashSet<usize>>,
}

impl IntervalSet {
    /// Construct a new set over `[start, end)`.
    ///
    /// # Errors
    ///
    /// [`IntervalError::InvalidBounds`] if `end < start`. [`IntervalError::InvalidCron`]
    /// if the cron collaborator rejects `cron` or it does not resolve to a
    /// supported data-alignment unit.
    pub fn new(cron: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, IntervalError> {
        let cron = cron.into();
        if end < start {
            return Err(IntervalError::InvalidBounds { start: start.timestamp(), end: end.timestamp() });
        }

        let interval_unit = IntervalUnit::from_cron(&cron)?;
        let cron_source = CronExpressionSource::new(&cron)?;
        let data_source = UnitGridSource::new(interval_unit);

        tracing::debug!(%cron, ?interval_unit, %start, %end, "constructing IntervalSet");

        Ok(Self {
            cron,
            interval_unit,
            start,
            end,
            cron_source,
            data_source,
            cron_intervals: OnceLock::new(),
            data_intervals: OnceLock::new(),
            present: RwLock::new(HashSet::new()),
        })
    }

    /// Generates an `IntervalSet` covering the full range of the input
    /// ranges. Gaps between the ranges surface as missing data intervals.
    ///
    /// `start`/`end` default to the min/max bound of `ranges` when omitted.
    pub fn from_compacted(
        cron: impl Into<String>,
        ranges: &[PrimitiveInterval],
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, IntervalError> {
        let start = match start {
            Some(s) => s,
            None => ranges
                .iter()
                .map(|&(s, _)| epoch_to_instant(s))
                .min()
                .ok_or(IntervalError::EmptyCompactedRanges)?,
        };
        let end = match end {
            Some(e) => e,
            None => ranges
                .iter()
                .map(|&(_, e)| epoch_to_instant(e))
                .max()
                .ok_or(IntervalError::EmptyCompactedRanges)?,
        };

        let set = Self::new(cron, start, end)?;
        set.mark_present_ranges(ranges);
        Ok(set)
    }

    /// The cron-fire interval sequence: each entry spans from one cron fire
    /// time to the next, at the cron expression's own phase.
    pub fn cron_intervals(&self) -> &[Interval] {
        self.cron_intervals.get_or_init(|| {
            tracing::debug!(cron = %self.cron, "materializing cron_intervals");
            ScheduleGenerator::generate(&self.cron_source, self.start, self.end)
        })
    }

    /// The data-unit interval sequence, aligned to the unit grid regardless
    /// of the cron expression's phase, with each entry's `missing` flag
    /// reflecting the current presence state.
    pub fn data_intervals(&self) -> Vec<Interval> {
        self.canonical_data_intervals()
            .iter()
            .enumerate()
            .map(|(idx, interval)| self.with_presence(idx, interval))
            .collect()
    }

    fn canonical_data_intervals(&self) -> &[Interval] {
        self.data_intervals.get_or_init(|| {
            tracing::debug!(cron = %self.cron, "materializing data_intervals");
            ScheduleGenerator::generate(&self.data_source, self.start, self.end)
        })
    }

    fn with_presence(&self, idx: usize, canonical: &Interval) -> Interval {
        let missing = !self.present.read().expect("present lock poisoned").contains(&idx);
        Interval { missing, ..*canonical }
    }

    /// Data intervals the cron schedule has "ticked past" as of `current_time`.
    ///
    /// Finds the most recent cron interval whose end falls at or before
    /// `min(current_time, self.end)` and whose successor (if any) ends after
    /// it, then returns every data interval at or before that cron interval
    /// by start-time ordering. Returns empty if no such cron interval exists
    /// (e.g. `current_time` precedes the first cron tick).
    pub fn ready(&self, current_time: DateTime<Utc>) -> Vec<Interval> {
        let cutoff = current_time.min(self.end);
        let cron_intervals = self.cron_intervals();

        let Some(most_recent_cron) = most_recent_before(cron_intervals, cutoff) else {
            return Vec::new();
        };

        self.canonical_data_intervals()
            .iter()
            .enumerate()
            .filter(|(_, d)| **d <= most_recent_cron)
            .map(|(idx, d)| self.with_presence(idx, d))
            .collect()
    }

    /// Mark every data interval fully contained in any of `ranges` present.
    ///
    /// Coverage is total: a range only marks an interval present if it fully
    /// contains it. Idempotent — marking the same range twice is the same as
    /// marking it once.
    pub fn mark_present_ranges(&self, ranges: &[PrimitiveInterval]) {
        for &(start_epoch, end_epoch) in ranges {
            self.mark_present_range(epoch_to_instant(start_epoch), epoch_to_instant(end_epoch));
        }
    }

    /// Mark every data interval fully contained in any of `sets`' own data
    /// intervals present.
    ///
    /// Two explicit entry points (this and [`IntervalSet::mark_present_ranges`])
    /// replace the source's runtime shape-sniffing dispatch on the first
    /// element of a heterogeneous list.
    pub fn mark_present_sets(&self, sets: &[&IntervalSet]) {
        for set in sets {
            for present_interval in set.data_intervals() {
                self.mark_present_range(present_interval.start, present_interval.end);
            }
        }
    }

    fn mark_present_range(&self, range_start: DateTime<Utc>, range_end: DateTime<Utc>) {
        let range = Interval::new(range_start, range_end);
        let canonical = self.canonical_data_intervals();
        let mut present = self.present.write().expect("present lock poisoned");
        for (idx, interval) in canonical.iter().enumerate() {
            if range.covers(*interval) {
                tracing::debug!(%interval, "marking data interval present");
                present.insert(idx);
            }
        }
    }

    /// The first data interval that covers `probe`, if any.
    pub fn match_interval(&self, probe: Interval) -> Option<Interval> {
        self.canonical_data_intervals()
            .iter()
            .enumerate()
            .find(|(_, d)| d.covers(probe))
            .map(|(idx, d)| self.with_presence(idx, d))
    }

    /// The intervals that must be (re)processed as of `current_time`.
    ///
    /// `cutoff_time` defaults to `current_time` and bounds the *returned*
    /// set (no interval with `end > cutoff_time`) without bounding the
    /// search for missing intervals — the ready set is already bounded by
    /// `current_time`. `lookback` pulls previously-present predecessor
    /// intervals back into the result because each interval's computation
    /// depends on its predecessor's output.
    ///
    /// # Errors
    ///
    /// [`IntervalError::LookbackInvariant`] if the backward lookback walk
    /// produces a range that doesn't match any generated data interval —
    /// this indicates a bug in cron derivation or sequence generation, not a
    /// caller error.
    pub fn missing(
        &self,
        current_time: Option<DateTime<Utc>>,
        lookback: u32,
        cutoff_time: Option<DateTime<Utc>>,
    ) -> Result<Vec<Interval>, IntervalError> {
        let current_time = current_time.unwrap_or_else(Utc::now);
        let cutoff_time = cutoff_time.unwrap_or(current_time);

        let expected = self.ready(current_time);
        let mut missing: Vec<Interval> = expected.iter().copied().filter(|i| i.missing).collect();

        if lookback > 0 && !missing.is_empty() {
            // If every missing interval is past the cutoff, lookback only
            // chains from the last one — otherwise it would fan out across
            // every interval beyond the cutoff.
            if missing.iter().all(|i| i.start >= cutoff_time) {
                let last = *missing.last().expect("non-empty checked above");
                missing = vec![last];
            }

            let lookback_intervals = self.generate_lookback(missing[0], lookback)?;

            let floor = lookback_intervals
                .iter()
                .copied()
                .chain(missing.iter().copied())
                .min()
                .expect("missing is non-empty");

            missing = expected.into_iter().filter(|e| *e >= floor && e.end <= cutoff_time).collect();
        }

        Ok(missing)
    }

    /// Walk backward from `interval.start` through the data-unit grid,
    /// collecting up to `lookback` prior data intervals. Stops early if a
    /// step would land before `self.start`.
    fn generate_lookback(&self, interval: Interval, lookback: u32) -> Result<Vec<Interval>, IntervalError> {
        let mut end = interval.start;
        let mut lookback_intervals = Vec::new();

        for _ in 0..lookback {
            let Some(start_epoch) = self.data_source.prev(end.timestamp()) else {
                break;
            };
            let start = epoch_to_instant(start_epoch);
            if start < self.start {
                break;
            }

            tracing::trace!(%start, %end, "lookback walk stepping backward");
            let probe = Interval::new(start, end);
            let matched = self.match_interval(probe).ok_or_else(|| {
                tracing::error!(%start, %end, "lookback walk produced a range not covered by any data interval");
                IntervalError::LookbackInvariant { start: start.timestamp(), end: end.timestamp() }
            })?;

            lookback_intervals.push(matched);
            end = start;
        }

        Ok(lookback_intervals)
    }
}

/// Mirrors the source's peekable scan: the most recent interval whose `end`
/// is at or before `cutoff`, provided its successor (if any) ends after it.
fn most_recent_before(intervals: &[Interval], cutoff: DateTime<Utc>) -> Option<Interval> {
    let mut it = intervals.iter().enumerate().peekable();
    while let Some((idx, item)) = it.next() {
        if item.end > cutoff {
            return None;
        }
        match intervals.get(idx + 1) {
            None => return Some(*item),
            Some(next_item) if next_item.end > cutoff => return Some(*item),
            _ => continue,
        }
    }
    None
}

impl<'a> IntoIterator for &'a IntervalSet {
    type Item = Interval;
    type IntoIter = std::vec::IntoIter<Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.data_intervals().into_iter()
    }
}
