//! Half-open `[start, end)` time windows with a `missing` flag.

use chrono::{DateTime, Utc};
use interval_kernel::PrimitiveInterval;
use serde::{Deserialize, Serialize};

/// A half-open time window `[start, end)`, tagged with whether it has been
/// materialized upstream.
///
/// Equality and hashing consider only `start`/`end` — `missing` is excluded so
/// that an [`Interval`] compares equal to a bare `(start, end)` tuple the same
/// way the underlying data model does (see the crate-level docs). Ordering
/// likewise considers only `start`: within a single [`IntervalSet`](crate::IntervalSet)
/// sequence, starts are unique and sequences are contiguous, so this is a
/// total order in practice even though it ignores `end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub missing: bool,
}

impl Interval {
    /// Construct a new interval, defaulting `missing` to `true` as every
    /// freshly generated interval starts out unmaterialized.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end, missing: true }
    }

    /// `x` may be another [`Interval`], a [`PrimitiveInterval`], a bare
    /// `(DateTime<Utc>, DateTime<Utc>)` tuple, or a single instant.
    ///
    /// - A single instant `t` is covered when `start <= t <= end` — note `end`
    ///   is treated as inclusive here even though the interval is otherwise
    ///   half-open; a probe landing exactly on the boundary is a hit. This
    ///   asymmetry is load-bearing for downstream edge probes and must be
    ///   preserved.
    /// - A range `[a, b)` is covered when `a >= start && b <= end`.
    pub fn covers<P: Into<CoverageProbe>>(&self, probe: P) -> bool {
        match probe.into() {
            CoverageProbe::Instant(t) => self.start <= t && t <= self.end,
            CoverageProbe::Range(a, b) => a >= self.start && b <= self.end,
        }
    }

    /// Alias for [`Interval::covers`], matching the source's `__contains__`.
    pub fn contains<P: Into<CoverageProbe>>(&self, probe: P) -> bool {
        self.covers(probe)
    }

    /// Convert to the kernel-level `(epoch_start, epoch_end)` representation
    /// used at the persistence boundary.
    pub fn to_primitive(&self) -> PrimitiveInterval {
        (self.start.timestamp(), self.end.timestamp())
    }

    /// Construct from the kernel-level primitive representation. The result
    /// always starts out `missing`.
    pub fn from_primitive(interval: PrimitiveInterval) -> Self {
        let (start, end) = interval;
        Self::new(epoch_to_instant(start), epoch_to_instant(end))
    }

    pub(crate) fn duration_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

pub(crate) fn epoch_to_instant(epoch_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch_seconds, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Interval[start={},end={}]",
            self.start.format("%Y-%m-%d %H:%M:%S"),
            self.end.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}
impl Eq for Interval {}

impl std::hash::Hash for Interval {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Interval {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.start.cmp(&other.start)
    }
}

impl PartialEq<(DateTime<Utc>, DateTime<Utc>)> for Interval {
    fn eq(&self, other: &(DateTime<Utc>, DateTime<Utc>)) -> bool {
        self.start == other.0 && self.end == other.1
    }
}
impl PartialEq<Interval> for (DateTime<Utc>, DateTime<Utc>) {
    fn eq(&self, other: &Interval) -> bool {
        other == self
    }
}

impl PartialOrd<(DateTime<Utc>, DateTime<Utc>)> for Interval {
    fn partial_cmp(&self, other: &(DateTime<Utc>, DateTime<Utc>)) -> Option<std::cmp::Ordering> {
        Some(self.start.cmp(&other.0))
    }
}
impl PartialOrd<Interval> for (DateTime<Utc>, DateTime<Utc>) {
    fn partial_cmp(&self, other: &Interval) -> Option<std::cmp::Ordering> {
        Some(self.0.cmp(&other.start))
    }
}

/// What [`Interval::covers`] is being asked about: either a single instant or
/// a `[start, end)` range. A sum type rather than operator overloading across
/// heterogeneous argument types, per the statically-typed adaptation called
/// for when porting this algebra from a dynamically typed source.
#[derive(Debug, Clone, Copy)]
pub enum CoverageProbe {
    Instant(DateTime<Utc>),
    Range(DateTime<Utc>, DateTime<Utc>),
}

impl From<DateTime<Utc>> for CoverageProbe {
    fn from(t: DateTime<Utc>) -> Self {
        CoverageProbe::Instant(t)
    }
}

impl From<Interval> for CoverageProbe {
    fn from(i: Interval) -> Self {
        CoverageProbe::Range(i.start, i.end)
    }
}

impl From<&Interval> for CoverageProbe {
    fn from(i: &Interval) -> Self {
        CoverageProbe::Range(i.start, i.end)
    }
}

impl From<(DateTime<Utc>, DateTime<Utc>)> for CoverageProbe {
    fn from((a, b): (DateTime<Utc>, DateTime<Utc>)) -> Self {
        CoverageProbe::Range(a, b)
    }
}

impl From<PrimitiveInterval> for CoverageProbe {
    fn from((a, b): PrimitiveInterval) -> Self {
        CoverageProbe::Range(epoch_to_instant(a), epoch_to_instant(b))
    }
}
