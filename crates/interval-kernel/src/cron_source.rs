//! The minimal interface the interval-readiness engine needs from a cron
//! collaborator: step forward, step backward, and report the nominal
//! duration between ticks.

use crate::Instant;

/// A source of successive schedule fire times.
///
/// Implementations are stateless with respect to any moving cursor: both
/// `next` and `prev` take the probe instant explicitly, rather than
/// advancing an internal iterator, so a single source can be queried from
/// arbitrary points without needing to be rebuilt.
pub trait CronSource {
    /// The first scheduled instant strictly after `after`.
    fn next(&self, after: Instant) -> Option<Instant>;

    /// The last scheduled instant strictly before `before`.
    fn prev(&self, before: Instant) -> Option<Instant>;

    /// Nominal duration, in seconds, between successive scheduled instants.
    ///
    /// Used to prune a partial leading interval: an interval is only
    /// emitted when its span exactly equals this duration.
    fn interval_seconds(&self) -> i64;
}
