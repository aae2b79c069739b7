//! Concrete interval-readiness engine.
//!
//! Implements the algebra defined by `interval-kernel`'s `CronSource` trait
//! contract against real collaborators: the `cron` crate for literal cron-fire
//! phase, and a pure epoch-anchored grid for data-unit alignment. See
//! [`IntervalSet`] for the primary entry point: construct one from a cron
//! expression and a bounding window, then query [`IntervalSet::ready`] and
//! [`IntervalSet::missing`] to drive backfill decisions.

// cron-expression and data-unit grid sources
pub mod cron_source;
// half-open time window with a missing flag
pub mod interval;
// owns the cron/data interval sequences and answers readiness queries
pub mod interval_set;
// lazy sequence materialization shared by cron_intervals and data_intervals
pub mod schedule_generator;

pub use cron_source::{CronExpressionSource, UnitGridSource};
pub use interval::{CoverageProbe, Interval};
pub use interval_set::IntervalSet;
pub use interval_kernel::{CronSource, IntervalError, IntervalUnit};

/// Canonical instant type used throughout the engine: a UTC calendar instant,
/// distinct from `interval_kernel::Instant` (whole epoch seconds), which is
/// what the `CronSource` trait boundary speaks.
pub type Instant = chrono::DateTime<chrono::Utc>;
