//! Kernel contract for the interval-readiness engine.
//!
//! This crate defines the trait-level abstraction over the cron
//! collaborator (`CronSource`), the discrete data-alignment unit
//! (`IntervalUnit`), and the error type shared by every concrete
//! implementation. The concrete implementations — backed by the `cron`
//! crate and `chrono` — live one layer up, in `interval-engine`, keeping
//! this crate free of both dependencies.

// cron source trait contract
pub mod cron_source;
// error types
pub mod error;
// data-alignment unit
pub mod unit;

pub use cron_source::CronSource;
pub use error::IntervalError;
pub use unit::IntervalUnit;

/// Canonical time representation used across the kernel contract: whole
/// seconds since the Unix epoch (UTC). Kept as a plain integer rather than
/// a calendar type so the kernel has no dependency on `chrono` or the
/// `cron` crate.
pub type Instant = i64;

/// A sparse, already-materialized time range as supplied at the
/// persistence boundary: `(start, end)` epoch seconds.
pub type PrimitiveInterval = (Instant, Instant);
