//! Error types for the interval-readiness kernel contract.

use crate::Instant;

/// All errors that can arise while building or querying interval readiness.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// callers that match exhaustively.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IntervalError {
    /// `end` was not after `start` when constructing a bounded window.
    #[error("interval end ({end}) must not precede start ({start})")]
    InvalidBounds { start: Instant, end: Instant },

    /// The cron collaborator rejected the expression, or it does not resolve
    /// to a supported alignment unit.
    #[error("invalid cron expression '{expr}': {reason}")]
    InvalidCron { expr: String, reason: String },

    /// The backward lookback walk produced a range that does not match any
    /// data interval already generated for this set. Indicates a bug in
    /// cron derivation or sequence generation, not a caller error.
    #[error(
        "lookback generated a range ({start} -> {end}) not covered by any expected data interval; this is a bug"
    )]
    LookbackInvariant { start: Instant, end: Instant },

    /// `from_compacted` was called with no explicit start/end and no ranges
    /// to infer them from.
    #[error("from_compacted requires at least one range or an explicit start/end")]
    EmptyCompactedRanges,
}
