//! Concrete [`CronSource`] implementations.
//!
//! Two different collaborators back the two interval sequences an
//! [`IntervalSet`](crate::IntervalSet) generates:
//!
//! - [`CronExpressionSource`] evaluates the literal cron expression (e.g.
//!   `"0 12 * * *"`, ticking at noon) via the `cron` crate, preserving its
//!   exact phase. Used for `cron_intervals`.
//! - [`UnitGridSource`] walks a pure, epoch-anchored fixed-duration grid —
//!   the *data unit* rhythm, aligned to the unit boundary regardless of the
//!   cron's phase. Used for `data_intervals` and the backward lookback walk.
//!   Because the Unix epoch instant is itself midnight-aligned UTC, every
//!   common unit (minute through day) lands exactly on its calendar boundary
//!   using nothing more than integer division — no calendar library needed.

use std::str::FromStr;

use cron::Schedule;
use interval_kernel::{CronSource, Instant, IntervalError};

/// Backs `cron_intervals`: the literal cron expression's own fire times.
pub struct CronExpressionSource {
    schedule: Schedule,
    interval_seconds: i64,
}

impl CronExpressionSource {
    /// Parse `expr` (accepting the standard `@daily`-style aliases and both
    /// 5-field and 6-field forms) into a schedule, deriving its nominal fire
    /// interval from the same classifier used for [`interval_kernel::IntervalUnit::from_cron`].
    pub fn new(expr: &str) -> Result<Self, IntervalError> {
        let unit = interval_kernel::IntervalUnit::from_cron(expr)?;
        let normalized = normalize_for_cron_crate(expr);
        let schedule = Schedule::from_str(&normalized).map_err(|e| IntervalError::InvalidCron {
            expr: expr.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { schedule, interval_seconds: unit.duration_seconds() })
    }
}

impl CronSource for CronExpressionSource {
    fn next(&self, after: Instant) -> Option<Instant> {
        let after_dt = chrono::DateTime::<chrono::Utc>::from_timestamp(after, 0)?;
        self.schedule.after(&after_dt).next().map(|dt| dt.timestamp())
    }

    fn prev(&self, before: Instant) -> Option<Instant> {
        // Not exercised by IntervalSet (the lookback walk only steps backward
        // through the data-unit grid, never the literal cron expression), but
        // implemented for completeness of the trait contract via a bounded
        // backward scan: widen the search window until an occurrence short of
        // `before` turns up or the cap is hit.
        let before_dt = chrono::DateTime::<chrono::Utc>::from_timestamp(before, 0)?;
        for window_days in [1_i64, 7, 31, 366, 366 * 5] {
            let window_start = before_dt - chrono::Duration::days(window_days);
            let last_before = self
                .schedule
                .after(&window_start)
                .take_while(|t| *t < before_dt)
                .last();
            if let Some(found) = last_before {
                return Some(found.timestamp());
            }
        }
        None
    }

    fn interval_seconds(&self) -> i64 {
        self.interval_seconds
    }
}

/// The `cron` crate requires 6 or 7 fields (leading seconds); most
/// expressions in the wild, and every example in this crate's spec, use the
/// 5-field POSIX form. Expand the standard `@`-aliases and prepend a `0`
/// seconds field when needed.
fn normalize_for_cron_crate(expr: &str) -> String {
    let expanded = match expr.trim() {
        "@yearly" | "@annually" => "0 0 1 1 *",
        "@monthly" => "0 0 1 * *",
        "@weekly" => "0 0 * * 0",
        "@daily" | "@midnight" => "0 0 * * *",
        "@hourly" => "0 * * * *",
        other => other,
    };
    match expanded.split_whitespace().count() {
        5 => format!("0 {expanded}"),
        _ => expanded.to_string(),
    }
}

/// Backs `data_intervals` and the lookback walk: a fixed-duration grid
/// anchored at the Unix epoch.
#[derive(Debug, Clone, Copy)]
pub struct UnitGridSource {
    duration_seconds: i64,
}

impl UnitGridSource {
    pub fn new(unit: interval_kernel::IntervalUnit) -> Self {
        Self { duration_seconds: unit.duration_seconds() }
    }
}

impl CronSource for UnitGridSource {
    fn next(&self, after: Instant) -> Option<Instant> {
        let step = self.duration_seconds;
        if step <= 0 {
            return None;
        }
        Some((after.div_euclid(step) + 1) * step)
    }

    fn prev(&self, before: Instant) -> Option<Instant> {
        let step = self.duration_seconds;
        if step <= 0 {
            return None;
        }
        let mut candidate = before.div_euclid(step) * step;
        if candidate >= before {
            candidate -= step;
        }
        Some(candidate)
    }

    fn interval_seconds(&self) -> i64 {
        self.duration_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_grid_next_is_strictly_after_and_aligned() {
        let grid = UnitGridSource::new(interval_kernel::IntervalUnit::Day);
        // 2023-01-01 00:00:00 UTC
        let midnight = 1_672_531_200;
        assert_eq!(grid.next(midnight - 1), Some(midnight));
        assert_eq!(grid.next(midnight), Some(midnight + 86_400));
    }

    #[test]
    fn unit_grid_prev_is_strictly_before_and_aligned() {
        let grid = UnitGridSource::new(interval_kernel::IntervalUnit::Day);
        let midnight = 1_672_531_200;
        assert_eq!(grid.prev(midnight + 1), Some(midnight));
        assert_eq!(grid.prev(midnight), Some(midnight - 86_400));
    }

    #[test]
    fn cron_expression_source_next_matches_noon_cadence() {
        let source = CronExpressionSource::new("0 12 * * *").unwrap();
        // 2023-01-01 00:00:00 UTC, strictly after -> first noon tick same day.
        let start = 1_672_531_200;
        let noon = start + 12 * 3_600;
        assert_eq!(source.next(start - 1), Some(noon));
        assert_eq!(source.next(noon), Some(noon + 86_400));
    }

    #[test]
    fn cron_expression_source_interval_seconds_matches_daily_unit() {
        let source = CronExpressionSource::new("0 12 * * *").unwrap();
        assert_eq!(source.interval_seconds(), 86_400);
    }

    #[test]
    fn alias_and_six_field_forms_parse() {
        assert!(CronExpressionSource::new("@daily").is_ok());
        assert!(CronExpressionSource::new("@hourly").is_ok());
        assert!(CronExpressionSource::new("0 0 12 * * *").is_ok());
    }

    #[test]
    fn invalid_cron_expression_is_rejected() {
        assert!(CronExpressionSource::new("not a cron").is_err());
    }
}
