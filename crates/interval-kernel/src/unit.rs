//! Discrete data-alignment units.

use serde::{Deserialize, Serialize};

/// The granularity at which data intervals are aligned, independent of the
/// phase of the cron expression that drives processing.
///
/// `0 12 * * *` fires daily at noon, but its data unit is still
/// [`IntervalUnit::Day`], aligned to midnight — the cron's phase and the
/// data unit's alignment are two different things this type keeps distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum IntervalUnit {
    Minute,
    FiveMinutes,
    QuarterHour,
    HalfHour,
    Hour,
    Day,
    /// A cadence outside the common buckets above, carrying its own duration
    /// in seconds. Keeps the type total over any schedule the cron
    /// collaborator can express, instead of rejecting uncommon cadences.
    Custom(i64),
}

impl IntervalUnit {
    /// Nominal duration of one unit, in seconds.
    pub fn duration_seconds(self) -> i64 {
        match self {
            IntervalUnit::Minute => 60,
            IntervalUnit::FiveMinutes => 300,
            IntervalUnit::QuarterHour => 900,
            IntervalUnit::HalfHour => 1_800,
            IntervalUnit::Hour => 3_600,
            IntervalUnit::Day => 86_400,
            IntervalUnit::Custom(seconds) => seconds,
        }
    }

    /// Classify a duration into one of the common named units, falling back
    /// to [`IntervalUnit::Custom`] for anything else.
    pub fn from_seconds(seconds: i64) -> Self {
        match seconds {
            60 => IntervalUnit::Minute,
            300 => IntervalUnit::FiveMinutes,
            900 => IntervalUnit::QuarterHour,
            1_800 => IntervalUnit::HalfHour,
            3_600 => IntervalUnit::Hour,
            86_400 => IntervalUnit::Day,
            other => IntervalUnit::Custom(other),
        }
    }

    /// Derive the data-alignment unit from a cron expression, by syntax alone.
    ///
    /// This is pure string classification — no calendar evaluation — which is
    /// why it lives here rather than next to the `cron`-crate-backed source in
    /// `interval-engine`. A cron expression's *data unit* is driven by its
    /// minute/hour granularity, independent of phase: `0 12 * * *` fires daily
    /// at noon, but classifies to [`IntervalUnit::Day`] because its data unit
    /// is aligned to midnight, not to the fire hour.
    ///
    /// Accepts the standard `@hourly`/`@daily`/`@midnight`/`@weekly` aliases in
    /// addition to literal 5-field (`min hour dom month dow`) and 6-field
    /// (`sec min hour dom month dow`, seconds field must be `0`) expressions.
    pub fn from_cron(expr: &str) -> Result<Self, crate::IntervalError> {
        let expanded = expand_alias(expr.trim());
        let fields: Vec<&str> = expanded.split_whitespace().collect();

        let (minute, hour, dom, month, dow) = match fields.as_slice() {
            [minute, hour, dom, month, dow] => (*minute, *hour, *dom, *month, *dow),
            [sec, minute, hour, dom, month, dow] => {
                if *sec != "0" {
                    return Err(crate::IntervalError::InvalidCron {
                        expr: expr.to_string(),
                        reason: "sub-minute cron cadences are not representable as an \
                                 IntervalUnit"
                            .into(),
                    });
                }
                (*minute, *hour, *dom, *month, *dow)
            }
            _ => {
                return Err(crate::IntervalError::InvalidCron {
                    expr: expr.to_string(),
                    reason: format!("expected 5 or 6 whitespace-separated fields, got {}", fields.len()),
                });
            }
        };

        if let Some(step) = minute.strip_prefix("*/") {
            let step: i64 = step.parse().map_err(|_| crate::IntervalError::InvalidCron {
                expr: expr.to_string(),
                reason: format!("unrecognized minute step '{minute}'"),
            })?;
            return Ok(IntervalUnit::from_seconds(step * 60));
        }

        if minute == "*" {
            return Ok(IntervalUnit::Minute);
        }

        if hour == "*" {
            return Ok(IntervalUnit::Hour);
        }

        if dom == "*" && month == "*" && dow == "*" {
            // Fixed minute, fixed hour, unrestricted day/month/weekday: a daily
            // cadence aligned to midnight regardless of the fire hour's phase.
            return Ok(IntervalUnit::Day);
        }

        if dow != "*" && dom == "*" {
            return Ok(IntervalUnit::Custom(7 * 86_400));
        }

        // Monthly/yearly cadences have no fixed duration (months and years vary
        // in length); approximate with a nominal 30-day month. Schedules this
        // coarse fall outside this engine's primary use case.
        Ok(IntervalUnit::Custom(30 * 86_400))
    }
}

/// Expand the handful of standard crontab shorthand aliases into their literal
/// 5-field equivalent. Expressions that don't start with `@` pass through
/// unchanged.
fn expand_alias(expr: &str) -> String {
    match expr {
        "@yearly" | "@annually" => "0 0 1 1 *".to_string(),
        "@monthly" => "0 0 1 * *".to_string(),
        "@weekly" => "0 0 * * 0".to_string(),
        "@daily" | "@midnight" => "0 0 * * *".to_string(),
        "@hourly" => "0 * * * *".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_buckets_round_trip() {
        for unit in [
            IntervalUnit::Minute,
            IntervalUnit::FiveMinutes,
            IntervalUnit::QuarterHour,
            IntervalUnit::HalfHour,
            IntervalUnit::Hour,
            IntervalUnit::Day,
        ] {
            assert_eq!(IntervalUnit::from_seconds(unit.duration_seconds()), unit);
        }
    }

    #[test]
    fn unrecognized_duration_falls_back_to_custom() {
        assert_eq!(IntervalUnit::from_seconds(123), IntervalUnit::Custom(123));
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&IntervalUnit::Day).unwrap();
        let back: IntervalUnit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, IntervalUnit::Day);
    }

    #[test]
    fn daily_alias_classifies_as_day() {
        assert_eq!(IntervalUnit::from_cron("@daily").unwrap(), IntervalUnit::Day);
        assert_eq!(IntervalUnit::from_cron("@midnight").unwrap(), IntervalUnit::Day);
    }

    #[test]
    fn hourly_alias_classifies_as_hour() {
        assert_eq!(IntervalUnit::from_cron("@hourly").unwrap(), IntervalUnit::Hour);
    }

    #[test]
    fn noon_daily_cron_is_still_a_day_unit() {
        // The cron fires at noon, but the *data* unit is daily, aligned to
        // midnight — phase and alignment are independent.
        assert_eq!(IntervalUnit::from_cron("0 12 * * *").unwrap(), IntervalUnit::Day);
    }

    #[test]
    fn minute_step_crons_classify_by_step_size() {
        assert_eq!(IntervalUnit::from_cron("*/5 * * * *").unwrap(), IntervalUnit::FiveMinutes);
        assert_eq!(IntervalUnit::from_cron("*/15 * * * *").unwrap(), IntervalUnit::QuarterHour);
        assert_eq!(IntervalUnit::from_cron("*/30 * * * *").unwrap(), IntervalUnit::HalfHour);
    }

    #[test]
    fn bare_star_minute_is_minute_unit() {
        assert_eq!(IntervalUnit::from_cron("* * * * *").unwrap(), IntervalUnit::Minute);
    }

    #[test]
    fn six_field_form_with_zero_seconds_matches_five_field() {
        assert_eq!(
            IntervalUnit::from_cron("0 0 12 * * *").unwrap(),
            IntervalUnit::from_cron("0 12 * * *").unwrap(),
        );
    }

    #[test]
    fn nonzero_seconds_field_is_rejected() {
        assert!(IntervalUnit::from_cron("30 0 12 * * *").is_err());
    }

    #[test]
    fn weekly_cadence_is_custom_week_duration() {
        assert_eq!(
            IntervalUnit::from_cron("@weekly").unwrap(),
            IntervalUnit::Custom(7 * 86_400)
        );
        assert_eq!(
            IntervalUnit::from_cron("0 0 * * 1").unwrap(),
            IntervalUnit::Custom(7 * 86_400)
        );
    }

    #[test]
    fn malformed_expression_is_rejected() {
        assert!(IntervalUnit::from_cron("not a cron").is_err());
    }
}
