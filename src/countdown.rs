//! Countdown arithmetic
//!
//! Both computations are pure functions of the current instant and the two
//! fixed instants of a [`Countdown`]. They are re-evaluated on every tick.

use jiff::Timestamp;
use serde::Serialize;
use thiserror::Error;

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

#[derive(Error, Debug)]
pub enum CountdownError {
    #[error("start ({start}) must be before target ({target})")]
    StartNotBeforeTarget { start: Timestamp, target: Timestamp },
}

/// Remaining time split into days, hours, minutes and seconds
///
/// Past the target every field is zero or negative. Nothing is clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeLeft {
    /// Break a signed millisecond delta into its four fields.
    ///
    /// Each field is `floor((delta / unit) rem modulus)` where `rem` keeps the
    /// sign of the dividend, so a negative delta yields negative fields.
    pub fn from_millis(delta: i64) -> Self {
        Self {
            days: delta.div_euclid(MS_PER_DAY),
            hours: (delta % MS_PER_DAY).div_euclid(MS_PER_HOUR),
            minutes: (delta % MS_PER_HOUR).div_euclid(MS_PER_MINUTE),
            seconds: (delta % MS_PER_MINUTE).div_euclid(MS_PER_SECOND),
        }
    }

    /// Fields in display order, paired with their unit
    pub fn cells(&self) -> [(Unit, i64); 4] {
        [
            (Unit::Days, self.days),
            (Unit::Hours, self.hours),
            (Unit::Minutes, self.minutes),
            (Unit::Seconds, self.seconds),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Unit {
    pub fn label(&self) -> &'static str {
        match self {
            Unit::Days => "Days",
            Unit::Hours => "Hours",
            Unit::Minutes => "Minutes",
            Unit::Seconds => "Seconds",
        }
    }
}

/// A fixed start and target instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    start: Timestamp,
    target: Timestamp,
}

impl Countdown {
    pub fn new(start: Timestamp, target: Timestamp) -> Result<Self, CountdownError> {
        if start >= target {
            return Err(CountdownError::StartNotBeforeTarget { start, target });
        }
        Ok(Self { start, target })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn target(&self) -> Timestamp {
        self.target
    }

    /// Time remaining until the target, as seen at `now`
    pub fn time_left(&self, now: Timestamp) -> TimeLeft {
        TimeLeft::from_millis(self.target.as_millisecond() - now.as_millisecond())
    }

    /// Percentage of the start..target span elapsed at `now`, within [0, 100]
    pub fn progress(&self, now: Timestamp) -> f64 {
        let total = (self.target.as_millisecond() - self.start.as_millisecond()) as f64;
        let elapsed = (now.as_millisecond() - self.start.as_millisecond()) as f64;
        (elapsed / total * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn default_countdown() -> Countdown {
        Countdown::new(ts("2024-11-01T00:00:00Z"), ts("2025-06-10T00:00:00Z")).unwrap()
    }

    #[test]
    fn test_rejects_start_after_target() {
        let err = Countdown::new(ts("2025-06-10T00:00:00Z"), ts("2024-11-01T00:00:00Z"));
        assert!(matches!(
            err,
            Err(CountdownError::StartNotBeforeTarget { .. })
        ));
    }

    #[test]
    fn test_rejects_equal_instants() {
        let instant = ts("2025-06-10T00:00:00Z");
        assert!(Countdown::new(instant, instant).is_err());
    }

    #[test]
    fn test_half_day_into_the_span() {
        let countdown = default_countdown();
        let now = ts("2024-11-01T12:00:00Z");

        assert_eq!(
            countdown.time_left(now),
            TimeLeft {
                days: 220,
                hours: 12,
                minutes: 0,
                seconds: 0
            }
        );

        // 12h out of 221 days
        let progress = countdown.progress(now);
        assert!((progress - 1200.0 / 5304.0).abs() < 1e-9, "got {}", progress);
        assert_eq!(format!("{:.1}", progress), "0.2");
    }

    #[test]
    fn test_at_target() {
        let countdown = default_countdown();
        let now = countdown.target();

        assert_eq!(countdown.time_left(now), TimeLeft::default());
        assert_eq!(countdown.progress(now), 100.0);
    }

    #[test]
    fn test_progress_bounds() {
        let countdown = default_countdown();

        assert_eq!(countdown.progress(countdown.start()), 0.0);
        assert_eq!(countdown.progress(ts("2024-01-01T00:00:00Z")), 0.0);
        assert_eq!(countdown.progress(ts("2026-01-01T00:00:00Z")), 100.0);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let countdown = default_countdown();
        let mut now = countdown.start();
        let mut previous = countdown.progress(now);

        while now < countdown.target() {
            now = now.checked_add(SignedDuration::from_hours(7)).unwrap();
            let current = countdown.progress(now);
            assert!(current >= previous, "{} < {}", current, previous);
            previous = current;
        }
        assert_eq!(previous, 100.0);
    }

    #[test]
    fn test_fields_stay_in_range_before_target() {
        let countdown = default_countdown();
        let mut now = countdown.start();

        while now <= countdown.target() {
            let left = countdown.time_left(now);
            assert!(left.days >= 0);
            assert!((0..24).contains(&left.hours), "{:?}", left);
            assert!((0..60).contains(&left.minutes), "{:?}", left);
            assert!((0..60).contains(&left.seconds), "{:?}", left);
            now = now
                .checked_add(SignedDuration::from_millis(3_599_999))
                .unwrap();
        }
    }

    #[test]
    fn test_sub_second_remainder_rounds_down() {
        let left = TimeLeft::from_millis(1_999);
        assert_eq!(left.seconds, 1);
        assert_eq!(left.minutes, 0);
    }

    #[test]
    fn test_past_target_is_not_clamped() {
        let left = TimeLeft::from_millis(-1_500);
        assert_eq!(
            left,
            TimeLeft {
                days: -1,
                hours: -1,
                minutes: -1,
                seconds: -2
            }
        );

        let left = TimeLeft::from_millis(-(MS_PER_DAY + 2 * MS_PER_HOUR));
        assert_eq!(left.days, -2);
        assert_eq!(left.hours, -2);
        assert_eq!(left.minutes, 0);
        assert_eq!(left.seconds, 0);
    }

    #[test]
    fn test_cells_order_and_labels() {
        let left = TimeLeft {
            days: 1,
            hours: 2,
            minutes: 3,
            seconds: 4,
        };
        let labels: Vec<_> = left.cells().iter().map(|(u, v)| (u.label(), *v)).collect();
        assert_eq!(
            labels,
            vec![("Days", 1), ("Hours", 2), ("Minutes", 3), ("Seconds", 4)]
        );
    }
}
