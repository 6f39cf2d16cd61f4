//! Display state shared by every surface
//!
//! The dashboard holds two slots: the countdown slot (breakdown and progress,
//! refreshed every tick) and the quote slot (rotated on its own, slower
//! cadence). Each slot is only ever replaced wholesale.

use jiff::Timestamp;
use jiff::tz::TimeZone;
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::clock::Clock;
use crate::countdown::{Countdown, TimeLeft};
use crate::quotes::{Quote, QuoteRotator};

const BAR_WIDTH: usize = 40;

/// How often each slot is refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cadence {
    pub tick: Duration,
    pub quote: Duration,
}

impl Default for Cadence {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(1_000),
            quote: Duration::from_millis(60_000),
        }
    }
}

/// Contents of the countdown slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CountdownSlot {
    pub time_left: TimeLeft,
    pub progress: f64,
}

impl CountdownSlot {
    pub fn compute(countdown: &Countdown, now: Timestamp) -> Self {
        Self {
            time_left: countdown.time_left(now),
            progress: countdown.progress(now),
        }
    }
}

/// Everything a surface needs to draw one refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub heading: String,
    pub time_left: TimeLeft,
    pub progress: f64,
    pub quote: Quote,
}

pub struct Dashboard<C: Clock, R: Rng = StdRng> {
    heading: String,
    countdown: Countdown,
    clock: C,
    rotator: QuoteRotator<R>,
    countdown_slot: CountdownSlot,
    quote_slot: Quote,
}

impl<C: Clock, R: Rng> Dashboard<C, R> {
    /// Fill the countdown slot from the clock. The quote slot starts on the
    /// first quote of the book until [`Dashboard::rotate_quote`] runs.
    pub fn new(heading: String, countdown: Countdown, clock: C, rotator: QuoteRotator<R>) -> Self {
        let countdown_slot = CountdownSlot::compute(&countdown, clock.now());
        let quote_slot = rotator.book().first().clone();
        Self {
            heading,
            countdown,
            clock,
            rotator,
            countdown_slot,
            quote_slot,
        }
    }

    pub fn refresh_countdown(&mut self) {
        self.countdown_slot = CountdownSlot::compute(&self.countdown, self.clock.now());
    }

    pub fn rotate_quote(&mut self) {
        self.quote_slot = self.rotator.next_quote().clone();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            heading: self.heading.clone(),
            time_left: self.countdown_slot.time_left,
            progress: self.countdown_slot.progress,
            quote: self.quote_slot.clone(),
        }
    }
}

/// `Time Until June 10, 2025`, in the given zone
pub fn heading_for(target: Timestamp, tz: &TimeZone) -> String {
    format!("Time Until {}", target.to_zoned(tz.clone()).strftime("%B %-d, %Y"))
}

/// Zero-pad to two digits; a negative value keeps its sign
pub fn format_cell(value: i64) -> String {
    format!("{:02}", value)
}

pub fn percentage_label(progress: f64) -> String {
    format!("{:.1}% completed", progress)
}

pub fn attribution(author: &str) -> String {
    format!("— {}", author)
}

/// One line of `NN Unit` cells
pub fn countdown_line(time_left: &TimeLeft) -> String {
    time_left
        .cells()
        .iter()
        .map(|(unit, value)| format!("{} {}", format_cell(*value), unit.label()))
        .collect::<Vec<_>>()
        .join("  ")
}

fn text_bar(progress: f64) -> String {
    let filled = ((progress / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.heading)?;
        writeln!(f)?;
        writeln!(f, "{}", countdown_line(&self.time_left))?;
        writeln!(f, "{}", text_bar(self.progress))?;
        writeln!(f, "{}", percentage_label(self.progress))?;
        writeln!(f)?;
        writeln!(f, "\"{}\"", self.quote.text)?;
        write!(f, "{}", attribution(&self.quote.author))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use crate::quotes::QuoteBook;
    use jiff::SignedDuration;
    use rand::SeedableRng;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn dashboard(clock: FakeClock) -> Dashboard<FakeClock> {
        let countdown =
            Countdown::new(ts("2024-11-01T00:00:00Z"), ts("2025-06-10T00:00:00Z")).unwrap();
        let rotator = QuoteRotator::with_rng(QuoteBook::builtin(), StdRng::seed_from_u64(3));
        Dashboard::new(
            "Time Until June 10, 2025".to_string(),
            countdown,
            clock,
            rotator,
        )
    }

    #[test]
    fn test_new_fills_both_slots() {
        let clock = FakeClock::new(ts("2024-11-01T12:00:00Z"));
        let snapshot = dashboard(clock).snapshot();

        assert_eq!(snapshot.time_left.days, 220);
        assert_eq!(&snapshot.quote, QuoteBook::builtin().first());
    }

    #[test]
    fn test_refresh_reads_the_clock() {
        let clock = FakeClock::new(ts("2025-06-09T23:59:58Z"));
        let mut dashboard = dashboard(clock.clone());
        assert_eq!(dashboard.snapshot().time_left.seconds, 2);

        clock.advance(SignedDuration::from_secs(2));
        dashboard.refresh_countdown();
        let snapshot = dashboard.snapshot();
        assert_eq!(snapshot.time_left, TimeLeft::default());
        assert_eq!(snapshot.progress, 100.0);
    }

    #[test]
    fn test_rotate_only_touches_quote_slot() {
        let clock = FakeClock::new(ts("2025-01-01T00:00:00Z"));
        let mut dashboard = dashboard(clock.clone());
        let before = dashboard.snapshot();

        clock.set(ts("2025-03-01T00:00:00Z"));
        for _ in 0..20 {
            dashboard.rotate_quote();
            assert!(QuoteBook::builtin().contains(&dashboard.snapshot().quote));
        }
        let after = dashboard.snapshot();
        assert_eq!(after.time_left, before.time_left);
        assert_eq!(after.progress, before.progress);
    }

    #[test]
    fn test_heading_for_target() {
        let target = ts("2025-06-10T00:00:00Z");
        assert_eq!(heading_for(target, &TimeZone::UTC), "Time Until June 10, 2025");
    }

    #[test]
    fn test_format_cell() {
        assert_eq!(format_cell(0), "00");
        assert_eq!(format_cell(7), "07");
        assert_eq!(format_cell(220), "220");
        assert_eq!(format_cell(-5), "-5");
    }

    #[test]
    fn test_percentage_label() {
        assert_eq!(percentage_label(0.0), "0.0% completed");
        assert_eq!(percentage_label(0.2262), "0.2% completed");
        assert_eq!(percentage_label(100.0), "100.0% completed");
    }

    #[test]
    fn test_snapshot_text() {
        let snapshot = Snapshot {
            heading: "Time Until June 10, 2025".to_string(),
            time_left: TimeLeft {
                days: 220,
                hours: 12,
                minutes: 0,
                seconds: 5,
            },
            progress: 50.0,
            quote: Quote::new("Keep going.", "Anonymous"),
        };
        let text = snapshot.to_string();

        assert!(text.starts_with("Time Until June 10, 2025\n"));
        assert!(text.contains("220 Days  12 Hours  00 Minutes  05 Seconds"));
        assert!(text.contains(&format!("[{}{}]", "#".repeat(20), "-".repeat(20))));
        assert!(text.contains("50.0% completed"));
        assert!(text.ends_with("\"Keep going.\"\n— Anonymous"));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let clock = FakeClock::new(ts("2024-11-01T12:00:00Z"));
        let json = serde_json::to_value(dashboard(clock).snapshot()).unwrap();

        assert_eq!(json["time_left"]["days"], 220);
        assert_eq!(json["time_left"]["hours"], 12);
        assert_eq!(json["quote"]["author"], "Steve Jobs");
        assert!(json["progress"].as_f64().unwrap() > 0.0);
    }
}
