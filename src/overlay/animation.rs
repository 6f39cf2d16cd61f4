//! Entrance animation for the overlay panel

use std::time::{Duration, Instant};

const PANEL_DELAY: Duration = Duration::from_millis(300);
const PANEL_DURATION: Duration = Duration::from_millis(800);
const PANEL_RISE: f32 = 50.0;
const HEADING_DURATION: Duration = Duration::from_millis(800);
const CELLS_DURATION: Duration = Duration::from_millis(500);

pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Visual properties of one frame of the entrance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntranceFrame {
    /// Opacity of the whole panel [0.0, 1.0]
    pub panel_opacity: f32,
    /// Downward offset of the panel in pixels
    pub panel_offset: f32,
    pub heading_opacity: f32,
    /// Opacity of countdown cells and quote
    pub content_opacity: f32,
}

impl EntranceFrame {
    pub const SETTLED: Self = Self {
        panel_opacity: 1.0,
        panel_offset: 0.0,
        heading_opacity: 1.0,
        content_opacity: 1.0,
    };
}

/// Panel fades in and slides up after a short delay
#[derive(Debug)]
pub struct Entrance {
    started_at: Instant,
}

impl Entrance {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(started_at: Instant) -> Self {
        Self { started_at }
    }

    /// Returns the frame at `now` and whether the entrance is complete
    pub fn tick(&self, now: Instant) -> (EntranceFrame, bool) {
        let elapsed = now.saturating_duration_since(self.started_at);

        let panel_t = progress(elapsed.saturating_sub(PANEL_DELAY), PANEL_DURATION);
        let panel = ease_out_cubic(panel_t);
        let heading_t = progress(elapsed, HEADING_DURATION);
        let cells_t = progress(elapsed, CELLS_DURATION);

        let frame = EntranceFrame {
            panel_opacity: panel,
            panel_offset: PANEL_RISE * (1.0 - panel),
            heading_opacity: ease_out_cubic(heading_t),
            content_opacity: ease_out_cubic(cells_t),
        };

        (frame, panel_t >= 1.0 && heading_t >= 1.0)
    }
}

fn progress(elapsed: Duration, duration: Duration) -> f32 {
    (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
}
