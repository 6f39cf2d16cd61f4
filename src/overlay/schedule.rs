//! calloop timers driving the overlay refresh
//!
//! One timer recomputes the countdown slot every tick, the other rotates the
//! quote. Both must be removed from the loop before the surface goes away.

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};
use std::time::{Duration, Instant};

use crate::clock::Clock;
use crate::dashboard::{Cadence, Dashboard};

/// Receiver of timer callbacks
pub trait Refresh {
    fn refresh_countdown(&mut self);
    fn rotate_quote(&mut self);
}

impl<C: Clock, R: rand::Rng> Refresh for Dashboard<C, R> {
    fn refresh_countdown(&mut self) {
        Dashboard::refresh_countdown(self);
    }

    fn rotate_quote(&mut self) {
        Dashboard::rotate_quote(self);
    }
}

/// Next firing after `deadline`. Periods missed while the loop was stalled
/// are skipped rather than replayed.
fn next_deadline(deadline: Instant, period: Duration, now: Instant) -> Instant {
    let next = deadline + period;
    if next > now { next } else { now + period }
}

/// Registration of the two refresh timers
#[derive(Debug)]
pub struct Timers {
    countdown: RegistrationToken,
    quote: RegistrationToken,
}

impl Timers {
    pub fn register<'l, D: Refresh + 'l>(
        handle: &LoopHandle<'l, D>,
        cadence: Cadence,
    ) -> Result<Self, calloop::Error> {
        let tick = cadence.tick;
        let countdown = handle
            .insert_source(Timer::from_duration(tick), move |deadline, _, data| {
                data.refresh_countdown();
                TimeoutAction::ToInstant(next_deadline(deadline, tick, Instant::now()))
            })
            .map_err(|e| e.error)?;

        let every = cadence.quote;
        let quote = match handle.insert_source(Timer::from_duration(every), move |deadline, _, data| {
            data.rotate_quote();
            TimeoutAction::ToInstant(next_deadline(deadline, every, Instant::now()))
        }) {
            Ok(token) => token,
            Err(e) => {
                handle.remove(countdown);
                return Err(e.error);
            }
        };

        log::debug!("Registered refresh timers (tick={:?}, quote={:?})", tick, every);
        Ok(Self { countdown, quote })
    }

    /// Remove both timers from the loop
    pub fn teardown<D>(self, handle: &LoopHandle<'_, D>) {
        handle.remove(self.countdown);
        handle.remove(self.quote);
        log::debug!("Removed refresh timers");
    }
}
