//! Periodic refresh driven by tokio timers
//!
//! Two independent tasks each own one display slot and are its only writer:
//! the countdown task recomputes the breakdown and progress every tick, the
//! quote task draws a new quote on the slower cadence. Both stop when the
//! ticker is shut down or dropped.

use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::countdown::Countdown;
use crate::dashboard::{Cadence, CountdownSlot};
use crate::quotes::{Quote, QuoteRotator};

/// Read side of the two display slots
#[derive(Debug, Clone)]
pub struct Slots {
    pub countdown: watch::Receiver<CountdownSlot>,
    pub quote: watch::Receiver<Quote>,
}

pub struct Ticker {
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl Ticker {
    /// Fill both slots immediately, then start the two timers.
    pub fn spawn<C, R>(
        countdown: Countdown,
        clock: C,
        mut rotator: QuoteRotator<R>,
        cadence: Cadence,
    ) -> (Self, Slots)
    where
        C: Clock,
        R: Rng + Send + 'static,
    {
        let cancel = CancellationToken::new();

        let (countdown_tx, countdown_rx) =
            watch::channel(CountdownSlot::compute(&countdown, clock.now()));
        let (quote_tx, quote_rx) = watch::channel(rotator.next_quote().clone());

        let countdown_task = tokio::spawn(run_countdown(
            countdown,
            clock,
            countdown_tx,
            cadence,
            cancel.clone(),
        ));
        let quote_task = tokio::spawn(run_quotes(rotator, quote_tx, cadence, cancel.clone()));

        log::debug!(
            "Ticker started (tick={:?}, quote={:?})",
            cadence.tick,
            cadence.quote
        );

        (
            Self {
                cancel,
                tasks: vec![countdown_task, quote_task],
            },
            Slots {
                countdown: countdown_rx,
                quote: quote_rx,
            },
        )
    }

    /// Cancel both timers and wait for their tasks to finish
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                log::warn!("Ticker task ended abnormally: {}", e);
            }
        }
        log::debug!("Ticker stopped");
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_countdown<C: Clock>(
    countdown: Countdown,
    clock: C,
    tx: watch::Sender<CountdownSlot>,
    cadence: Cadence,
    cancel: CancellationToken,
) {
    let mut interval = time::interval_at(time::Instant::now() + cadence.tick, cadence.tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if tx.send(CountdownSlot::compute(&countdown, clock.now())).is_err() {
                    break;
                }
            }
        }
    }
}

async fn run_quotes<R: Rng>(
    mut rotator: QuoteRotator<R>,
    tx: watch::Sender<Quote>,
    cadence: Cadence,
    cancel: CancellationToken,
) {
    let mut interval = time::interval_at(time::Instant::now() + cadence.quote, cadence.quote);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if tx.send(rotator.next_quote().clone()).is_err() {
                    break;
                }
            }
        }
    }
}
