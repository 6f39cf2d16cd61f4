//! Terminal rendition of the countdown
//!
//! Draws the heading, breakdown, progress bar and quote with indicatif and
//! redraws whenever either display slot changes. Runs until Ctrl-C or SIGTERM.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use tokio::signal::unix::{SignalKind, signal};

use crate::clock::SystemClock;
use crate::config::Config;
use crate::dashboard::{self, CountdownSlot};
use crate::quotes::{Quote, QuoteRotator};
use crate::ticker::{Slots, Ticker};

/// Bar length; progress is shown with one decimal of resolution
const BAR_LENGTH: u64 = 1_000;

pub async fn run(config: Config) -> Result<()> {
    let mut terminate = signal(SignalKind::terminate())?;
    let shutdown = async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    log::warn!("Failed to listen for Ctrl-C: {}", e);
                }
                log::info!("Received Ctrl-C, exiting");
            }
            _ = terminate.recv() => log::info!("Received SIGTERM, exiting"),
        }
    };

    let rotator = QuoteRotator::new(config.quotes.clone());
    let (ticker, slots) = Ticker::spawn(config.countdown, SystemClock, rotator, config.cadence);

    let bar = ProgressBar::new(BAR_LENGTH);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{prefix}\n[{wide_bar:.cyan/blue}]\n{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    follow(&bar, &config.heading, slots, shutdown).await;

    bar.abandon();
    ticker.shutdown().await;
    Ok(())
}

/// Redraw on every slot change until `shutdown` resolves or the ticker stops
async fn follow(bar: &ProgressBar, heading: &str, mut slots: Slots, shutdown: impl Future<Output = ()>) {
    let mut countdown = *slots.countdown.borrow_and_update();
    let mut quote = slots.quote.borrow_and_update().clone();
    draw(bar, heading, &countdown, &quote);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = slots.countdown.changed() => {
                if changed.is_err() {
                    break;
                }
                countdown = *slots.countdown.borrow_and_update();
            }
            changed = slots.quote.changed() => {
                if changed.is_err() {
                    break;
                }
                quote = slots.quote.borrow_and_update().clone();
            }
        }
        draw(bar, heading, &countdown, &quote);
    }
}

fn draw(bar: &ProgressBar, heading: &str, countdown: &CountdownSlot, quote: &Quote) {
    bar.set_prefix(format!(
        "{}\n{}",
        heading,
        dashboard::countdown_line(&countdown.time_left)
    ));
    bar.set_position(bar_position(countdown.progress));
    bar.set_message(format!(
        "{}\n\n\"{}\"\n{}",
        dashboard::percentage_label(countdown.progress),
        quote.text,
        dashboard::attribution(&quote.author)
    ));
}

fn bar_position(progress: f64) -> u64 {
    ((progress / 100.0) * BAR_LENGTH as f64).round() as u64
}
