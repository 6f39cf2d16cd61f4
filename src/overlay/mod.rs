//! Full-screen countdown overlay for Wayland
//!
//! A layer-shell surface covering the output, redrawn by two calloop timers:
//! one recomputes the countdown every tick, the other rotates the quote.

mod animation;
mod render;
mod schedule;
mod text;
mod wayland;

use calloop::EventLoop;
use calloop::signals::{Signal, Signals};
use smithay_client_toolkit::reexports::calloop_wayland_source::WaylandSource;
use std::time::Duration;
use thiserror::Error;
use wayland_client::{Connection, QueueHandle, globals::registry_queue_init};

use self::schedule::Timers;
use self::text::Fonts;
use self::wayland::CountdownSurface;
use crate::clock::SystemClock;
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::quotes::QuoteRotator;

/// Overlay error types
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Failed to connect to Wayland: {0}")]
    Connect(#[from] wayland_client::ConnectError),
    #[error("Failed to read Wayland globals: {0}")]
    Globals(#[from] wayland_client::globals::GlobalError),
    #[error("Compositor is missing a required global: {0}")]
    Bind(#[from] wayland_client::globals::BindError),
    #[error("Event loop error: {0}")]
    Loop(#[from] calloop::Error),
    #[error("Failed to create shm pool: {0}")]
    Pool(#[from] smithay_client_toolkit::shm::CreatePoolError),
    #[error("Failed to create buffer: {0}")]
    Buffer(#[from] smithay_client_toolkit::shm::slot::CreateBufferError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No sans-serif font found")]
    NoFont,
    #[error("Failed to allocate pixmap")]
    Pixmap,
}

/// Run the overlay until the compositor closes it or we get SIGINT/SIGTERM
pub fn run(config: Config) -> Result<(), OverlayError> {
    log::info!("Starting Wayland overlay");

    let conn = Connection::connect_to_env()?;
    let (globals, event_queue) = registry_queue_init(&conn)?;
    let qh = event_queue.handle();

    let mut event_loop: EventLoop<CountdownSurface> = EventLoop::try_new()?;
    let handle = event_loop.handle();
    WaylandSource::new(conn.clone(), event_queue)
        .insert(handle.clone())
        .map_err(|e| OverlayError::Loop(e.error))?;

    let fonts = Fonts::load()?;

    let mut dashboard = Dashboard::new(
        config.heading.clone(),
        config.countdown,
        SystemClock,
        QuoteRotator::new(config.quotes.clone()),
    );
    dashboard.rotate_quote();

    let mut app = CountdownSurface::new(&globals, &qh, dashboard, fonts)?;
    app.create_layer_surface(&qh, config.layer);

    let signals = Signals::new(&[Signal::SIGINT, Signal::SIGTERM])?;
    let signal_token = handle
        .insert_source(signals, |event, _, app| {
            log::info!("Received {:?}, exiting", event.signal());
            app.exit = true;
        })
        .map_err(|e| e.error)?;

    let timers = Timers::register(&handle, config.cadence)?;

    let result = run_loop(&mut event_loop, &mut app, &qh);

    timers.teardown(&handle);
    handle.remove(signal_token);
    log::info!("Overlay shut down");

    result
}

fn run_loop(
    event_loop: &mut EventLoop<'_, CountdownSurface>,
    app: &mut CountdownSurface,
    qh: &QueueHandle<CountdownSurface>,
) -> Result<(), OverlayError> {
    while !app.exit {
        event_loop.dispatch(None::<Duration>, app)?;

        if app.should_draw() {
            if let Err(e) = app.draw(qh) {
                log::error!("Draw error: {}", e);
            }
        }
    }
    Ok(())
}
