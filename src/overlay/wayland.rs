//! Wayland layer-shell integration

use smithay_client_toolkit::{
    compositor::{CompositorHandler, CompositorState},
    delegate_compositor, delegate_layer, delegate_output, delegate_registry, delegate_shm,
    output::{OutputHandler, OutputState},
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
    shell::{
        WaylandSurface,
        wlr_layer::{
            Anchor, KeyboardInteractivity, Layer, LayerShell, LayerShellHandler, LayerSurface,
            LayerSurfaceConfigure,
        },
    },
    shm::{
        Shm, ShmHandler,
        slot::{Buffer, SlotPool},
    },
};
use std::time::Instant;
use wayland_client::{
    Connection, QueueHandle,
    globals::GlobalList,
    protocol::{wl_output, wl_shm, wl_surface},
};

use super::OverlayError;
use super::animation::{Entrance, EntranceFrame};
use super::render;
use super::schedule::Refresh;
use super::text::Fonts;
use crate::clock::SystemClock;
use crate::config::SurfaceLayer;
use crate::dashboard::Dashboard;

/// Fallback size until the compositor tells us the output size
const DEFAULT_WIDTH: u32 = 1280;
const DEFAULT_HEIGHT: u32 = 720;

/// Main overlay application state
pub struct CountdownSurface {
    // Registry state
    registry_state: RegistryState,
    output_state: OutputState,
    compositor_state: CompositorState,
    shm: Shm,
    layer_shell: LayerShell,

    // Display state
    dashboard: Dashboard<SystemClock>,
    fonts: Fonts,
    entrance: Option<Entrance>,

    // Wayland surface
    layer_surface: Option<LayerSurface>,
    pool: Option<SlotPool>,
    buffer: Option<Buffer>,
    width: u32,
    height: u32,
    dirty: bool,
    frame_pending: bool,
    configured: bool,
    pub exit: bool,
}

impl CountdownSurface {
    pub fn new(
        globals: &GlobalList,
        qh: &QueueHandle<Self>,
        dashboard: Dashboard<SystemClock>,
        fonts: Fonts,
    ) -> Result<Self, OverlayError> {
        Ok(Self {
            registry_state: RegistryState::new(globals),
            output_state: OutputState::new(globals, qh),
            compositor_state: CompositorState::bind(globals, qh)?,
            shm: Shm::bind(globals, qh)?,
            layer_shell: LayerShell::bind(globals, qh)?,
            dashboard,
            fonts,
            entrance: None,
            layer_surface: None,
            pool: None,
            buffer: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            dirty: false, // Don't draw until configured
            frame_pending: false,
            configured: false,
            exit: false,
        })
    }

    /// Create a surface covering the whole output
    pub fn create_layer_surface(&mut self, qh: &QueueHandle<Self>, layer: SurfaceLayer) {
        let surface = self.compositor_state.create_surface(qh);

        let layer_surface = self.layer_shell.create_layer_surface(
            qh,
            surface,
            wlr_layer(layer),
            Some("countdown"),
            None, // None = compositor chooses output
        );

        layer_surface.set_anchor(Anchor::TOP | Anchor::BOTTOM | Anchor::LEFT | Anchor::RIGHT);
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::None);
        layer_surface.set_size(0, 0);
        layer_surface.set_exclusive_zone(-1);

        // Commit initial configuration
        layer_surface.commit();

        self.layer_surface = Some(layer_surface);
    }

    pub fn should_draw(&self) -> bool {
        self.configured && self.dirty && !self.frame_pending
    }

    pub fn draw(&mut self, qh: &QueueHandle<Self>) -> Result<(), OverlayError> {
        let Some(layer_surface) = &self.layer_surface else {
            return Ok(());
        };

        // Initialize pool if needed
        if self.pool.is_none() {
            let pool = SlotPool::new((self.width * self.height * 4) as usize, &self.shm)?;
            self.pool = Some(pool);
        }
        let Some(pool) = self.pool.as_mut() else {
            return Ok(());
        };

        // Tick the entrance
        let now = Instant::now();
        let (frame, complete) = self
            .entrance
            .as_ref()
            .map_or((EntranceFrame::SETTLED, false), |entrance| entrance.tick(now));
        if complete {
            self.entrance = None;
        }

        let mut pixmap = tiny_skia::Pixmap::new(self.width, self.height)
            .ok_or(OverlayError::Pixmap)?;
        render::render(&mut pixmap, &self.fonts, &self.dashboard.snapshot(), frame)?;

        let (buffer, canvas) = pool.create_buffer(
            self.width as i32,
            self.height as i32,
            self.width as i32 * 4,
            wl_shm::Format::Argb8888,
        )?;

        // tiny-skia is RGBA, Argb8888 is BGRA in memory
        for (dst, src) in canvas.chunks_exact_mut(4).zip(pixmap.data().chunks_exact(4)) {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
            dst[3] = src[3];
        }

        let surface = layer_surface.wl_surface();
        surface.attach(Some(buffer.wl_buffer()), 0, 0);
        surface.damage_buffer(0, 0, self.width as i32, self.height as i32);

        // Keep frames coming while the entrance is running
        if self.entrance.is_some() {
            surface.frame(qh, surface.clone());
            self.frame_pending = true;
        } else {
            self.dirty = false;
        }

        layer_surface.commit();

        self.buffer = Some(buffer);
        Ok(())
    }
}

impl Refresh for CountdownSurface {
    fn refresh_countdown(&mut self) {
        self.dashboard.refresh_countdown();
        self.dirty = true;
    }

    fn rotate_quote(&mut self) {
        self.dashboard.rotate_quote();
        self.dirty = true;
    }
}

fn wlr_layer(layer: SurfaceLayer) -> Layer {
    match layer {
        SurfaceLayer::Background => Layer::Background,
        SurfaceLayer::Bottom => Layer::Bottom,
        SurfaceLayer::Top => Layer::Top,
        SurfaceLayer::Overlay => Layer::Overlay,
    }
}

// Implement required trait delegates
delegate_compositor!(CountdownSurface);
delegate_output!(CountdownSurface);
delegate_shm!(CountdownSurface);
delegate_layer!(CountdownSurface);
delegate_registry!(CountdownSurface);

impl CompositorHandler for CountdownSurface {
    fn scale_factor_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_factor: i32,
    ) {
    }

    fn frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _time: u32,
    ) {
        // Compositor is ready for another frame
        self.frame_pending = false;
        self.dirty = true;
    }

    fn transform_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_transform: wl_output::Transform,
    ) {
    }

    fn surface_enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }

    fn surface_leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }
}

impl OutputHandler for CountdownSurface {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    fn new_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }

    fn update_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }

    fn output_destroyed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }
}

impl LayerShellHandler for CountdownSurface {
    fn closed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _layer: &LayerSurface) {
        log::info!("Layer surface closed by compositor");
        self.exit = true;
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _layer: &LayerSurface,
        configure: LayerSurfaceConfigure,
        _serial: u32,
    ) {
        let (width, height) = configure.new_size;
        if width > 0 && height > 0 && (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.pool = None; // Recreate pool with new size
            self.buffer = None;
        }
        log::debug!("Configured: {}x{}", self.width, self.height);

        if !self.configured {
            self.entrance = Some(Entrance::new());
        }
        self.configured = true;
        self.dirty = true;
    }
}

impl ShmHandler for CountdownSurface {
    fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm
    }
}

impl ProvidesRegistryState for CountdownSurface {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }
    registry_handlers![OutputState];
}
