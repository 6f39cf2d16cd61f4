//! tiny-skia rendering for the countdown overlay

use tiny_skia::*;

use super::OverlayError;
use super::animation::EntranceFrame;
use super::text::{Fonts, Typeface};
use crate::dashboard::{self, Snapshot};

const PANEL_MAX_WIDTH: f32 = 768.0;
const PANEL_RADIUS: f32 = 12.0;
const PADDING: f32 = 32.0;
const GAP: f32 = 24.0;

const HEADING_SIZE: f32 = 30.0;
const NUMBER_SIZE: f32 = 36.0;
const UNIT_SIZE: f32 = 14.0;
const PERCENT_SIZE: f32 = 12.0;
const QUOTE_SIZE: f32 = 14.0;
const AUTHOR_SIZE: f32 = 12.0;

const HEADING_LINE: f32 = 40.0;
const CELL_HEIGHT: f32 = NUMBER_SIZE + 8.0 + UNIT_SIZE + 4.0;
const BAR_HEIGHT: f32 = 6.0;
const BAR_MAX_WIDTH: f32 = 512.0;
const PERCENT_LINE: f32 = 16.0;
const QUOTE_LINE: f32 = 20.0;
const AUTHOR_LINE: f32 = 24.0;
const QUOTE_MIN_HEIGHT: f32 = 60.0;

/// Positions of every panel element, in surface pixels
#[derive(Debug, Clone, PartialEq)]
pub struct PanelLayout {
    pub panel: Rect,
    pub heading_baseline: f32,
    pub grid_top: f32,
    pub columns: usize,
    pub cell_width: f32,
    pub grid_left: f32,
    pub bar: Rect,
    pub percent_baseline: f32,
    pub quote_top: f32,
}

impl PanelLayout {
    /// Lay out a panel for a surface of `width` x `height` with a quote that
    /// wraps to `quote_lines` lines.
    pub fn new(width: f32, height: f32, quote_lines: usize) -> Option<Self> {
        let panel_width = (width * 0.9).min(PANEL_MAX_WIDTH);
        let inner_width = panel_width - PADDING * 2.0;

        let columns = if inner_width >= 480.0 { 4 } else { 2 };
        let rows = 4 / columns;
        let grid_width = inner_width.min(576.0);
        let cell_width = grid_width / columns as f32;

        let quote_height =
            (quote_lines as f32 * QUOTE_LINE + AUTHOR_LINE).max(QUOTE_MIN_HEIGHT);
        let content_height = HEADING_LINE
            + GAP
            + rows as f32 * CELL_HEIGHT
            + (rows - 1) as f32 * 16.0
            + GAP
            + BAR_HEIGHT
            + 8.0
            + PERCENT_LINE
            + GAP
            + quote_height;

        let panel_height = (content_height + PADDING * 2.0).max(height * 0.4);
        let panel_x = (width - panel_width) / 2.0;
        let panel_y = (height - panel_height) / 2.0;
        let panel = Rect::from_xywh(panel_x, panel_y, panel_width, panel_height)?;

        let center_x = width / 2.0;
        let mut y = panel_y + (panel_height - content_height) / 2.0;

        let heading_baseline = y + HEADING_LINE * 0.75;
        y += HEADING_LINE + GAP;

        let grid_top = y;
        let grid_left = center_x - grid_width / 2.0;
        y += rows as f32 * CELL_HEIGHT + (rows - 1) as f32 * 16.0 + GAP;

        let bar_width = inner_width.min(BAR_MAX_WIDTH);
        let bar = Rect::from_xywh(center_x - bar_width / 2.0, y, bar_width, BAR_HEIGHT)?;
        y += BAR_HEIGHT + 8.0;

        let percent_baseline = y + PERCENT_LINE * 0.75;
        y += PERCENT_LINE + GAP;

        Some(Self {
            panel,
            heading_baseline,
            grid_top,
            columns,
            cell_width,
            grid_left,
            bar,
            percent_baseline,
            quote_top: y,
        })
    }
}

/// Width of the filled part of a progress track
pub fn progress_fill_width(track_width: f32, progress: f64) -> f32 {
    track_width * (progress.clamp(0.0, 100.0) / 100.0) as f32
}

/// Render the whole surface
pub fn render(
    pixmap: &mut Pixmap,
    fonts: &Fonts,
    snapshot: &Snapshot,
    entrance: EntranceFrame,
) -> Result<(), OverlayError> {
    let width = pixmap.width() as f32;
    let height = pixmap.height() as f32;

    // 1. Background and lamp glow
    draw_background(pixmap);

    // 2. Panel on its own layer so it can fade and slide as a whole
    let quote_lines = fonts.regular.wrap(&snapshot.quote.text, QUOTE_SIZE, quote_width(width));
    let Some(layout) = PanelLayout::new(width, height, quote_lines.len()) else {
        return Ok(());
    };

    let mut layer = Pixmap::new(pixmap.width(), pixmap.height()).ok_or(OverlayError::Pixmap)?;
    draw_panel(&mut layer, &layout);
    draw_heading(&mut layer, &fonts.regular, &layout, &snapshot.heading, entrance.heading_opacity);
    draw_cells(&mut layer, fonts, &layout, snapshot, entrance.content_opacity);
    draw_progress(&mut layer, &fonts.regular, &layout, snapshot.progress);
    draw_quote(&mut layer, &fonts.regular, &layout, &quote_lines, &snapshot.quote.author, entrance.content_opacity);

    pixmap.draw_pixmap(
        0,
        entrance.panel_offset.round() as i32,
        layer.as_ref(),
        &PixmapPaint {
            opacity: entrance.panel_opacity,
            ..PixmapPaint::default()
        },
        Transform::identity(),
        None,
    );

    Ok(())
}

fn quote_width(width: f32) -> f32 {
    let panel_width = (width * 0.9).min(PANEL_MAX_WIDTH);
    (panel_width - PADDING * 2.0).min(576.0) - 32.0
}

fn solid(r: u8, g: u8, b: u8, a: u8, opacity: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, (a as f32 * opacity.clamp(0.0, 1.0)).round() as u8);
    paint.anti_alias = true;
    paint
}

fn draw_background(pixmap: &mut Pixmap) {
    pixmap.fill(Color::from_rgba8(2, 8, 23, 255));

    let width = pixmap.width() as f32;
    let height = pixmap.height() as f32;
    let lamp_y = height * 0.3;

    // Glow below the lamp
    let glow = RadialGradient::new(
        Point::from_xy(width / 2.0, lamp_y),
        Point::from_xy(width / 2.0, lamp_y),
        width.max(height) * 0.4,
        vec![
            GradientStop::new(0.0, Color::from_rgba8(6, 182, 212, 90)),
            GradientStop::new(1.0, Color::from_rgba8(6, 182, 212, 0)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    );
    if let (Some(shader), Some(rect)) = (glow, Rect::from_xywh(0.0, 0.0, width, height)) {
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    // The lamp itself, a thin bright line fading out at both ends
    let line_width = width * 0.3;
    let line_x = (width - line_width) / 2.0;
    let line = LinearGradient::new(
        Point::from_xy(line_x, lamp_y),
        Point::from_xy(line_x + line_width, lamp_y),
        vec![
            GradientStop::new(0.0, Color::from_rgba8(34, 211, 238, 0)),
            GradientStop::new(0.5, Color::from_rgba8(34, 211, 238, 255)),
            GradientStop::new(1.0, Color::from_rgba8(34, 211, 238, 0)),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    );
    if let (Some(shader), Some(rect)) = (line, Rect::from_xywh(line_x, lamp_y - 1.0, line_width, 2.0)) {
        let paint = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

fn draw_panel(pixmap: &mut Pixmap, layout: &PanelLayout) {
    let path = create_rounded_rect(layout.panel, PANEL_RADIUS);

    // black/30 card with neutral-800 border
    pixmap.fill_path(
        &path,
        &solid(0, 0, 0, 77, 1.0),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    pixmap.stroke_path(
        &path,
        &solid(38, 38, 38, 255, 1.0),
        &Stroke {
            width: 1.0,
            ..Stroke::default()
        },
        Transform::identity(),
        None,
    );
}

fn draw_heading(pixmap: &mut Pixmap, face: &Typeface, layout: &PanelLayout, heading: &str, opacity: f32) {
    let center_x = layout.panel.x() + layout.panel.width() / 2.0;
    face.draw_centered(
        pixmap,
        heading,
        center_x,
        layout.heading_baseline,
        HEADING_SIZE,
        &solid(226, 232, 240, 255, opacity),
    );
}

fn draw_cells(pixmap: &mut Pixmap, fonts: &Fonts, layout: &PanelLayout, snapshot: &Snapshot, opacity: f32) {
    let number_paint = solid(34, 211, 238, 255, opacity);
    let unit_paint = solid(163, 163, 163, 255, opacity);

    for (i, (unit, value)) in snapshot.time_left.cells().iter().enumerate() {
        let column = i % layout.columns;
        let row = i / layout.columns;
        let center_x = layout.grid_left + layout.cell_width * (column as f32 + 0.5);
        let top = layout.grid_top + row as f32 * (CELL_HEIGHT + 16.0);

        fonts.bold.draw_centered(
            pixmap,
            &dashboard::format_cell(*value),
            center_x,
            top + NUMBER_SIZE,
            NUMBER_SIZE,
            &number_paint,
        );
        fonts.regular.draw_centered(
            pixmap,
            unit.label(),
            center_x,
            top + NUMBER_SIZE + 8.0 + UNIT_SIZE,
            UNIT_SIZE,
            &unit_paint,
        );
    }
}

fn draw_progress(pixmap: &mut Pixmap, face: &Typeface, layout: &PanelLayout, progress: f64) {
    let track = create_rounded_rect(layout.bar, BAR_HEIGHT / 2.0);
    pixmap.fill_path(
        &track,
        &solid(30, 41, 59, 255, 1.0),
        FillRule::Winding,
        Transform::identity(),
        None,
    );

    let fill_width = progress_fill_width(layout.bar.width(), progress);
    if let Some(fill) = Rect::from_xywh(layout.bar.x(), layout.bar.y(), fill_width, BAR_HEIGHT) {
        let radius = (BAR_HEIGHT / 2.0).min(fill_width / 2.0);
        pixmap.fill_path(
            &create_rounded_rect(fill, radius),
            &solid(34, 211, 238, 255, 1.0),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    face.draw_centered(
        pixmap,
        &dashboard::percentage_label(progress),
        layout.bar.x() + layout.bar.width() / 2.0,
        layout.percent_baseline,
        PERCENT_SIZE,
        &solid(163, 163, 163, 255, 1.0),
    );
}

fn draw_quote(
    pixmap: &mut Pixmap,
    face: &Typeface,
    layout: &PanelLayout,
    lines: &[String],
    author: &str,
    opacity: f32,
) {
    let center_x = layout.panel.x() + layout.panel.width() / 2.0;
    let text_paint = solid(212, 212, 212, 255, opacity);

    let mut baseline = layout.quote_top + QUOTE_SIZE;
    for line in lines {
        face.draw_centered(pixmap, line, center_x, baseline, QUOTE_SIZE, &text_paint);
        baseline += QUOTE_LINE;
    }

    face.draw_centered(
        pixmap,
        &dashboard::attribution(author),
        center_x,
        baseline + 8.0,
        AUTHOR_SIZE,
        &solid(115, 115, 115, 255, opacity),
    );
}

fn create_rounded_rect(rect: Rect, radius: f32) -> Path {
    let mut pb = PathBuilder::new();

    let x = rect.x();
    let y = rect.y();
    let w = rect.width();
    let h = rect.height();

    pb.move_to(x + radius, y);
    pb.line_to(x + w - radius, y);
    pb.quad_to(x + w, y, x + w, y + radius);
    pb.line_to(x + w, y + h - radius);
    pb.quad_to(x + w, y + h, x + w - radius, y + h);
    pb.line_to(x + radius, y + h);
    pb.quad_to(x, y + h, x, y + h - radius);
    pb.line_to(x, y + radius);
    pb.quad_to(x, y, x + radius, y);
    pb.close();

    // Degenerate sizes fall back to a plain rect
    pb.finish().unwrap_or_else(|| PathBuilder::from_rect(rect))
}
