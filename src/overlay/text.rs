//! Text shaping and glyph rasterization
//!
//! Faces are looked up in the system font database, shaped with rustybuzz and
//! their outlines are turned into tiny-skia paths.

use fontdb::{Database, Family, Query, Weight};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use super::OverlayError;

/// Font data for one face
pub struct Typeface {
    data: Vec<u8>,
    index: u32,
}

struct PlacedGlyph {
    id: ttf_parser::GlyphId,
    x: f32,
    y: f32,
}

/// The two weights the overlay uses
pub struct Fonts {
    pub regular: Typeface,
    pub bold: Typeface,
}

impl Fonts {
    pub fn load() -> Result<Self, OverlayError> {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("Font database has {} faces", db.len());

        Ok(Self {
            regular: Typeface::query(&db, Weight::NORMAL)?,
            bold: Typeface::query(&db, Weight::BOLD)?,
        })
    }
}

impl Typeface {
    fn query(db: &Database, weight: Weight) -> Result<Self, OverlayError> {
        let id = db
            .query(&Query {
                families: &[Family::SansSerif],
                weight,
                ..Query::default()
            })
            .ok_or(OverlayError::NoFont)?;

        db.with_face_data(id, |data, index| Self {
            data: data.to_vec(),
            index,
        })
        .ok_or(OverlayError::NoFont)
    }

    /// Shape `text` at `size` pixels into positioned glyphs and total advance
    fn layout(&self, text: &str, size: f32) -> Option<(Vec<PlacedGlyph>, f32)> {
        let face = rustybuzz::Face::from_slice(&self.data, self.index)?;
        let scale = size / face.units_per_em() as f32;

        let mut buffer = rustybuzz::UnicodeBuffer::new();
        buffer.push_str(text);
        let shaped = rustybuzz::shape(&face, &[], buffer);

        let mut pen = 0.0;
        let mut glyphs = Vec::with_capacity(shaped.len());
        for (info, pos) in shaped.glyph_infos().iter().zip(shaped.glyph_positions()) {
            let x = pen + pos.x_offset as f32 * scale;
            let y = pos.y_offset as f32 * scale;
            glyphs.push(PlacedGlyph {
                id: ttf_parser::GlyphId(info.glyph_id as u16),
                x,
                y,
            });
            pen += pos.x_advance as f32 * scale;
        }
        Some((glyphs, pen))
    }

    /// Advance width of `text` in pixels
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        self.layout(text, size).map_or(0.0, |(_, advance)| advance)
    }

    /// Draw `text` with its baseline starting at (`x`, `baseline`)
    pub fn draw(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        x: f32,
        baseline: f32,
        size: f32,
        paint: &Paint,
    ) {
        let Some((glyphs, _)) = self.layout(text, size) else {
            return;
        };

        let Ok(face) = ttf_parser::Face::parse(&self.data, self.index) else {
            return;
        };
        let scale = size / face.units_per_em() as f32;

        let mut builder = PathBuilder::new();
        for glyph in glyphs {
            let mut outline = Outline {
                builder: &mut builder,
                scale,
                x: x + glyph.x,
                y: baseline - glyph.y,
            };
            face.outline_glyph(glyph.id, &mut outline);
        }

        if let Some(path) = builder.finish() {
            pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    /// Draw `text` horizontally centered on `center_x`
    pub fn draw_centered(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        center_x: f32,
        baseline: f32,
        size: f32,
        paint: &Paint,
    ) {
        let width = self.measure(text, size);
        self.draw(pixmap, text, center_x - width / 2.0, baseline, size, paint);
    }

    /// Greedy word wrap to `max_width`
    pub fn wrap(&self, text: &str, size: f32, max_width: f32) -> Vec<String> {
        wrap_words(text, max_width, |s| self.measure(s, size))
    }
}

/// Greedy word wrap with a caller-supplied width function
pub fn wrap_words(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }

        let candidate = format!("{} {}", line, word);
        if measure(&candidate) <= max_width {
            line = candidate;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Feeds font-unit outlines into a pixel-space path, flipping y
struct Outline<'a> {
    builder: &'a mut PathBuilder,
    scale: f32,
    x: f32,
    y: f32,
}

impl Outline<'_> {
    fn point(&self, x: f32, y: f32) -> (f32, f32) {
        (self.x + x * self.scale, self.y - y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for Outline<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.point(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x, y) = self.point(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.point(x1, y1);
        let (x2, y2) = self.point(x2, y2);
        let (x, y) = self.point(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every character is 10px wide
    fn mono(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    #[test]
    fn test_wrap_fits_on_one_line() {
        assert_eq!(wrap_words("Keep going.", 500.0, mono), vec!["Keep going."]);
    }

    #[test]
    fn test_wrap_breaks_between_words() {
        let lines = wrap_words(
            "It does not matter how slowly you go as long as you do not stop.",
            200.0,
            mono,
        );
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(mono(line) <= 200.0, "{:?} too wide", line);
        }
        assert_eq!(
            lines.join(" "),
            "It does not matter how slowly you go as long as you do not stop."
        );
    }

    #[test]
    fn test_wrap_keeps_overlong_word() {
        let lines = wrap_words("supercalifragilistic ok", 50.0, mono);
        assert_eq!(lines, vec!["supercalifragilistic", "ok"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert!(wrap_words("   ", 100.0, mono).is_empty());
    }
}
