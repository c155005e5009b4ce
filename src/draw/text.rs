//! Text painted with the sans-serif font egui ships with.

use crate::draw::model::{is_valid_width, Color, Point};
use crate::draw::surface::RasterSurface;
use anyhow::{anyhow, bail, Context, Result};
use eframe::egui::FontDefinitions;
use ttf_parser::{Face, OutlineBuilder};

pub const DEFAULT_FONT_SIZE: f32 = 16.0;
const FONT_NAME: &str = "Ubuntu-Light";

/// Collects glyph outlines into one path in surface space. Font units are
/// y-up, the surface is y-down.
struct GlyphPath {
    builder: tiny_skia::PathBuilder,
    scale: f32,
    pen_x: f32,
    baseline: f32,
}

impl GlyphPath {
    fn x(&self, x: f32) -> f32 {
        self.pen_x + x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        self.baseline - y * self.scale
    }
}

impl OutlineBuilder for GlyphPath {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.x(x), self.y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.x(x), self.y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder
            .quad_to(self.x(x1), self.y(y1), self.x(x), self.y(y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.x(x1),
            self.y(y1),
            self.x(x2),
            self.y(y2),
            self.x(x),
            self.y(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Fill `text` with its alphabetic baseline at `origin`, `size` pixels per
/// em. Characters the font lacks are drawn as `?`.
pub fn fill_text(
    surface: &mut RasterSurface,
    text: &str,
    origin: Point,
    size: f32,
    color: Color,
) -> Result<()> {
    if !is_valid_width(size) {
        bail!("font size must be a positive number, got {size}");
    }
    if text.is_empty() || surface.is_empty() {
        return Ok(());
    }

    let fonts = FontDefinitions::default();
    let data = fonts
        .font_data
        .get(FONT_NAME)
        .ok_or_else(|| anyhow!("font {FONT_NAME} is not bundled"))?;
    let face = Face::parse(&data.font, data.index).context("parse bundled font")?;

    let mut path = GlyphPath {
        builder: tiny_skia::PathBuilder::new(),
        scale: size / f32::from(face.units_per_em()),
        pen_x: origin.x,
        baseline: origin.y,
    };
    for ch in text.chars() {
        let Some(glyph) = face.glyph_index(ch).or_else(|| face.glyph_index('?')) else {
            continue;
        };
        // Whitespace has no outline, only an advance.
        let _ = face.outline_glyph(glyph, &mut path);
        path.pen_x += f32::from(face.glyph_hor_advance(glyph).unwrap_or(0)) * path.scale;
    }
    let Some(outline) = path.builder.finish() else {
        return Ok(());
    };

    let mut mask = tiny_skia::Pixmap::new(surface.width(), surface.height())
        .ok_or_else(|| anyhow!("cannot allocate text mask"))?;
    let mut paint = tiny_skia::Paint::default();
    paint.anti_alias = true;
    mask.fill_path(
        &outline,
        &paint,
        tiny_skia::FillRule::Winding,
        tiny_skia::Transform::identity(),
        None,
    );
    let coverage: Vec<u8> = mask.pixels().iter().map(|p| p.alpha()).collect();
    surface.paint_coverage(&coverage, color);
    Ok(())
}
