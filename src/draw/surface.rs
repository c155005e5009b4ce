use crate::draw::model::{Color, LineCap, Point, StrokeStyle};

/// Pixel-space bounds touched by a paint operation, clamped to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl DirtyRect {
    fn covering(min: Point, max: Point, surface_width: u32, surface_height: u32) -> Option<Self> {
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = max.x.ceil().min(surface_width as f32);
        let y1 = max.y.ceil().min(surface_height as f32);
        if !(x1 > x0 && y1 > y0) {
            return None;
        }
        Some(Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    fn pixels(self) -> impl Iterator<Item = (u32, u32)> {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| (x, y)))
    }
}

/// A fixed-size RGBA8 pixel buffer. A fresh or cleared surface is fully
/// transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        Self {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Zero-sized surfaces cannot be captured.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let idx = self.index(x, y)?;
        let px = &self.pixels[idx..idx + 4];
        Some(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&b| b == 0)
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Paint one stroke segment. Every pixel whose center lies within half the
    /// stroke width of the segment receives the stroke color.
    pub fn stroke_segment(
        &mut self,
        start: Point,
        end: Point,
        style: &StrokeStyle,
    ) -> Option<DirtyRect> {
        // Anything thinner than a pixel would leave gaps on diagonals.
        let radius = (style.width / 2.0).max(0.5);
        let bounds = DirtyRect::covering(
            Point::new(start.x.min(end.x) - radius, start.y.min(end.y) - radius),
            Point::new(start.x.max(end.x) + radius, start.y.max(end.y) + radius),
            self.width,
            self.height,
        )?;
        let radius_sq = radius * radius;
        for (x, y) in bounds.pixels() {
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if segment_distance_sq(center, start, end, style.cap) <= radius_sq {
                self.blend_pixel(x, y, style.color);
            }
        }
        Some(bounds)
    }

    pub fn fill_rect(&mut self, origin: Point, width: f32, height: f32, color: Color) {
        let (min, max) = normalized_rect(origin, width, height);
        let Some(bounds) = DirtyRect::covering(min, max, self.width, self.height) else {
            return;
        };
        for (x, y) in bounds.pixels() {
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if inside(center, min, max) {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Outline a rectangle with the stroke centered on its edges (mitered
    /// corners).
    pub fn stroke_rect(&mut self, origin: Point, width: f32, height: f32, style: &StrokeStyle) {
        let half = style.width / 2.0;
        let (min, max) = normalized_rect(origin, width, height);
        let outer_min = Point::new(min.x - half, min.y - half);
        let outer_max = Point::new(max.x + half, max.y + half);
        let inner_min = Point::new(min.x + half, min.y + half);
        let inner_max = Point::new(max.x - half, max.y - half);
        let Some(bounds) = DirtyRect::covering(outer_min, outer_max, self.width, self.height)
        else {
            return;
        };
        for (x, y) in bounds.pixels() {
            let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if inside(center, outer_min, outer_max) && !inside(center, inner_min, inner_max) {
                self.blend_pixel(x, y, style.color);
            }
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.paint_ring(center, 0.0, radius.max(0.0), color);
    }

    pub fn stroke_circle(&mut self, center: Point, radius: f32, style: &StrokeStyle) {
        let half = style.width / 2.0;
        self.paint_ring(center, (radius - half).max(0.0), radius + half, style.color);
    }

    /// Composite `color` through a row-major coverage mask the size of the
    /// surface. Coverage scales the color's alpha.
    pub fn paint_coverage(&mut self, coverage: &[u8], color: Color) {
        let width = self.width as usize;
        if width == 0 {
            return;
        }
        for (i, &cov) in coverage.iter().enumerate() {
            if cov == 0 {
                continue;
            }
            let alpha = (u16::from(color.a) * u16::from(cov) / 255) as u8;
            let (x, y) = ((i % width) as u32, (i / width) as u32);
            self.blend_pixel(x, y, Color { a: alpha, ..color });
        }
    }

    fn paint_ring(&mut self, center: Point, inner: f32, outer: f32, color: Color) {
        let Some(bounds) = DirtyRect::covering(
            Point::new(center.x - outer, center.y - outer),
            Point::new(center.x + outer, center.y + outer),
            self.width,
            self.height,
        ) else {
            return;
        };
        let inner_sq = inner * inner;
        let outer_sq = outer * outer;
        for (x, y) in bounds.pixels() {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq <= outer_sq && (inner <= 0.0 || dist_sq >= inner_sq) {
                self.blend_pixel(x, y, color);
            }
        }
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + x as usize) * 4)
    }

    fn blend_pixel(&mut self, x: u32, y: u32, top: Color) {
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let dst = &mut self.pixels[idx..idx + 4];
        let blended = blend_over(Color::rgba(dst[0], dst[1], dst[2], dst[3]), top);
        dst.copy_from_slice(&blended.to_array());
    }
}

fn normalized_rect(origin: Point, width: f32, height: f32) -> (Point, Point) {
    let other = Point::new(origin.x + width, origin.y + height);
    (
        Point::new(origin.x.min(other.x), origin.y.min(other.y)),
        Point::new(origin.x.max(other.x), origin.y.max(other.y)),
    )
}

fn inside(point: Point, min: Point, max: Point) -> bool {
    point.x >= min.x && point.x < max.x && point.y >= min.y && point.y < max.y
}

fn segment_distance_sq(point: Point, start: Point, end: Point, cap: LineCap) -> f32 {
    let vx = end.x - start.x;
    let vy = end.y - start.y;
    let len_sq = vx * vx + vy * vy;
    let t = if len_sq <= f32::EPSILON {
        if cap == LineCap::Butt {
            return f32::INFINITY;
        }
        0.0
    } else {
        let t = ((point.x - start.x) * vx + (point.y - start.y) * vy) / len_sq;
        if cap == LineCap::Butt && !(0.0..=1.0).contains(&t) {
            return f32::INFINITY;
        }
        t.clamp(0.0, 1.0)
    };
    let dx = point.x - (start.x + vx * t);
    let dy = point.y - (start.y + vy * t);
    dx * dx + dy * dy
}

/// Source-over compositing on straight (non-premultiplied) alpha.
fn blend_over(bottom: Color, top: Color) -> Color {
    if top.a == 255 {
        return top;
    }
    if top.a == 0 {
        return bottom;
    }
    let sa = top.a as f32 / 255.0;
    let da = bottom.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= f32::EPSILON {
        return Color::TRANSPARENT;
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Color::rgba(
        blend(top.r, bottom.r),
        blend(top.g, bottom.g),
        blend(top.b, bottom.b),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    )
}
