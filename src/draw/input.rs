use crate::draw::model::{is_valid_width, Color, Point, StrokeStyle};
use crate::draw::surface::{DirtyRect, RasterSurface};
use anyhow::{bail, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeState {
    Idle,
    Drawing { last: Point },
}

/// Pointer lifecycle events as delivered by the UI layer, already translated
/// to surface-local coordinates. Touch input reports its first touch point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    Leave,
}

/// Owns the raster surface for a drawing session and paints freehand strokes
/// onto it one segment at a time.
#[derive(Debug, Clone)]
pub struct StrokeRenderer {
    surface: RasterSurface,
    style: StrokeStyle,
    state: StrokeState,
}

impl StrokeRenderer {
    pub fn new(surface: RasterSurface, style: StrokeStyle) -> Self {
        Self {
            surface,
            style,
            state: StrokeState::Idle,
        }
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    /// Mutable access for painting outside the stroke lifecycle (shape
    /// helpers). The surface cannot be swapped for one of another size.
    pub fn surface_mut(&mut self) -> &mut RasterSurface {
        &mut self.surface
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    pub fn begin(&mut self, point: Point) {
        tracing::trace!(x = point.x, y = point.y, "stroke begin");
        self.state = StrokeState::Drawing { last: point };
    }

    pub fn extend(&mut self, point: Point) -> Option<DirtyRect> {
        let StrokeState::Drawing { last } = self.state else {
            return None;
        };
        let dirty = self.surface.stroke_segment(last, point, &self.style);
        self.state = StrokeState::Drawing { last: point };
        dirty
    }

    pub fn end(&mut self) {
        if self.is_drawing() {
            tracing::trace!("stroke end");
        }
        self.state = StrokeState::Idle;
    }

    pub fn clear(&mut self) {
        self.surface.clear();
    }

    pub fn set_color(&mut self, css: &str) -> Result<Color> {
        let color = Color::parse_css(css)?;
        self.style.color = color;
        Ok(color)
    }

    pub fn set_width(&mut self, width: f32) -> Result<()> {
        if !is_valid_width(width) {
            bail!("stroke width must be a positive number, got {width}");
        }
        self.style.width = width;
        Ok(())
    }

    pub fn handle(&mut self, event: PointerEvent) -> Option<DirtyRect> {
        match event {
            PointerEvent::Down(point) => {
                self.begin(point);
                None
            }
            PointerEvent::Move(point) => self.extend(point),
            PointerEvent::Up | PointerEvent::Leave => {
                self.end();
                None
            }
        }
    }
}
