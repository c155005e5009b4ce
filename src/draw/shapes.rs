//! Scriptable primitives painted with their own color. They never change the
//! brush configured on the [`StrokeRenderer`](crate::draw::input::StrokeRenderer),
//! but outlines are stroked at the brush width.

use crate::draw::model::{Color, LineCap, Point, StrokeStyle};
use crate::draw::surface::RasterSurface;
use crate::draw::text::fill_text;
use anyhow::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Stroke,
    Fill,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rectangle {
        origin: Point,
        width: f32,
        height: f32,
        paint: Paint,
    },
    Circle {
        center: Point,
        radius: f32,
        paint: Paint,
    },
    Line {
        start: Point,
        end: Point,
        width: f32,
    },
    /// `origin` sits on the text's baseline.
    Text {
        text: String,
        origin: Point,
        size: f32,
    },
}

/// Rectangle and circle outlines use the brush width; lines carry their own.
/// Both use round caps like freehand strokes.
pub fn draw_shape(
    surface: &mut RasterSurface,
    shape: Shape,
    color: Color,
    brush: &StrokeStyle,
) -> Result<()> {
    let outline = StrokeStyle {
        width: brush.width,
        color,
        cap: LineCap::Round,
    };
    match shape {
        Shape::Rectangle {
            origin,
            width,
            height,
            paint: Paint::Fill,
        } => surface.fill_rect(origin, width, height, color),
        Shape::Rectangle {
            origin,
            width,
            height,
            paint: Paint::Stroke,
        } => surface.stroke_rect(origin, width, height, &outline),
        Shape::Circle {
            center,
            radius,
            paint: Paint::Fill,
        } => surface.fill_circle(center, radius, color),
        Shape::Circle {
            center,
            radius,
            paint: Paint::Stroke,
        } => surface.stroke_circle(center, radius, &outline),
        Shape::Line { start, end, width } => {
            let style = StrokeStyle {
                width: width.max(f32::MIN_POSITIVE),
                ..outline
            };
            let _ = surface.stroke_segment(start, end, &style);
        }
        Shape::Text { text, origin, size } => fill_text(surface, &text, origin, size, color)?,
    }
    Ok(())
}
