use anyhow::{anyhow, bail, Result};

/// A point in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Translate a device-space position into the surface's local space.
pub fn to_surface_local(device: Point, surface_origin: Point) -> Point {
    Point::new(device.x - surface_origin.x, device.y - surface_origin.y)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse the subset of CSS color syntax a color picker or script is
    /// expected to hand us: hex forms, `rgb()`/`rgba()` and a few names.
    pub fn parse_css(input: &str) -> Result<Self> {
        let value = input.trim().to_ascii_lowercase();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
        {
            let args = args
                .strip_suffix(')')
                .ok_or_else(|| anyhow!("unterminated color function: {input}"))?;
            return parse_rgb_args(args);
        }
        named_color(&value).ok_or_else(|| anyhow!("unsupported color: {input}"))
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn parse_hex(hex: &str) -> Result<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("invalid hex color: #{hex}");
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    let color = match hex.len() {
        3 => Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, 255),
        4 => Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
        6 => Color::rgba(byte(0)?, byte(2)?, byte(4)?, 255),
        8 => Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => bail!("invalid hex color length: #{hex}"),
    };
    Ok(color)
}

fn parse_rgb_args(args: &str) -> Result<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        bail!("expected 3 or 4 color components, got {}", parts.len());
    }
    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        let value: f32 = part.parse().map_err(|_| anyhow!("bad channel: {part}"))?;
        if !(0.0..=255.0).contains(&value) {
            bail!("channel out of range: {part}");
        }
        *slot = value.round() as u8;
    }
    let alpha = match parts.get(3) {
        Some(part) => {
            let value: f32 = part.parse().map_err(|_| anyhow!("bad alpha: {part}"))?;
            if !(0.0..=1.0).contains(&value) {
                bail!("alpha out of range: {part}");
            }
            (value * 255.0).round() as u8
        }
        None => 255,
    };
    Ok(Color::rgba(channels[0], channels[1], channels[2], alpha))
}

fn named_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::BLACK,
        "white" => Color::WHITE,
        "red" => Color::rgba(255, 0, 0, 255),
        "green" => Color::rgba(0, 128, 0, 255),
        "blue" => Color::rgba(0, 0, 255, 255),
        "yellow" => Color::rgba(255, 255, 0, 255),
        "orange" => Color::rgba(255, 165, 0, 255),
        "purple" => Color::rgba(128, 0, 128, 255),
        "gray" | "grey" => Color::rgba(128, 128, 128, 255),
        "transparent" => Color::TRANSPARENT,
        _ => return None,
    };
    Some(color)
}

/// Consecutive round-capped segments overlap at their shared point, which is
/// what gives freehand strokes their round joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    Butt,
    #[default]
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: Color,
    pub cap: LineCap,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: 5.0,
            color: Color::BLACK,
            cap: LineCap::Round,
        }
    }
}

pub fn is_valid_width(width: f32) -> bool {
    width.is_finite() && width > 0.0
}
