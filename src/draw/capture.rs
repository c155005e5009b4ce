use crate::clock::Clock;
use crate::draw::surface::RasterSurface;
use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use image::ImageEncoder;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

pub const PNG_MIME: &str = "image/png";
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// One saved rendering of the surface. `timestamp` identifies the snapshot
/// within the gallery; `saved_at` is stamped when it enters the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub data_url: String,
    pub timestamp: String,
    pub saved_at: String,
}

impl Snapshot {
    pub fn png_bytes(&self) -> Result<Vec<u8>> {
        decode_data_url(&self.data_url)
    }

    pub fn created_at(&self) -> Result<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("parse snapshot timestamp {value}"))?;
    Ok(parsed.with_timezone(&Utc))
}

pub fn encode_png(surface: &RasterSurface) -> Result<Vec<u8>> {
    if surface.is_empty() {
        bail!(
            "cannot capture an uninitialized {}x{} surface",
            surface.width(),
            surface.height()
        );
    }
    let mut bytes = Vec::new();
    image::codecs::png::PngEncoder::new(&mut bytes)
        .write_image(
            surface.pixels(),
            surface.width(),
            surface.height(),
            image::ColorType::Rgba8,
        )
        .context("encode surface as png")?;
    Ok(bytes)
}

pub fn png_data_url(png: &[u8]) -> String {
    format!("{PNG_DATA_URL_PREFIX}{}", general_purpose::STANDARD.encode(png))
}

pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let payload = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| anyhow!("not a base64 png data url"))?;
    general_purpose::STANDARD
        .decode(payload)
        .context("decode base64 png payload")
}

pub fn decode_image(data_url: &str) -> Result<image::RgbaImage> {
    let png = decode_data_url(data_url)?;
    let img = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
        .context("decode png snapshot")?;
    Ok(img.to_rgba8())
}

/// Encodes surfaces into snapshots. Timestamps handed out by one capture
/// instance are strictly increasing, even if the clock stalls.
pub struct SnapshotCapture {
    clock: Rc<dyn Clock>,
    last: Option<DateTime<Utc>>,
}

impl SnapshotCapture {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self { clock, last: None }
    }

    pub fn capture(&mut self, surface: &RasterSurface) -> Result<Snapshot> {
        let png = encode_png(surface)?;
        let at = self.next_timestamp();
        let timestamp = format_timestamp(at);
        tracing::debug!(%timestamp, bytes = png.len(), "captured surface");
        Ok(Snapshot {
            data_url: png_data_url(&png),
            saved_at: timestamp.clone(),
            timestamp,
        })
    }

    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let mut at = self.clock.now();
        if let Some(last) = self.last {
            if at <= last {
                at = last + Duration::milliseconds(1);
            }
        }
        self.last = Some(at);
        at
    }
}
