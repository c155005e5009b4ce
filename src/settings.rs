use crate::draw::messages::{DEFAULT_FADE_MS, DEFAULT_VISIBLE_MS};
use crate::storage::{DEFAULT_QUOTA_BYTES, STORAGE_FILE_NAME};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Canvas size in pixels. Fixed for the lifetime of a session.
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Initial brush color as a CSS color string.
    pub brush_color: String,
    /// Initial brush width in pixels.
    pub brush_width: f32,
    pub storage_path: String,
    /// Maximum bytes the key/value store may hold. `None` disables the limit.
    pub storage_quota_bytes: Option<usize>,
    /// Folder downloads are written to. Defaults to the user's download
    /// folder, or the working directory if there is none.
    pub download_dir: Option<String>,
    pub message_visible_ms: i64,
    pub message_fade_ms: i64,
    pub message_log_file: Option<String>,
    /// When enabled the application initialises the logger at debug level.
    pub debug_logging: bool,
    pub log_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: 600,
            canvas_height: 400,
            brush_color: "#000000".into(),
            brush_width: 5.0,
            storage_path: STORAGE_FILE_NAME.into(),
            storage_quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            download_dir: None,
            message_visible_ms: DEFAULT_VISIBLE_MS,
            message_fade_ms: DEFAULT_FADE_MS,
            message_log_file: Some(crate::toast_log::TOAST_LOG_FILE.into()),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return PathBuf::from(dir);
        }
        dirs_next::download_dir().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SETTINGS_FILE);
        let settings = Settings::load(&path.to_string_lossy()).expect("load");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r##"{"brush_color": "#ff0000", "canvas_width": 320}"##).unwrap();

        let settings = Settings::load(&path.to_string_lossy()).expect("load");
        assert_eq!(settings.brush_color, "#ff0000");
        assert_eq!(settings.canvas_width, 320);
        assert_eq!(settings.canvas_height, 400);
    }

    #[test]
    fn roundtrip_through_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SETTINGS_FILE);
        let mut settings = Settings::default();
        settings.download_dir = Some("exports".into());
        settings.debug_logging = true;

        settings.save(&path.to_string_lossy()).expect("save");
        let loaded = Settings::load(&path.to_string_lossy()).expect("load");
        assert_eq!(loaded, settings);
        assert_eq!(loaded.download_dir(), PathBuf::from("exports"));
    }
}
