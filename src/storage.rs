use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key holding the drawing gallery.
pub const CANVAS_DRAWINGS_KEY: &str = "canvasDrawings";
/// Key owned by the geolocation history feature; the gallery must never touch it.
pub const GEO_POSITIONS_KEY: &str = "geoPositions";

pub const STORAGE_FILE_NAME: &str = "storage.json";
/// Roughly what browsers grant a single origin.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// String-to-string durable storage. A rejected write leaves the previous
/// value in place.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

fn used_bytes(items: &BTreeMap<String, String>) -> usize {
    items.iter().map(|(k, v)| k.len() + v.len()).sum()
}

fn check_quota(
    items: &BTreeMap<String, String>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<()> {
    let Some(quota) = quota else {
        return Ok(());
    };
    let current = items.get(key).map_or(0, |old| key.len() + old.len());
    let needed = used_bytes(items) - current + key.len() + value.len();
    if needed > quota {
        bail!("storage quota exceeded writing '{key}': {needed} bytes needed, {quota} allowed");
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: BTreeMap::new(),
            quota: Some(quota),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        check_quota(&self.items, key, value, self.quota)?;
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// All keys live in one JSON object on disk, rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing or empty file is an empty store; an
    /// unreadable or malformed one is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>, quota: Option<usize>) -> Self {
        let path = path.into();
        let items = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("storage file {} is malformed, starting empty: {e}", path.display());
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                tracing::warn!("cannot read storage file {}, starting empty: {e}", path.display());
                BTreeMap::new()
            }
        };
        Self { path, items, quota }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create storage folder {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(items).context("serialize storage items")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write storage file {}", self.path.display()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        check_quota(&self.items, key, value, self.quota)?;
        let mut next = self.items.clone();
        next.insert(key.to_string(), value.to_string());
        self.write(&next)?;
        self.items = next;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if !self.items.contains_key(key) {
            return Ok(());
        }
        let mut next = self.items.clone();
        next.remove(key);
        self.write(&next)?;
        self.items = next;
        Ok(())
    }
}
