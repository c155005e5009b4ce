use crate::draw::capture::{parse_timestamp, Snapshot};
use crate::gallery::store::GalleryStore;
use crate::storage::KeyValueStore;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, Utc};
use std::path::{Path, PathBuf};

pub const THUMBNAIL_ALT: &str = "Saved drawing";

/// One entry of the gallery strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub timestamp: String,
    pub data_url: String,
    pub alt: &'static str,
}

/// Enlarged view of one snapshot with its download and delete actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingDetail {
    pub timestamp: String,
    pub data_url: String,
    pub saved_label: String,
}

/// The UI surface the projector drives. Implementations own presentation
/// only; all state decisions are made by the projector.
pub trait GalleryView {
    /// Discard whatever is shown and show `items` in order.
    fn replace_items(&mut self, items: Vec<GalleryItem>);
    fn show_detail(&mut self, detail: DrawingDetail);
    fn close_detail(&mut self);
}

pub fn download_filename(now: DateTime<Utc>) -> String {
    format!("drawing_{}.png", now.timestamp_millis())
}

fn saved_label(timestamp: &str) -> String {
    match parse_timestamp(timestamp) {
        Ok(at) => format!(
            "Saved at: {}",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
        ),
        Err(_) => format!("Saved at: {timestamp}"),
    }
}

/// Keeps a [`GalleryView`] in sync with a [`GalleryStore`].
pub struct GalleryProjector<V: GalleryView> {
    view: V,
    open_detail: Option<String>,
    download_dir: PathBuf,
}

impl<V: GalleryView> GalleryProjector<V> {
    pub fn new(view: V, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            view,
            open_detail: None,
            download_dir: download_dir.into(),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn open_detail(&self) -> Option<&str> {
        self.open_detail.as_deref()
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Rebuild the visible list from scratch.
    pub fn render<'a>(&mut self, snapshots: impl IntoIterator<Item = &'a Snapshot>) {
        let items: Vec<GalleryItem> = snapshots
            .into_iter()
            .map(|s| GalleryItem {
                timestamp: s.timestamp.clone(),
                data_url: s.data_url.clone(),
                alt: THUMBNAIL_ALT,
            })
            .collect();
        tracing::debug!(count = items.len(), "rendering gallery");
        self.view.replace_items(items);
    }

    /// Open the detail view for `timestamp`. Returns `false` when the store
    /// no longer holds it.
    pub fn open<S: KeyValueStore>(&mut self, store: &GalleryStore<S>, timestamp: &str) -> bool {
        let Some(snapshot) = store.get(timestamp) else {
            return false;
        };
        self.view.show_detail(DrawingDetail {
            timestamp: snapshot.timestamp.clone(),
            data_url: snapshot.data_url.clone(),
            saved_label: saved_label(&snapshot.timestamp),
        });
        self.open_detail = Some(snapshot.timestamp.clone());
        true
    }

    pub fn close(&mut self) {
        if self.open_detail.take().is_some() {
            self.view.close_detail();
        }
    }

    /// Write the snapshot's PNG into the download folder.
    pub fn download<S: KeyValueStore>(
        &self,
        store: &GalleryStore<S>,
        timestamp: &str,
        now: DateTime<Utc>,
    ) -> Result<PathBuf> {
        let snapshot = store
            .get(timestamp)
            .ok_or_else(|| anyhow!("no saved drawing with timestamp {timestamp}"))?;
        let png = snapshot.png_bytes()?;
        std::fs::create_dir_all(&self.download_dir).with_context(|| {
            format!("create download folder {}", self.download_dir.display())
        })?;
        let path = self.download_dir.join(download_filename(now));
        std::fs::write(&path, png)
            .with_context(|| format!("write drawing to {}", path.display()))?;
        tracing::info!("downloaded drawing to {}", path.display());
        Ok(path)
    }

    /// Remove the snapshot from the store, then re-render and close the
    /// detail view. The view is refreshed even if persisting the removal
    /// failed; that error is still returned.
    pub fn delete<S: KeyValueStore>(
        &mut self,
        store: &mut GalleryStore<S>,
        timestamp: &str,
    ) -> Result<()> {
        let removed = store.remove(timestamp);
        self.render(store.snapshots());
        if self.open_detail.as_deref() == Some(timestamp) {
            self.close();
        }
        removed.map(|_| ())
    }
}
