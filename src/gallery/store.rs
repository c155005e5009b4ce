use crate::clock::Clock;
use crate::draw::capture::{format_timestamp, Snapshot};
use crate::storage::{KeyValueStore, CANVAS_DRAWINGS_KEY};
use anyhow::{Context, Result};
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

pub const GALLERY_LIMIT: usize = 10;

/// Saved snapshots, newest first, bounded to [`GALLERY_LIMIT`] entries. The
/// whole list is written under [`CANVAS_DRAWINGS_KEY`] after every change.
pub struct GalleryStore<S: KeyValueStore> {
    backend: S,
    clock: Rc<dyn Clock>,
    snapshots: VecDeque<Snapshot>,
}

impl<S: KeyValueStore> GalleryStore<S> {
    /// Build a store over `backend` and load whatever it already holds.
    pub fn open(backend: S, clock: Rc<dyn Clock>) -> Self {
        let mut store = Self {
            backend,
            clock,
            snapshots: VecDeque::new(),
        };
        store.snapshots = store.load_all().into();
        store
    }

    /// Read the persisted list. Missing or malformed data reads as empty.
    /// Repeated timestamps keep only their first (newest) entry.
    pub fn load_all(&self) -> Vec<Snapshot> {
        let raw = match self.backend.get_item(CANVAS_DRAWINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("failed to read saved drawings: {e:#}");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Snapshot>>(&raw) {
            Ok(mut list) => {
                let before = list.len();
                let mut seen = HashSet::new();
                list.retain(|s| seen.insert(s.timestamp.clone()));
                if list.len() != before {
                    tracing::warn!(
                        dropped = before - list.len(),
                        "saved drawings held repeated timestamps"
                    );
                }
                list.truncate(GALLERY_LIMIT);
                list
            }
            Err(e) => {
                tracing::warn!("saved drawings are malformed, ignoring them: {e}");
                Vec::new()
            }
        }
    }

    /// Reload the in-memory list from the backend.
    pub fn reload(&mut self) {
        self.snapshots = self.load_all().into();
    }

    /// Put `snapshot` at the front and evict the oldest entries past the
    /// limit. On a failed write the in-memory list keeps the change and the
    /// error is returned so the caller can warn the user.
    pub fn append(&mut self, mut snapshot: Snapshot) -> Result<()> {
        snapshot.saved_at = format_timestamp(self.clock.now());
        self.snapshots
            .retain(|existing| existing.timestamp != snapshot.timestamp);
        self.snapshots.push_front(snapshot);
        while self.snapshots.len() > GALLERY_LIMIT {
            if let Some(evicted) = self.snapshots.pop_back() {
                tracing::debug!(timestamp = %evicted.timestamp, "evicted oldest drawing");
            }
        }
        self.persist()
    }

    /// Remove the snapshot with `timestamp`. Unknown timestamps are ignored.
    pub fn remove(&mut self, timestamp: &str) -> Result<bool> {
        let before = self.snapshots.len();
        self.snapshots.retain(|s| s.timestamp != timestamp);
        if self.snapshots.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.snapshots.clear();
        self.persist()
    }

    pub fn get(&self, timestamp: &str) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.timestamp == timestamp)
    }

    pub fn snapshots(&self) -> &VecDeque<Snapshot> {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.snapshots).context("serialize saved drawings")?;
        self.backend
            .set_item(CANVAS_DRAWINGS_KEY, &json)
            .context("persist saved drawings")
    }
}
