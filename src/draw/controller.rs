use crate::clock::Clock;
use crate::draw::capture::{Snapshot, SnapshotCapture};
use crate::draw::input::{PointerEvent, StrokeRenderer};
use crate::draw::messages::Notifier;
use crate::draw::model::{Color, StrokeStyle};
use crate::draw::shapes::{draw_shape, Shape};
use crate::draw::surface::{DirtyRect, RasterSurface};
use crate::gallery::{GalleryProjector, GalleryStore, GalleryView};
use crate::storage::KeyValueStore;
use std::path::PathBuf;
use std::rc::Rc;

pub const MSG_SAVED: &str = "Drawing saved!";
pub const MSG_SAVED_NOT_STORED: &str = "Drawing saved, but it could not be stored permanently.";
pub const MSG_REMOVED: &str = "Drawing removed!";
pub const MSG_REMOVE_NOT_STORED: &str = "Drawing removed, but the change could not be stored.";
pub const MSG_DOWNLOAD_FAILED: &str = "Could not download the drawing.";

/// The UI collaborators the canvas feature needs. Anything left as `None`
/// (or `false`) means the host UI did not provide it.
pub struct CanvasHooks<V> {
    pub surface: Option<RasterSurface>,
    pub brush_color: Option<String>,
    pub brush_width: Option<f32>,
    pub clear_control: bool,
    pub save_control: bool,
    pub gallery: Option<V>,
}

impl<V> CanvasHooks<V> {
    pub fn complete(surface: RasterSurface, brush_color: &str, brush_width: f32, gallery: V) -> Self {
        Self {
            surface: Some(surface),
            brush_color: Some(brush_color.to_string()),
            brush_width: Some(brush_width),
            clear_control: true,
            save_control: true,
            gallery: Some(gallery),
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.surface.as_ref().map_or(true, RasterSurface::is_empty) {
            missing.push("surface");
        }
        if self.brush_color.is_none() {
            missing.push("brush color");
        }
        if self.brush_width.is_none() {
            missing.push("brush width");
        }
        if !self.clear_control {
            missing.push("clear control");
        }
        if !self.save_control {
            missing.push("save control");
        }
        if self.gallery.is_none() {
            missing.push("gallery");
        }
        missing
    }
}

/// The drawing feature: stroke rendering, capture, the persisted gallery and
/// user messages wired together.
pub struct CanvasModule<S: KeyValueStore, V: GalleryView> {
    renderer: StrokeRenderer,
    capture: SnapshotCapture,
    store: GalleryStore<S>,
    projector: GalleryProjector<V>,
    notifier: Notifier,
    clock: Rc<dyn Clock>,
}

impl<S: KeyValueStore, V: GalleryView> CanvasModule<S, V> {
    /// Mount the feature on the given hooks. If any hook is missing the
    /// feature stays inactive and `None` is returned.
    pub fn mount(
        hooks: CanvasHooks<V>,
        backend: S,
        clock: Rc<dyn Clock>,
        notifier: Notifier,
        download_dir: impl Into<PathBuf>,
    ) -> Option<Self> {
        let missing = hooks.missing();
        if !missing.is_empty() {
            tracing::warn!("canvas feature disabled, missing: {}", missing.join(", "));
            return None;
        }
        let CanvasHooks {
            surface: Some(surface),
            brush_color: Some(brush_color),
            brush_width: Some(brush_width),
            gallery: Some(gallery),
            ..
        } = hooks
        else {
            return None;
        };

        let mut renderer = StrokeRenderer::new(surface, StrokeStyle::default());
        if let Err(e) = renderer.set_color(&brush_color) {
            tracing::warn!("initial brush color rejected: {e}");
        }
        if let Err(e) = renderer.set_width(brush_width) {
            tracing::warn!("initial brush width rejected: {e}");
        }

        let store = GalleryStore::open(backend, clock.clone());
        let mut projector = GalleryProjector::new(gallery, download_dir);
        projector.render(store.snapshots());
        tracing::info!(saved = store.len(), "canvas feature mounted");

        Some(Self {
            renderer,
            capture: SnapshotCapture::new(clock.clone()),
            store,
            projector,
            notifier,
            clock,
        })
    }

    pub fn renderer(&self) -> &StrokeRenderer {
        &self.renderer
    }

    pub fn store(&self) -> &GalleryStore<S> {
        &self.store
    }

    pub fn projector(&self) -> &GalleryProjector<V> {
        &self.projector
    }

    pub fn projector_mut(&mut self) -> &mut GalleryProjector<V> {
        &mut self.projector
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub fn pointer(&mut self, event: PointerEvent) -> Option<DirtyRect> {
        self.renderer.handle(event)
    }

    pub fn set_brush_color(&mut self, css: &str) -> bool {
        match self.renderer.set_color(css) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("ignoring brush color: {e}");
                false
            }
        }
    }

    pub fn set_brush_width(&mut self, width: f32) -> bool {
        match self.renderer.set_width(width) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!("ignoring brush width: {e}");
                false
            }
        }
    }

    pub fn clear_canvas(&mut self) {
        self.renderer.clear();
    }

    pub fn draw_shape(&mut self, shape: Shape, color_css: &str) -> bool {
        let Ok(color) = Color::parse_css(color_css) else {
            tracing::debug!("ignoring shape with color {color_css}");
            return false;
        };
        let brush = *self.renderer.style();
        match draw_shape(self.renderer.surface_mut(), shape, color, &brush) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("shape not drawn: {e:#}");
                false
            }
        }
    }

    /// Capture the surface into the gallery. The snapshot is kept in memory
    /// even if it could not be persisted.
    pub fn save_drawing(&mut self) -> Option<Snapshot> {
        let snapshot = match self.capture.capture(self.renderer.surface()) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("capture failed: {e:#}");
                return None;
            }
        };
        let stored = self.store.append(snapshot.clone());
        self.projector.render(self.store.snapshots());
        match stored {
            Ok(()) => {
                self.notifier.success(MSG_SAVED);
            }
            Err(e) => {
                tracing::warn!("failed to persist drawing: {e:#}");
                self.notifier.warn(MSG_SAVED_NOT_STORED);
            }
        }
        self.store.get(&snapshot.timestamp).cloned()
    }

    pub fn open_drawing(&mut self, timestamp: &str) -> bool {
        self.projector.open(&self.store, timestamp)
    }

    pub fn close_drawing(&mut self) {
        self.projector.close();
    }

    pub fn download_drawing(&mut self, timestamp: &str) -> Option<PathBuf> {
        match self
            .projector
            .download(&self.store, timestamp, self.clock.now())
        {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::error!("download failed: {e:#}");
                self.notifier.error(MSG_DOWNLOAD_FAILED);
                None
            }
        }
    }

    pub fn delete_drawing(&mut self, timestamp: &str) {
        match self.projector.delete(&mut self.store, timestamp) {
            Ok(()) => {
                self.notifier.success(MSG_REMOVED);
            }
            Err(e) => {
                tracing::warn!("failed to persist drawing removal: {e:#}");
                self.notifier.warn(MSG_REMOVE_NOT_STORED);
            }
        }
    }

    pub fn tick(&mut self) {
        self.notifier.tick();
    }
}
