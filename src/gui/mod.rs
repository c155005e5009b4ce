mod gallery_panel;

pub use gallery_panel::{EguiGalleryView, GalleryAction};

use crate::clock::{Clock, SystemClock};
use crate::draw::messages::{MessageKind, Notifier};
use crate::draw::model::{to_surface_local, Color, Point};
use crate::draw::{CanvasHooks, CanvasModule, PointerEvent, RasterSurface};
use crate::gallery::GalleryView;
use crate::settings::Settings;
use crate::storage::{JsonFileStore, KeyValueStore};
use eframe::egui;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

pub const MIN_BRUSH_WIDTH: f32 = 1.0;
pub const MAX_BRUSH_WIDTH: f32 = 50.0;

type Module = CanvasModule<JsonFileStore, EguiGalleryView>;

/// Bring the renderer's brush width into the slider's range so the control
/// shows what is actually painted.
fn sync_brush_width<S: KeyValueStore, V: GalleryView>(module: &mut CanvasModule<S, V>) -> f32 {
    let width = module
        .renderer()
        .style()
        .width
        .clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH);
    module.set_brush_width(width);
    width
}

pub struct CanvasApp {
    module: Option<Module>,
    brush_color: egui::Color32,
    brush_width: f32,
    canvas_texture: Option<egui::TextureHandle>,
    canvas_dirty: bool,
}

impl CanvasApp {
    pub fn new(settings: &Settings) -> Self {
        let backend = JsonFileStore::open(&settings.storage_path, settings.storage_quota_bytes);
        let clock: Rc<dyn Clock> = Rc::new(SystemClock);
        let notifier = Notifier::new(clock.clone())
            .with_timing(settings.message_visible_ms, settings.message_fade_ms)
            .with_log_file(settings.message_log_file.as_ref().map(PathBuf::from));
        let hooks = CanvasHooks::complete(
            RasterSurface::new(settings.canvas_width, settings.canvas_height),
            &settings.brush_color,
            settings.brush_width,
            EguiGalleryView::default(),
        );
        let mut module = CanvasModule::mount(hooks, backend, clock, notifier, settings.download_dir());

        let initial = module
            .as_ref()
            .map(|m| m.renderer().style().color)
            .unwrap_or(Color::BLACK);
        let brush_width = module
            .as_mut()
            .map(sync_brush_width)
            .unwrap_or_else(|| settings.brush_width.clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH));
        Self {
            module,
            brush_color: egui::Color32::from_rgba_unmultiplied(
                initial.r, initial.g, initial.b, initial.a,
            ),
            brush_width,
            canvas_texture: None,
            canvas_dirty: true,
        }
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        let Some(module) = self.module.as_mut() else {
            return;
        };
        ui.horizontal(|ui| {
            ui.label("Color");
            if ui.color_edit_button_srgba(&mut self.brush_color).changed() {
                let [r, g, b, a] = self.brush_color.to_srgba_unmultiplied();
                module.set_brush_color(&Color::rgba(r, g, b, a).to_hex());
            }
            ui.separator();
            let slider = egui::Slider::new(&mut self.brush_width, MIN_BRUSH_WIDTH..=MAX_BRUSH_WIDTH)
                .text("Width");
            if ui.add(slider).changed() {
                module.set_brush_width(self.brush_width);
            }
            ui.separator();
            if ui.button("Clear").clicked() {
                module.clear_canvas();
                self.canvas_dirty = true;
            }
            if ui.button("Save").clicked() {
                module.save_drawing();
            }
        });
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let Some(module) = self.module.as_mut() else {
            return;
        };
        let surface = module.renderer().surface();
        let size = egui::vec2(surface.width() as f32, surface.height() as f32);
        let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::drag());

        let (pressed, down, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.interact_pos(),
            )
        });
        if let Some(pos) = pos {
            let local = to_surface_local(Point::new(pos.x, pos.y), Point::new(rect.min.x, rect.min.y));
            let event = if !rect.contains(pos) {
                PointerEvent::Leave
            } else if pressed {
                PointerEvent::Down(local)
            } else if down {
                PointerEvent::Move(local)
            } else {
                PointerEvent::Up
            };
            if module.pointer(event).is_some() {
                self.canvas_dirty = true;
            }
        }
        if !down {
            module.pointer(PointerEvent::Up);
        }

        let surface = module.renderer().surface();
        if self.canvas_dirty || self.canvas_texture.is_none() {
            let image = egui::ColorImage::from_rgba_unmultiplied(
                [surface.width() as usize, surface.height() as usize],
                surface.pixels(),
            );
            match &mut self.canvas_texture {
                Some(tex) => tex.set(image, egui::TextureOptions::NEAREST),
                None => {
                    self.canvas_texture =
                        Some(ui.ctx().load_texture("canvas", image, egui::TextureOptions::NEAREST));
                }
            }
            self.canvas_dirty = false;
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, egui::Color32::WHITE);
        if let Some(tex) = &self.canvas_texture {
            painter.image(
                tex.id(),
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }

    fn messages_ui(&self, ctx: &egui::Context) {
        let Some(module) = self.module.as_ref() else {
            return;
        };
        let notifier = module.notifier();
        if notifier.messages().is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("canvas_messages"))
            .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -20.0])
            .show(ctx, |ui| {
                for msg in notifier.messages() {
                    let alpha = notifier.opacity(msg);
                    let (r, g, b) = match msg.kind {
                        MessageKind::Success => (46, 204, 113),
                        MessageKind::Warning => (230, 126, 34),
                        MessageKind::Error => (231, 76, 60),
                    };
                    let fill = egui::Color32::from_rgba_unmultiplied(r, g, b, (204.0 * alpha) as u8);
                    let text = egui::Color32::from_white_alpha((255.0 * alpha) as u8);
                    egui::Frame::none()
                        .fill(fill)
                        .rounding(4.0)
                        .inner_margin(egui::Margin::symmetric(20.0, 10.0))
                        .show(ui, |ui| {
                            ui.colored_label(text, &msg.text);
                        });
                }
            });
    }

    fn apply(&mut self, actions: Vec<GalleryAction>) {
        let Some(module) = self.module.as_mut() else {
            return;
        };
        for action in actions {
            match action {
                GalleryAction::Open(ts) => {
                    module.open_drawing(&ts);
                }
                GalleryAction::Close => module.close_drawing(),
                GalleryAction::Download(ts) => {
                    if let Some(path) = module.download_drawing(&ts) {
                        module
                            .notifier_mut()
                            .success(format!("Saved to {}", path.display()));
                    }
                }
                GalleryAction::Delete(ts) => module.delete_drawing(&ts),
            }
        }
    }
}

impl eframe::App for CanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        if self.module.is_none() {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.label("The drawing canvas is unavailable.");
            });
            return;
        }

        egui::TopBottomPanel::top("canvas_controls").show(ctx, |ui| self.controls_ui(ui));
        egui::TopBottomPanel::bottom("canvas_gallery").show(ctx, |ui| {
            ui.heading("Saved drawings");
            if let Some(module) = self.module.as_mut() {
                module.projector_mut().view_mut().strip_ui(ui, &mut actions);
            }
        });
        egui::CentralPanel::default().show(ctx, |ui| self.canvas_ui(ui));

        if let Some(module) = self.module.as_mut() {
            module.projector_mut().view_mut().detail_ui(ctx, &mut actions);
        }
        self.apply(actions);

        if let Some(module) = self.module.as_mut() {
            module.tick();
            if !module.notifier().messages().is_empty() {
                ctx.request_repaint_after(Duration::from_millis(50));
            }
        }
        self.messages_ui(ctx);
    }
}
