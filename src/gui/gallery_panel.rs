use crate::draw::capture::decode_image;
use crate::gallery::{DrawingDetail, GalleryItem, GalleryView};
use eframe::egui;
use std::collections::HashMap;

pub const THUMBNAIL_SIZE: egui::Vec2 = egui::vec2(96.0, 64.0);

/// Something the user asked for while the gallery was being drawn. Applied
/// after the frame's UI pass so the module is not borrowed twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryAction {
    Open(String),
    Close,
    Download(String),
    Delete(String),
}

/// egui presentation of the gallery strip and the detail window.
#[derive(Default)]
pub struct EguiGalleryView {
    items: Vec<GalleryItem>,
    detail: Option<DrawingDetail>,
    textures: HashMap<String, egui::TextureHandle>,
}

impl GalleryView for EguiGalleryView {
    fn replace_items(&mut self, items: Vec<GalleryItem>) {
        self.items = items;
        self.textures
            .retain(|timestamp, _| self.items.iter().any(|i| &i.timestamp == timestamp));
    }

    fn show_detail(&mut self, detail: DrawingDetail) {
        self.detail = Some(detail);
    }

    fn close_detail(&mut self) {
        self.detail = None;
    }
}

impl EguiGalleryView {
    fn texture(
        &mut self,
        ctx: &egui::Context,
        timestamp: &str,
        data_url: &str,
    ) -> Option<egui::TextureHandle> {
        if let Some(tex) = self.textures.get(timestamp) {
            return Some(tex.clone());
        }
        let img = match decode_image(data_url) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!("cannot display drawing {timestamp}: {e:#}");
                return None;
            }
        };
        let size = [img.width() as usize, img.height() as usize];
        let tex = ctx.load_texture(
            format!("drawing-{timestamp}"),
            egui::ColorImage::from_rgba_unmultiplied(size, img.as_raw()),
            egui::TextureOptions::LINEAR,
        );
        self.textures.insert(timestamp.to_string(), tex.clone());
        Some(tex)
    }

    /// Thumbnail strip, newest first.
    pub fn strip_ui(&mut self, ui: &mut egui::Ui, actions: &mut Vec<GalleryAction>) {
        if self.items.is_empty() {
            ui.weak("No saved drawings yet.");
            return;
        }
        let items = self.items.clone();
        egui::ScrollArea::horizontal().show(ui, |ui| {
            ui.horizontal(|ui| {
                for item in &items {
                    let Some(tex) = self.texture(ui.ctx(), &item.timestamp, &item.data_url) else {
                        continue;
                    };
                    let image = egui::Image::new((tex.id(), THUMBNAIL_SIZE)).bg_fill(egui::Color32::WHITE);
                    let response = ui.add(egui::ImageButton::new(image)).on_hover_text(item.alt);
                    if response.clicked() {
                        actions.push(GalleryAction::Open(item.timestamp.clone()));
                    }
                }
            });
        });
    }

    pub fn detail_ui(&mut self, ctx: &egui::Context, actions: &mut Vec<GalleryAction>) {
        let Some(detail) = self.detail.clone() else {
            return;
        };
        let mut open = true;
        egui::Window::new("Saved drawing")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                if let Some(tex) = self.texture(ctx, &detail.timestamp, &detail.data_url) {
                    ui.add(egui::Image::new(&tex).bg_fill(egui::Color32::WHITE));
                }
                ui.label(&detail.saved_label);
                ui.horizontal(|ui| {
                    if ui.button("Download").clicked() {
                        actions.push(GalleryAction::Download(detail.timestamp.clone()));
                    }
                    if ui.button("Delete").clicked() {
                        actions.push(GalleryAction::Delete(detail.timestamp.clone()));
                    }
                });
            });
        if !open {
            actions.push(GalleryAction::Close);
        }
    }
}
