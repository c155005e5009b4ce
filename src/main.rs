use canvas_gallery::gui::CanvasApp;
use canvas_gallery::logging;
use canvas_gallery::settings::{Settings, SETTINGS_FILE};
use eframe::egui;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE)?;
    logging::init(
        settings.debug_logging,
        settings.log_file.as_ref().map(PathBuf::from),
    );

    let app = CanvasApp::new(&settings);
    let width = settings.canvas_width as f32 + 40.0;
    let height = settings.canvas_height as f32 + 220.0;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_min_inner_size([320.0, 240.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Canvas Gallery",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
