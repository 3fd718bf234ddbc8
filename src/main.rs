mod app;
mod charts;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use app::RustyStatsApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Stats – Data Explorer",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the logo.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(RustyStatsApp::new(&config)))
        }),
    )
}
