#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod cache;
mod config;
mod error;
mod fetch;
mod prelude;
mod settings;
mod ui;

use crate::prelude::*;

fn main() {
    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    log::info!("Initialising...");

    let settings_path: Option<PathBuf> = std::env::args().nth(1).map(PathBuf::from);
    let settings = match settings::load(settings_path.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("{}, using default settings", e);
            settings::Settings::default()
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Failed to start async runtime: {}", e);
            return;
        }
    };
    let _guard = runtime.enter();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WIN_WIDTH, WIN_HEIGHT])
            .with_title(NAME),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(ComicViewerApp::new(cc, settings)?))),
    ) {
        log::error!("{}", e);
    }
}
