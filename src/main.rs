mod app;
mod state;
mod ui;

use std::path::Path;

use anyhow::Context;
use app::DashboardApp;
use eframe::egui;
use olist_dashboard::config::DashboardConfig;
use olist_dashboard::data::loader;

/// Optional settings file, looked up in the working directory.
const CONFIG_FILE: &str = "dashboard.json";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Load once up front; a missing or malformed dataset aborts the process.
    let config = DashboardConfig::load(Path::new(CONFIG_FILE))?;
    let dataset = loader::load_file(&config.dataset_path)
        .with_context(|| format!("loading dataset {}", config.dataset_path.display()))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the sidebar logo.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(DashboardApp::new(config, dataset)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
