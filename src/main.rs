//! World Happiness Dashboard
//!
//! Usage: `happiness_dashboard [config.json]`

mod charts;
mod gui;

use std::path::PathBuf;

use anyhow::Context;
use eframe::egui;
use gui::DashboardApp;
use happiness_dashboard::config::DashboardConfig;
use happiness_dashboard::pipeline::Session;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => DashboardConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    // The dataset is loaded once, before any window content is built
    let startup = Session::start(&config);
    match &startup {
        Ok(session) => log::info!(
            "Dashboard ready: {} countries, {} selected",
            session.table().len(),
            session.selection().countries.len()
        ),
        Err(e) => log::error!("Dashboard startup aborted: {e}"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([900.0, 600.0])
            .with_title("World Happiness Score"),
        ..Default::default()
    };

    eframe::run_native(
        "World Happiness Score",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, startup)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
