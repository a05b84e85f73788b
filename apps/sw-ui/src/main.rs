#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod views;
mod write_worker;

use app::SpendwheelApp;
use sw_app::AppConfig;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::from_env_or_default() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}; falling back to defaults");
            AppConfig::default()
        }
    };

    let (width, height) = config.chart.canvas_size();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32 + 260.0, height as f32 + 60.0])
            .with_title("Spendwheel"),
        ..Default::default()
    };

    eframe::run_native(
        "Spendwheel",
        options,
        Box::new(|cc| Ok(Box::new(SpendwheelApp::new(cc, config)))),
    )
}
