mod app;
mod color;
mod state;
mod ui;

use anyhow::Result;
use app::{DataLoader, QuantumDashApp};
use clap::Parser;
use eframe::egui;
use quantum_dash::config::Config;

fn main() -> Result<()> {
    env_logger::init();
    let config = Config::parse();
    log::info!("Quantum Computing Market Intelligence Dashboard loading...");

    let loader = DataLoader::new(&config)?;
    let app = QuantumDashApp::new(loader, config.debounce());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Quantum Computing Market Intelligence",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
