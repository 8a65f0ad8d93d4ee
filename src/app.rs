use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use eframe::egui;

use quantum_dash::config::Config;
use quantum_dash::data::loader::{load_tables, LoadReport, ResourceSet};
use quantum_dash::data::model::Dataset;
use quantum_dash::data::source::TextSource;

use crate::state::AppState;
use crate::ui::panels::{self, Action};

// ---------------------------------------------------------------------------
// Data loading
// ---------------------------------------------------------------------------

/// Owns the async runtime and text source used to (re)load the CSVs.
pub struct DataLoader {
    runtime: tokio::runtime::Runtime,
    source: Option<Box<dyn TextSource>>,
    resources: ResourceSet,
}

impl DataLoader {
    pub fn new(config: &Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("starting async runtime")?;
        Ok(Self {
            runtime,
            source: config.text_source(),
            resources: ResourceSet::default(),
        })
    }

    /// Load all four resources, keeping embedded data for any that fail.
    pub fn load(&self) -> (Dataset, LoadReport) {
        let defaults = Dataset::embedded();
        match &self.source {
            Some(source) => self
                .runtime
                .block_on(load_tables(source.as_ref(), &self.resources))
                .with_fallback(&defaults),
            None => (defaults, LoadReport::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct QuantumDashApp {
    pub state: AppState,
    loader: DataLoader,
}

impl QuantumDashApp {
    pub fn new(loader: DataLoader, resize_quiet: Duration) -> Self {
        let started = Instant::now();
        let (dataset, report) = loader.load();
        let mut state = AppState::new(Dataset::default(), resize_quiet, started);
        state.set_dataset(dataset, &report);
        log::info!("Dashboard initialized in {:.2?}", started.elapsed());
        Self { state, loader }
    }

    fn reload(&mut self) {
        crate::state::log_interaction("reload", "csv");
        let (dataset, report) = self.loader.load();
        self.state.set_dataset(dataset, &report);
    }
}

impl eframe::App for QuantumDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.state.observe_width(ctx.screen_rect().width(), now);
        let wake = self.state.tick(now);
        ctx.request_repaint_after(wake);

        // ---- Top panel: menu bar + filters ----
        let top = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &self.state))
            .inner;

        // ---- Central panel: four dashboard panels ----
        let clicked = egui::CentralPanel::default()
            .show(ctx, |ui| panels::dashboard(ui, &self.state))
            .inner;

        panels::summary_window(ctx, &mut self.state);

        for command in top.commands {
            self.state.dispatch(command, now);
        }
        if let Some(panel) = clicked {
            self.state.show_summary(panel);
        }
        match top.action {
            Some(Action::Reload) => self.reload(),
            Some(Action::ExportCsv) => panels::export_csv_dialog(&mut self.state),
            None => {}
        }
    }
}
