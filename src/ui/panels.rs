use std::time::{Duration, Instant};

use chrono::Local;
use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_extras::{Column, TableBuilder};

use quantum_dash::data::export::{export_csv, export_file_name, save_export};
use quantum_dash::data::filter::{
    ConfidenceFilter, DatasetView, FilterCommand, FilterControl, RegionFocus, TimeRange,
};
use quantum_dash::data::summary::{executive_summary, PanelKind, HEADLINE_INSIGHTS};

use super::charts;
use crate::color;
use crate::state::{log_interaction, AppState, Layout, Toast};

/// Requests from the top bar that need more than the state to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Reload,
    ExportCsv,
}

#[derive(Debug, Default)]
pub struct TopBarOutput {
    pub commands: Vec<FilterCommand>,
    pub action: Option<Action>,
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the menu, the three filter dropdowns and the status line.
pub fn top_bar(ui: &mut Ui, state: &AppState) -> TopBarOutput {
    let mut out = TopBarOutput::default();

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Reload data").clicked() {
                out.action = Some(Action::Reload);
                ui.close_menu();
            }
            if ui.button("Export CSV…").clicked() {
                out.action = Some(Action::ExportCsv);
                ui.close_menu();
            }
        });

        ui.separator();

        let filters = state.filters;

        ui.label(FilterControl::TimeRange.title());
        egui::ComboBox::from_id_salt(FilterControl::TimeRange.id())
            .selected_text(filters.time_range.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for preset in TimeRange::PRESETS {
                    if ui
                        .selectable_label(filters.time_range == preset, preset.to_string())
                        .clicked()
                    {
                        out.commands.push(FilterCommand::SetTimeRange(preset));
                    }
                }
            });

        ui.label(FilterControl::ConfidenceLevel.title());
        egui::ComboBox::from_id_salt(FilterControl::ConfidenceLevel.id())
            .selected_text(filters.confidence.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for choice in ConfidenceFilter::CHOICES {
                    if ui
                        .selectable_label(filters.confidence == choice, choice.to_string())
                        .clicked()
                    {
                        out.commands.push(FilterCommand::SetConfidence(choice));
                    }
                }
            });

        ui.label(FilterControl::RegionFocus.title());
        egui::ComboBox::from_id_salt(FilterControl::RegionFocus.id())
            .selected_text(filters.region.to_string())
            .show_ui(ui, |ui: &mut Ui| {
                for region in RegionFocus::ALL {
                    if ui
                        .selectable_label(filters.region == region, region.to_string())
                        .clicked()
                    {
                        out.commands.push(FilterCommand::SetRegion(region));
                    }
                }
            });

        ui.separator();

        let view = state.view();
        let reliability = view
            .reliability_score()
            .map(|s| format!("{s}% Data Reliability"))
            .unwrap_or_else(|| "No rated data".to_string());
        ui.label(RichText::new(reliability).strong());

        ui.separator();
        ui.label(&state.timers.timestamp);
        ui.label(
            RichText::new(format!("Updated {} seconds ago", state.timers.last_refresh_secs)).weak(),
        );

        if let Some(toast) = &state.toast {
            ui.separator();
            ui.label(RichText::new(format!("✓ {}", toast.text)).color(color::GREEN));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    out
}

// ---------------------------------------------------------------------------
// Dashboard panels
// ---------------------------------------------------------------------------

/// Render the four panels. Returns the panel whose summary was requested.
pub fn dashboard(ui: &mut Ui, state: &AppState) -> Option<PanelKind> {
    let view = state.view();
    let mut clicked = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.layout {
            Layout::Wide => {
                for pair in PanelKind::ALL.chunks(2) {
                    ui.columns(pair.len(), |cols| {
                        for (col, &panel) in cols.iter_mut().zip(pair) {
                            if dashboard_panel(col, state, &view, panel) {
                                clicked = Some(panel);
                            }
                        }
                    });
                    ui.add_space(8.0);
                }
            }
            Layout::Narrow => {
                for panel in PanelKind::ALL {
                    if dashboard_panel(ui, state, &view, panel) {
                        clicked = Some(panel);
                    }
                    ui.add_space(8.0);
                }
            }
        });

    clicked
}

/// One bordered panel: header, metadata line, chart and insight. Returns
/// `true` when the summary button was clicked.
fn dashboard_panel(ui: &mut Ui, state: &AppState, view: &DatasetView<'_>, panel: PanelKind) -> bool {
    let stroke = if state.filters.is_identity() {
        ui.visuals().widgets.noninteractive.bg_stroke
    } else {
        Stroke::new(2.0, color::WARNING)
    };

    let mut clicked = false;
    egui::Frame::group(ui.style()).stroke(stroke).show(ui, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            ui.heading(panel.title());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                clicked = ui
                    .button("Executive summary")
                    .on_hover_text("Click for detailed analysis")
                    .clicked();
                if let Some(level) = state.filters.confidence.level() {
                    ui.label(RichText::new(format!("{level} Confidence")).color(color::WARNING));
                }
            });
        });

        ui.label(RichText::new(panel_metadata(view, panel)).weak());

        let id = format!("{panel:?}_chart");
        match panel {
            PanelKind::Market => {
                charts::redraw_line_chart(ui, &id, &charts::market_chart_data(&view.market_projections))
            }
            PanelKind::Geographic => {
                charts::redraw_share_chart(ui, &id, &charts::regional_chart_data(&view.regional))
            }
            PanelKind::Investment => charts::redraw_stacked_bars(
                ui,
                &id,
                &charts::investment_chart_data(&view.investment_flows),
            ),
            PanelKind::Companies => {
                charts::redraw_bubble_chart(ui, &id, &charts::company_bubbles(&view.companies));
                company_table(ui, view);
            }
        }

        if let Some(i) = panel.insight() {
            let mut text = RichText::new(HEADLINE_INSIGHTS[i]);
            if state.timers.is_nudged(i) {
                text = text.color(color::SLATE);
            }
            ui.add(egui::Label::new(text).wrap());
        }
    });

    clicked
}

fn panel_metadata(view: &DatasetView<'_>, panel: PanelKind) -> String {
    match panel {
        PanelKind::Market => format!("{} Sources", view.total_sources()),
        PanelKind::Geographic => format!("{} regions", view.regional.len()),
        PanelKind::Investment => format!("{} deals", view.total_deals()),
        PanelKind::Companies => format!("{} companies", view.companies.len()),
    }
}

fn company_table(ui: &mut Ui, view: &DatasetView<'_>) {
    let figure = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string());

    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(18.0, |mut header| {
            for title in ["Company", "Technology", "Revenue (M)", "Market cap (B)", "Employees"] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for company in view.companies.iter() {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(&company.name);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.colored_label(
                            color::technology_color(company.technology),
                            company.technology.as_str(),
                        );
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(figure(company.revenue));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(figure(company.market_cap));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(company.employees.to_string());
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Executive summary modal
// ---------------------------------------------------------------------------

pub fn summary_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(panel) = state.open_summary else {
        return;
    };
    let summary = executive_summary(panel);

    let mut open = true;
    let mut close = ctx.input(|i| i.key_pressed(egui::Key::Escape));

    egui::Window::new(summary.title)
        .id(egui::Id::new("executive_summary"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui: &mut Ui| {
            ui.label(RichText::new(summary.subtitle).italics());
            ui.separator();

            ui.strong("Key Insights");
            for insight in summary.insights {
                ui.label(format!("• {insight}"));
            }
            ui.add_space(6.0);

            ui.strong("Key Metrics");
            egui::Grid::new("summary_metrics")
                .num_columns(2)
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for (label, value) in summary.key_metrics {
                        ui.label(*label);
                        ui.strong(*value);
                        ui.end_row();
                    }
                });
            ui.add_space(6.0);

            ui.add(egui::Label::new(RichText::new(summary.recommendation).color(color::GREEN)).wrap());
            ui.add_space(6.0);
            if ui.button("Close").clicked() {
                close = true;
            }
        });

    if !open || close {
        state.open_summary = None;
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Ask for a destination and write the full dataset in export format.
pub fn export_csv_dialog(state: &mut AppState) {
    log_interaction("export", "csv");

    let file_name = export_file_name(Local::now().date_naive());
    let Some(path) = rfd::FileDialog::new()
        .set_title("Export market data")
        .set_file_name(&file_name)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    let result = export_csv(&DatasetView::from(&state.dataset)).and_then(|csv| save_export(&path, &csv));
    match result {
        Ok(()) => {
            log::info!("Exported market data to {}", path.display());
            state.toast = Some(Toast {
                text: "Market data CSV exported successfully".to_string(),
                until: Instant::now() + Duration::from_secs(3),
            });
        }
        Err(e) => {
            log::error!("Failed to export CSV: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
