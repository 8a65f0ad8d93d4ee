use std::time::{Duration, Instant};

use quantum_dash::data::filter::{filter_dataset, DatasetView, FilterCommand, FilterState};
use quantum_dash::data::loader::LoadReport;
use quantum_dash::data::model::Dataset;
use quantum_dash::data::summary::{PanelKind, HEADLINE_INSIGHTS};
use quantum_dash::debounce::Debouncer;
use quantum_dash::schedule::DashboardTimers;

/// Viewports at most this wide get the single-column layout.
pub const NARROW_BREAKPOINT: f32 = 1024.0;
const TOAST_DURATION: Duration = Duration::from_secs(3);

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// 2×2 grid of panels.
    Wide,
    /// One panel per row.
    Narrow,
}

impl Layout {
    pub fn for_width(width: f32) -> Self {
        if width <= NARROW_BREAKPOINT {
            Layout::Narrow
        } else {
            Layout::Wide
        }
    }
}

/// Short confirmation shown in the top bar.
#[derive(Debug, Clone)]
pub struct Toast {
    pub text: String,
    pub until: Instant,
}

/// The full dashboard state, independent of rendering.
pub struct AppState {
    /// Loaded (or embedded) dataset. Never mutated by filtering.
    pub dataset: Dataset,

    pub filters: FilterState,

    /// Panel whose executive summary is open.
    pub open_summary: Option<PanelKind>,

    /// Load problems / error message shown in the UI.
    pub status_message: Option<String>,

    pub toast: Option<Toast>,

    pub layout: Layout,
    last_width: Option<f32>,
    resize: Debouncer<f32>,

    pub timers: DashboardTimers,
}

impl AppState {
    pub fn new(dataset: Dataset, resize_quiet: Duration, now: Instant) -> Self {
        Self {
            dataset,
            filters: FilterState::default(),
            open_summary: None,
            status_message: None,
            toast: None,
            layout: Layout::Wide,
            last_width: None,
            resize: Debouncer::new(resize_quiet),
            timers: DashboardTimers::new(now, HEADLINE_INSIGHTS.len()),
        }
    }

    /// Ingest a newly loaded dataset together with what went wrong loading it.
    pub fn set_dataset(&mut self, dataset: Dataset, report: &LoadReport) {
        log::info!(
            "Dataset ready: {} market years, {} regions, {} investment years, {} companies",
            dataset.market_projections.len(),
            dataset.regional.len(),
            dataset.investment_flows.len(),
            dataset.companies.len()
        );
        self.dataset = dataset;
        self.status_message = report.summary();
    }

    /// Current filtered view. Recomputed on every call.
    pub fn view(&self) -> DatasetView<'_> {
        let started = Instant::now();
        let view = filter_dataset(&self.dataset, &self.filters);
        log::debug!("Filtered dataset in {:?}", started.elapsed());
        view
    }

    /// Apply a filter command coming from one of the controls.
    pub fn dispatch(&mut self, command: FilterCommand, now: Instant) {
        if self.filter_value(command) == command {
            return;
        }
        self.filters.apply(command);
        let control = command.control();
        log_interaction(control.id(), &command.code());
        self.toast = Some(Toast {
            text: format!("{} updated to: {}", control.title(), command.code()),
            until: now + TOAST_DURATION,
        });
    }

    fn filter_value(&self, command: FilterCommand) -> FilterCommand {
        match command {
            FilterCommand::SetTimeRange(_) => FilterCommand::SetTimeRange(self.filters.time_range),
            FilterCommand::SetConfidence(_) => FilterCommand::SetConfidence(self.filters.confidence),
            FilterCommand::SetRegion(_) => FilterCommand::SetRegion(self.filters.region),
        }
    }

    pub fn show_summary(&mut self, panel: PanelKind) {
        log_interaction("panel_click", panel.title());
        self.open_summary = Some(panel);
    }

    /// Feed the current viewport width. Bursts are debounced before the
    /// layout changes.
    pub fn observe_width(&mut self, width: f32, now: Instant) {
        match self.last_width {
            None => {
                self.layout = Layout::for_width(width);
                self.last_width = Some(width);
            }
            Some(last) if (last - width).abs() > f32::EPSILON => {
                self.last_width = Some(width);
                self.resize.call(width, now);
            }
            Some(_) => {}
        }
    }

    /// Advance debounced and periodic work. Returns the longest the UI may
    /// sleep before calling again.
    pub fn tick(&mut self, now: Instant) -> Duration {
        if let Some(width) = self.resize.poll(now) {
            let layout = Layout::for_width(width);
            if layout != self.layout {
                log::info!("Viewport {width:.0}px wide, switching to {layout:?} layout");
                self.layout = layout;
            }
        }

        if self.toast.as_ref().is_some_and(|t| now >= t.until) {
            self.toast = None;
        }

        self.timers.tick(now, &mut rand::thread_rng());

        let mut next = self.timers.next_wakeup(now);
        if let Some(due) = self.resize.time_until_due(now) {
            next = next.min(due);
        }
        if let Some(toast) = &self.toast {
            next = next.min(toast.until.saturating_duration_since(now));
        }
        next
    }
}

pub fn log_interaction(kind: &str, value: &str) {
    log::info!("Dashboard interaction: {kind} - {value}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use quantum_dash::data::filter::RegionFocus;

    const QUIET: Duration = Duration::from_millis(100);

    fn state(now: Instant) -> AppState {
        AppState::new(Dataset::embedded(), QUIET, now)
    }

    #[test]
    fn dispatch_narrows_view_but_not_dataset() {
        let t0 = Instant::now();
        let mut state = state(t0);
        state.dispatch(FilterCommand::SetRegion(RegionFocus::Europe), t0);

        assert_eq!(state.view().regional.len(), 1);
        assert_eq!(state.dataset.regional.len(), 4);
        assert!(!state.filters.is_identity());
        assert_eq!(
            state.toast.as_ref().map(|t| t.text.as_str()),
            Some("Regional Focus updated to: europe")
        );
    }

    #[test]
    fn repeated_dispatch_of_same_value_is_ignored() {
        let t0 = Instant::now();
        let mut state = state(t0);
        state.dispatch(FilterCommand::SetRegion(RegionFocus::Global), t0);
        assert!(state.toast.is_none());
    }

    #[test]
    fn resize_burst_switches_layout_once_after_quiet_period() {
        let t0 = Instant::now();
        let mut state = state(t0);
        state.observe_width(1400.0, t0);
        assert_eq!(state.layout, Layout::Wide);

        state.observe_width(1100.0, t0 + Duration::from_millis(10));
        state.observe_width(900.0, t0 + Duration::from_millis(20));
        state.tick(t0 + Duration::from_millis(119));
        assert_eq!(state.layout, Layout::Wide);

        state.tick(t0 + Duration::from_millis(120));
        assert_eq!(state.layout, Layout::Narrow);
    }

    #[test]
    fn toast_expires() {
        let t0 = Instant::now();
        let mut state = state(t0);
        state.dispatch(FilterCommand::SetRegion(RegionFocus::AsiaPacific), t0);
        state.tick(t0 + TOAST_DURATION);
        assert!(state.toast.is_none());
    }
}
