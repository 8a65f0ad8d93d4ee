use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use super::model::{
    CompanyRecord, Confidence, Dataset, InvestmentFlowRecord, MarketProjectionRecord,
    RegionalRecord,
};
use crate::error::{FilterDimension, UnknownFilterCodeError};

// ---------------------------------------------------------------------------
// Filter dimensions
// ---------------------------------------------------------------------------

/// Restricts market projections to an inclusive year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    All,
    Years { start: i32, end: i32 },
}

impl TimeRange {
    /// Choices offered by the time-range dropdown.
    pub const PRESETS: [TimeRange; 4] = [
        TimeRange::All,
        TimeRange::Years { start: 2024, end: 2026 },
        TimeRange::Years { start: 2024, end: 2030 },
        TimeRange::Years { start: 2030, end: 2035 },
    ];

    pub fn code(&self) -> String {
        match self {
            TimeRange::All => "all".to_string(),
            TimeRange::Years { start, end } => format!("{start}-{end}"),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        match *self {
            TimeRange::All => true,
            TimeRange::Years { start, end } => (start..=end).contains(&year),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeRange::All => write!(f, "All years"),
            TimeRange::Years { start, end } => write!(f, "{start}-{end}"),
        }
    }
}

/// `"all"` or `"<start>-<end>"` with `start <= end`.
impl FromStr for TimeRange {
    type Err = UnknownFilterCodeError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        if code == "all" {
            return Ok(TimeRange::All);
        }
        let err = || UnknownFilterCodeError::new(FilterDimension::TimeRange, code);
        let (start, end) = code.split_once('-').ok_or_else(err)?;
        let start: i32 = start.parse().map_err(|_| err())?;
        let end: i32 = end.parse().map_err(|_| err())?;
        if start > end {
            return Err(err());
        }
        Ok(TimeRange::Years { start, end })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfidenceFilter {
    #[default]
    All,
    Only(Confidence),
}

impl ConfidenceFilter {
    pub const CHOICES: [ConfidenceFilter; 4] = [
        ConfidenceFilter::All,
        ConfidenceFilter::Only(Confidence::High),
        ConfidenceFilter::Only(Confidence::Medium),
        ConfidenceFilter::Only(Confidence::Low),
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ConfidenceFilter::All => "all",
            ConfidenceFilter::Only(Confidence::Low) => "low",
            ConfidenceFilter::Only(Confidence::Medium) => "medium",
            ConfidenceFilter::Only(Confidence::High) => "high",
        }
    }

    pub fn level(&self) -> Option<Confidence> {
        match self {
            ConfidenceFilter::All => None,
            ConfidenceFilter::Only(level) => Some(*level),
        }
    }
}

impl fmt::Display for ConfidenceFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceFilter::All => write!(f, "All levels"),
            ConfidenceFilter::Only(level) => write!(f, "{level} Confidence"),
        }
    }
}

impl FromStr for ConfidenceFilter {
    type Err = UnknownFilterCodeError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        ConfidenceFilter::CHOICES
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| UnknownFilterCodeError::new(FilterDimension::Confidence, code))
    }
}

/// Region focus. Every variant but `Global` maps to exactly one label of the
/// regional slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegionFocus {
    #[default]
    Global,
    NorthAmerica,
    AsiaPacific,
    Europe,
    RestOfWorld,
}

impl RegionFocus {
    pub const ALL: [RegionFocus; 5] = [
        RegionFocus::Global,
        RegionFocus::NorthAmerica,
        RegionFocus::AsiaPacific,
        RegionFocus::Europe,
        RegionFocus::RestOfWorld,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            RegionFocus::Global => "global",
            RegionFocus::NorthAmerica => "north-america",
            RegionFocus::AsiaPacific => "asia-pacific",
            RegionFocus::Europe => "europe",
            RegionFocus::RestOfWorld => "rest-of-world",
        }
    }

    /// Display label matched against [`RegionalRecord::region`].
    pub fn label(&self) -> Option<&'static str> {
        match self {
            RegionFocus::Global => None,
            RegionFocus::NorthAmerica => Some("North America"),
            RegionFocus::AsiaPacific => Some("Asia Pacific"),
            RegionFocus::Europe => Some("Europe"),
            RegionFocus::RestOfWorld => Some("Rest of World"),
        }
    }
}

impl fmt::Display for RegionFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().unwrap_or("Global"))
    }
}

impl FromStr for RegionFocus {
    type Err = UnknownFilterCodeError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        RegionFocus::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or_else(|| UnknownFilterCodeError::new(FilterDimension::Region, code))
    }
}

// ---------------------------------------------------------------------------
// Filter state and commands
// ---------------------------------------------------------------------------

/// The three active selections. The default selects everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterState {
    pub time_range: TimeRange,
    pub confidence: ConfidenceFilter,
    pub region: RegionFocus,
}

/// The dropdown a command originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterControl {
    TimeRange,
    ConfidenceLevel,
    RegionFocus,
}

impl FilterControl {
    pub fn id(&self) -> &'static str {
        match self {
            FilterControl::TimeRange => "time-range",
            FilterControl::ConfidenceLevel => "confidence-level",
            FilterControl::RegionFocus => "region-focus",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FilterControl::TimeRange => "Time Range",
            FilterControl::ConfidenceLevel => "Confidence Level",
            FilterControl::RegionFocus => "Regional Focus",
        }
    }
}

/// A single filter update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCommand {
    SetTimeRange(TimeRange),
    SetConfidence(ConfidenceFilter),
    SetRegion(RegionFocus),
}

impl FilterCommand {
    /// Build a command from the raw code a control produced.
    pub fn from_control(control: FilterControl, code: &str) -> Result<Self, UnknownFilterCodeError> {
        Ok(match control {
            FilterControl::TimeRange => FilterCommand::SetTimeRange(code.parse()?),
            FilterControl::ConfidenceLevel => FilterCommand::SetConfidence(code.parse()?),
            FilterControl::RegionFocus => FilterCommand::SetRegion(code.parse()?),
        })
    }

    pub fn control(&self) -> FilterControl {
        match self {
            FilterCommand::SetTimeRange(_) => FilterControl::TimeRange,
            FilterCommand::SetConfidence(_) => FilterControl::ConfidenceLevel,
            FilterCommand::SetRegion(_) => FilterControl::RegionFocus,
        }
    }

    pub fn code(&self) -> String {
        match self {
            FilterCommand::SetTimeRange(t) => t.code(),
            FilterCommand::SetConfidence(c) => c.code().to_string(),
            FilterCommand::SetRegion(r) => r.code().to_string(),
        }
    }
}

impl FilterState {
    pub fn apply(&mut self, command: FilterCommand) {
        match command {
            FilterCommand::SetTimeRange(t) => self.time_range = t,
            FilterCommand::SetConfidence(c) => self.confidence = c,
            FilterCommand::SetRegion(r) => self.region = r,
        }
    }

    /// True when no dimension narrows anything.
    pub fn is_identity(&self) -> bool {
        self.time_range == TimeRange::All
            && self.confidence == ConfidenceFilter::All
            && self.region == RegionFocus::Global
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// A filtered view over a [`Dataset`]. Slices a filter did not touch borrow
/// the source; narrowed slices are owned copies.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetView<'a> {
    pub market_projections: Cow<'a, [MarketProjectionRecord]>,
    pub regional: Cow<'a, [RegionalRecord]>,
    pub investment_flows: Cow<'a, [InvestmentFlowRecord]>,
    pub companies: Cow<'a, [CompanyRecord]>,
}

impl<'a> From<&'a Dataset> for DatasetView<'a> {
    fn from(ds: &'a Dataset) -> Self {
        DatasetView {
            market_projections: Cow::Borrowed(&ds.market_projections),
            regional: Cow::Borrowed(&ds.regional),
            investment_flows: Cow::Borrowed(&ds.investment_flows),
            companies: Cow::Borrowed(&ds.companies),
        }
    }
}

impl DatasetView<'_> {
    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            market_projections: self.market_projections.to_vec(),
            regional: self.regional.to_vec(),
            investment_flows: self.investment_flows.to_vec(),
            companies: self.companies.to_vec(),
        }
    }

    /// Sum of upstream report counts over the visible market projections.
    pub fn total_sources(&self) -> u64 {
        self.market_projections.iter().map(|r| u64::from(r.sources)).sum()
    }

    /// Sum of deal counts over the visible investment flows.
    pub fn total_deals(&self) -> u64 {
        self.investment_flows.iter().map(|f| u64::from(f.deals)).sum()
    }

    /// Share of visible market projections tagged `High`, as a rounded
    /// percentage. `None` when there is nothing to rate.
    pub fn reliability_score(&self) -> Option<u32> {
        let total = self.market_projections.len();
        if total == 0 {
            return None;
        }
        let high = self
            .market_projections
            .iter()
            .filter(|r| r.confidence == Confidence::High)
            .count();
        Some((high as f64 / total as f64 * 100.0).round() as u32)
    }
}

fn narrow<'a, T: Clone>(slice: Cow<'a, [T]>, keep: impl Fn(&T) -> bool) -> Cow<'a, [T]> {
    Cow::Owned(slice.iter().filter(|r| keep(r)).cloned().collect())
}

/// Apply all three filter dimensions to `dataset`.
///
/// * time range → market projections
/// * confidence → market projections (after the time pass) and companies
/// * region     → regional records
///
/// Investment flows are never narrowed.
pub fn filter_dataset<'a>(dataset: &'a Dataset, filters: &FilterState) -> DatasetView<'a> {
    let mut view = DatasetView::from(dataset);

    if filters.time_range != TimeRange::All {
        let range = filters.time_range;
        view.market_projections = narrow(view.market_projections, |r| range.contains(r.year));
    }

    if let Some(level) = filters.confidence.level() {
        view.market_projections = narrow(view.market_projections, |r| r.confidence == level);
        view.companies = narrow(view.companies, |c| c.confidence == level);
    }

    if let Some(label) = filters.region.label() {
        view.regional = narrow(view.regional, |r| r.region == label);
    }

    view
}
