use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Confidence – reliability tag carried by market and company records
// ---------------------------------------------------------------------------

/// Categorical reliability tag, sourced from the number of upstream reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub const ALL: [Confidence; 3] = [Confidence::Low, Confidence::Medium, Confidence::High];

    /// Label as it appears in the CSV sources and the export.
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-sensitive: only `Low`, `Medium` and `High` are accepted.
impl FromStr for Confidence {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Confidence::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

// ---------------------------------------------------------------------------
// Technology – hardware approach of a company
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technology {
    Superconducting,
    TrappedIon,
    Topological,
    Annealing,
}

impl Technology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::Superconducting => "Superconducting",
            Technology::TrappedIon => "Trapped Ion",
            Technology::Topological => "Topological",
            Technology::Annealing => "Annealing",
        }
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Technology {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Superconducting" => Ok(Technology::Superconducting),
            "Trapped Ion" | "TrappedIon" => Ok(Technology::TrappedIon),
            "Topological" => Ok(Technology::Topological),
            "Annealing" => Ok(Technology::Annealing),
            _ => Err(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Records – one row of each source table
// ---------------------------------------------------------------------------

/// Market size estimates for one year, in millions of USD.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketProjectionRecord {
    pub year: i32,
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
    /// Number of reports the estimate is drawn from.
    pub sources: u32,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionalRecord {
    pub region: String,
    /// Market share in percent.
    pub share: f64,
    pub revenue: f64,
    /// CAGR in percent.
    pub cagr: f64,
    /// Free-text list, e.g. `"US, Canada, Mexico"`.
    pub countries: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentFlowRecord {
    pub year: i32,
    pub vc: f64,
    pub government: f64,
    pub corporate: f64,
    pub deals: u32,
    pub avg_deal: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyRecord {
    pub name: String,
    /// Quantum revenue (M USD); `None` when not reported.
    pub revenue: Option<f64>,
    /// Market capitalisation (B USD); `None` when not reported.
    pub market_cap: Option<f64>,
    pub employees: u32,
    pub technology: Technology,
    pub confidence: Confidence,
    /// Business type, e.g. `"Primary"` or `"Research"`.
    pub kind: String,
}

// ---------------------------------------------------------------------------
// Dataset – the four slices the dashboard works on
// ---------------------------------------------------------------------------

/// The complete loaded dataset.
///
/// Sequences keep source order. `year`, `region` and `name` act as natural
/// keys but duplicates are not rejected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub market_projections: Vec<MarketProjectionRecord>,
    pub regional: Vec<RegionalRecord>,
    pub investment_flows: Vec<InvestmentFlowRecord>,
    pub companies: Vec<CompanyRecord>,
}

impl Dataset {
    /// Total number of records over all slices.
    pub fn len(&self) -> usize {
        self.market_projections.len()
            + self.regional.len()
            + self.investment_flows.len()
            + self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_parsing_is_case_sensitive() {
        assert_eq!("High".parse::<Confidence>(), Ok(Confidence::High));
        assert!("high".parse::<Confidence>().is_err());
        assert!("".parse::<Confidence>().is_err());
    }

    #[test]
    fn technology_accepts_both_trapped_ion_spellings() {
        assert_eq!("Trapped Ion".parse::<Technology>(), Ok(Technology::TrappedIon));
        assert_eq!("TrappedIon".parse::<Technology>(), Ok(Technology::TrappedIon));
        assert!("Photonic".parse::<Technology>().is_err());
    }
}
