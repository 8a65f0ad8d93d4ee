//! Built-in dataset shown when the CSV resources cannot be loaded.

use super::model::{
    CompanyRecord, Confidence, Dataset, InvestmentFlowRecord, MarketProjectionRecord,
    RegionalRecord, Technology,
};

impl Dataset {
    /// The embedded default dataset.
    pub fn embedded() -> Self {
        Dataset {
            market_projections: market_projections(),
            regional: regional(),
            investment_flows: investment_flows(),
            companies: companies(),
        }
    }
}

pub fn market_projections() -> Vec<MarketProjectionRecord> {
    use Confidence::*;
    [
        (2024, 1160.0, 1300.0, 1800.0, 8, Medium),
        (2025, 1410.0, 1800.0, 2500.0, 6, High),
        (2026, 1850.0, 2600.0, 3800.0, 4, Medium),
        (2027, 2450.0, 3800.0, 5500.0, 3, Medium),
        (2030, 4240.0, 8600.0, 14000.0, 5, High),
        (2035, 9555.0, 28200.0, 50220.0, 3, Low),
    ]
    .into_iter()
    .map(
        |(year, conservative, moderate, aggressive, sources, confidence)| MarketProjectionRecord {
            year,
            conservative,
            moderate,
            aggressive,
            sources,
            confidence,
        },
    )
    .collect()
}

pub fn regional() -> Vec<RegionalRecord> {
    [
        ("North America", 37.6, 470.0, 35.8, "US, Canada, Mexico"),
        ("Asia Pacific", 26.9, 336.0, 38.2, "China, Japan, India, South Korea"),
        ("Europe", 33.8, 423.0, 33.2, "Germany, UK, France, Netherlands"),
        ("Rest of World", 1.7, 21.0, 25.0, "Brazil, Australia, Others"),
    ]
    .into_iter()
    .map(|(region, share, revenue, cagr, countries)| RegionalRecord {
        region: region.to_string(),
        share,
        revenue,
        cagr,
        countries: countries.to_string(),
    })
    .collect()
}

pub fn investment_flows() -> Vec<InvestmentFlowRecord> {
    [
        (2020, 412.0, 800.0, 300.0, 45, 9.2),
        (2021, 850.0, 1200.0, 500.0, 65, 13.1),
        (2022, 963.0, 1500.0, 700.0, 77, 12.5),
        (2023, 785.0, 1600.0, 650.0, 67, 11.7),
        (2024, 1500.0, 1800.0, 900.0, 50, 30.0),
        (2025, 2000.0, 2200.0, 1200.0, 55, 36.4),
    ]
    .into_iter()
    .map(
        |(year, vc, government, corporate, deals, avg_deal)| InvestmentFlowRecord {
            year,
            vc,
            government,
            corporate,
            deals,
            avg_deal,
        },
    )
    .collect()
}

pub fn companies() -> Vec<CompanyRecord> {
    use Confidence::*;
    use Technology::*;
    [
        ("IBM", Some(1000.0), None, 280_000, Superconducting, High, "Dedicated"),
        ("Google", None, Some(2000.0), 182_000, Superconducting, Medium, "Research"),
        ("Microsoft", None, Some(3200.0), 228_000, Topological, Medium, "Research"),
        ("D-Wave", Some(6.5), Some(0.5), 200, Annealing, High, "Primary"),
        ("Rigetti", Some(10.8), Some(0.8), 150, Superconducting, High, "Primary"),
        ("IonQ", None, Some(2.5), 180, TrappedIon, Medium, "Primary"),
        ("Quantinuum", None, Some(5.0), 500, TrappedIon, Medium, "Primary"),
    ]
    .into_iter()
    .map(
        |(name, revenue, market_cap, employees, technology, confidence, kind)| CompanyRecord {
            name: name.to_string(),
            revenue,
            market_cap,
            employees,
            technology,
            confidence,
            kind: kind.to_string(),
        },
    )
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_dataset_has_every_slice() {
        let ds = Dataset::embedded();
        assert_eq!(ds.market_projections.len(), 6);
        assert_eq!(ds.regional.len(), 4);
        assert_eq!(ds.investment_flows.len(), 6);
        assert_eq!(ds.companies.len(), 7);
        assert_eq!(ds.len(), 23);
    }
}
