//! Writes the embedded dataset as the four CSV resources the dashboard
//! loads, so the loader can be exercised against real files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use csv::Writer;

use quantum_dash::data::loader::{CsvRecord, ResourceSet};
use quantum_dash::data::model::{
    CompanyRecord, Dataset, InvestmentFlowRecord, MarketProjectionRecord, RegionalRecord,
};

#[derive(Parser, Debug)]
#[command(name = "generate_sample", about = "Write the embedded dataset as CSV resources")]
struct Args {
    /// Directory the four CSV files are written to.
    #[arg(default_value = "data")]
    output_dir: PathBuf,
}

fn optional(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

fn write_table<T: CsvRecord>(
    dir: &Path,
    resource: &str,
    records: &[T],
    row: impl Fn(&T) -> Vec<String>,
) -> Result<()> {
    let path = dir.join(resource);
    let mut writer = Writer::from_path(&path).with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(T::COLUMNS)?;
    for record in records {
        writer.write_record(row(record))?;
    }
    writer.flush()?;
    println!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    let dir = Args::parse().output_dir;
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let names = ResourceSet::default();
    let ds = Dataset::embedded();

    write_table(&dir, &names.market_projections, &ds.market_projections, |r: &MarketProjectionRecord| {
        vec![
            r.year.to_string(),
            r.conservative.to_string(),
            r.moderate.to_string(),
            r.aggressive.to_string(),
            r.sources.to_string(),
            r.confidence.to_string(),
        ]
    })?;

    write_table(&dir, &names.regional, &ds.regional, |r: &RegionalRecord| {
        vec![
            r.region.clone(),
            r.share.to_string(),
            r.revenue.to_string(),
            r.cagr.to_string(),
            r.countries.clone(),
        ]
    })?;

    write_table(&dir, &names.investment_flows, &ds.investment_flows, |r: &InvestmentFlowRecord| {
        vec![
            r.year.to_string(),
            r.vc.to_string(),
            r.government.to_string(),
            r.corporate.to_string(),
            r.deals.to_string(),
            r.avg_deal.to_string(),
        ]
    })?;

    write_table(&dir, &names.companies, &ds.companies, |c: &CompanyRecord| {
        vec![
            c.name.clone(),
            optional(c.revenue),
            optional(c.market_cap),
            c.employees.to_string(),
            c.technology.to_string(),
            c.confidence.to_string(),
            c.kind.clone(),
        ]
    })?;

    Ok(())
}
