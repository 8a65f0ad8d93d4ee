use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};

use super::filter::DatasetView;

pub const EXPORT_HEADER: [&str; 5] = ["Category", "Year", "Value", "Confidence", "Sources"];

/// One line of the export file. Kept as text so a read/write cycle
/// reproduces the input exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ExportRow {
    pub category: String,
    /// A year for market rows, the region label for regional rows.
    pub year: String,
    pub value: String,
    pub confidence: String,
    pub sources: String,
}

impl ExportRow {
    fn new(category: &str, year: impl ToString, value: f64, confidence: &str, sources: impl ToString) -> Self {
        Self {
            category: category.to_string(),
            year: year.to_string(),
            // Shortest round-trip form: 1160, 37.6, 25
            value: value.to_string(),
            confidence: confidence.to_string(),
            sources: sources.to_string(),
        }
    }
}

/// Three rows per market projection (one per scenario), then three rows per
/// region (share, revenue, CAGR).
pub fn export_rows(view: &DatasetView<'_>) -> Vec<ExportRow> {
    let mut rows = Vec::with_capacity(3 * (view.market_projections.len() + view.regional.len()));

    for item in view.market_projections.iter() {
        let confidence = item.confidence.as_str();
        for (scenario, value) in [
            ("Conservative", item.conservative),
            ("Moderate", item.moderate),
            ("Aggressive", item.aggressive),
        ] {
            rows.push(ExportRow::new(
                &format!("Market Size {scenario}"),
                item.year,
                value,
                confidence,
                item.sources,
            ));
        }
    }

    for item in view.regional.iter() {
        for (metric, value) in [("Share", item.share), ("Revenue", item.revenue), ("CAGR", item.cagr)] {
            rows.push(ExportRow::new(
                &format!("Regional {metric}"),
                &item.region,
                value,
                "High",
                "Multiple",
            ));
        }
    }

    rows
}

/// Serialize rows with the fixed header, `\n`-terminated.
pub fn write_export_rows(rows: &[ExportRow]) -> Result<String> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER).context("writing export header")?;
    for row in rows {
        writer.serialize(row).context("writing export row")?;
    }
    let bytes = writer.into_inner().context("flushing export buffer")?;
    String::from_utf8(bytes).context("export is not valid UTF-8")
}

pub fn export_csv(view: &DatasetView<'_>) -> Result<String> {
    write_export_rows(&export_rows(view))
}

/// Read an export file back into rows.
pub fn parse_export(text: &str) -> Result<Vec<ExportRow>> {
    let mut reader = ReaderBuilder::new().from_reader(text.as_bytes());
    let headers = reader.headers().context("reading export header")?;
    if headers.iter().ne(EXPORT_HEADER) {
        anyhow::bail!("unexpected export header: {headers:?}");
    }
    reader
        .deserialize()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("export row {}", i + 1)))
        .collect()
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("quantum_market_intelligence_{}.csv", date.format("%Y-%m-%d"))
}

pub fn save_export(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{filter_dataset, FilterState, RegionFocus, TimeRange};
    use crate::data::model::Dataset;

    #[test]
    fn one_row_round_trips_byte_for_byte() {
        let text = "Category,Year,Value,Confidence,Sources\nMarket Size Conservative,2024,1160,Medium,8\n";
        let rows = parse_export(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value, "1160");
        assert_eq!(write_export_rows(&rows).unwrap(), text);
    }

    #[test]
    fn exports_three_rows_per_projection_and_region() {
        let ds = Dataset::embedded();
        let filters = FilterState {
            time_range: TimeRange::Years { start: 2024, end: 2024 },
            region: RegionFocus::AsiaPacific,
            ..FilterState::default()
        };
        let text = export_csv(&filter_dataset(&ds, &filters)).unwrap();
        assert_eq!(
            text,
            "Category,Year,Value,Confidence,Sources\n\
             Market Size Conservative,2024,1160,Medium,8\n\
             Market Size Moderate,2024,1300,Medium,8\n\
             Market Size Aggressive,2024,1800,Medium,8\n\
             Regional Share,Asia Pacific,26.9,High,Multiple\n\
             Regional Revenue,Asia Pacific,336,High,Multiple\n\
             Regional CAGR,Asia Pacific,38.2,High,Multiple\n"
        );
    }

    #[test]
    fn full_export_has_header_and_all_rows() {
        let ds = Dataset::embedded();
        let text = export_csv(&DatasetView::from(&ds)).unwrap();
        let rows = parse_export(&text).unwrap();
        assert_eq!(rows.len(), 3 * 6 + 3 * 4);
        assert_eq!(rows.last().unwrap().value, "25");
    }

    #[test]
    fn empty_view_still_writes_header() {
        let ds = Dataset::default();
        let text = export_csv(&DatasetView::from(&ds)).unwrap();
        assert_eq!(text, "Category,Year,Value,Confidence,Sources\n");
    }

    #[test]
    fn rejects_foreign_header() {
        assert!(parse_export("A,B,C,D,E\n1,2,3,4,5\n").is_err());
    }

    #[test]
    fn file_name_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(export_file_name(date), "quantum_market_intelligence_2026-10-19.csv");
    }
}
