use std::collections::BTreeMap;
use std::str::FromStr;

use csv::{ReaderBuilder, Trim};

use super::model::{
    CompanyRecord, Confidence, Dataset, InvestmentFlowRecord, MarketProjectionRecord,
    RegionalRecord, Technology,
};
use super::source::TextSource;
use crate::error::{CsvFetchError, CsvParseError, LoadError, LoadFailures};

// ---------------------------------------------------------------------------
// Resource names
// ---------------------------------------------------------------------------

/// Identifiers of the four CSV resources, relative to the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSet {
    pub market_projections: String,
    pub regional: String,
    pub investment_flows: String,
    pub companies: String,
}

impl Default for ResourceSet {
    fn default() -> Self {
        Self {
            market_projections: "quantum_market_projections.csv".to_string(),
            regional: "quantum_regional_data.csv".to_string(),
            investment_flows: "quantum_investment_flows.csv".to_string(),
            companies: "quantum_company_performance.csv".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Untyped rows
// ---------------------------------------------------------------------------

/// One data line mapped from header name to raw field text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source text.
    pub line: u64,
    pub fields: BTreeMap<String, String>,
}

/// A resource split into header and rows. Rows whose shape did not match
/// the header are listed in `skipped` instead of `rows`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCsv {
    pub resource: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    pub skipped: Vec<CsvParseError>,
}

/// Split CSV text into header-keyed rows.
///
/// Accepts `\n`, `\r\n` and `\r` line endings, trims every field and ignores
/// blank lines. A row with a different field count than the header is
/// skipped and recorded as [`CsvParseError::ShapeMismatch`].
pub fn parse_csv_text(resource: &str, text: &str) -> ParsedCsv {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut skipped = Vec::new();
    let headers: Vec<String> = match reader.headers() {
        Ok(h) => h.iter().map(|h| h.to_string()).collect(),
        Err(e) => {
            skipped.push(CsvParseError::Malformed {
                resource: resource.to_string(),
                line: 1,
                message: e.to_string(),
            });
            Vec::new()
        }
    };

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                skipped.push(CsvParseError::Malformed {
                    resource: resource.to_string(),
                    line,
                    message: e.to_string(),
                });
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        // Whitespace-only lines survive the reader as a single empty field.
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        if record.len() != headers.len() {
            skipped.push(CsvParseError::ShapeMismatch {
                resource: resource.to_string(),
                line,
                expected: headers.len(),
                found: record.len(),
            });
            continue;
        }

        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(|v| v.to_string()))
            .collect();
        rows.push(RawRow { line, fields });
    }

    ParsedCsv {
        resource: resource.to_string(),
        headers,
        rows,
        skipped,
    }
}

/// Fetch one resource and split it into rows.
///
/// Transport failures and non-success statuses both surface as
/// [`CsvFetchError`]; shape problems never fail the call.
pub async fn fetch_csv(source: &dyn TextSource, resource: &str) -> Result<ParsedCsv, CsvFetchError> {
    let response = source
        .get(resource)
        .await
        .map_err(|e| CsvFetchError::transport(resource, e))?;

    if !response.is_success() {
        return Err(CsvFetchError::status(resource, response.status, response.reason));
    }

    Ok(parse_csv_text(resource, &response.body))
}

// ---------------------------------------------------------------------------
// Typed projection
// ---------------------------------------------------------------------------

/// Typed access to the fields of one [`RawRow`].
pub struct RowReader<'a> {
    resource: &'a str,
    row: &'a RawRow,
}

impl<'a> RowReader<'a> {
    pub fn new(resource: &'a str, row: &'a RawRow) -> Self {
        Self { resource, row }
    }

    fn raw(&self, column: &str) -> &'a str {
        self.row.fields.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn text(&self, column: &str) -> String {
        self.raw(column).to_string()
    }

    /// Parse a required numeric field. Empty or unparsable text is an error.
    pub fn number<T: FromStr>(&self, column: &str) -> Result<T, CsvParseError> {
        let value = self.raw(column);
        value.parse().map_err(|_| CsvParseError::InvalidNumber {
            resource: self.resource.to_string(),
            line: self.row.line,
            column: column.to_string(),
            value: value.to_string(),
        })
    }

    /// Parse an optional numeric field: empty text yields `None`.
    pub fn optional_number<T: FromStr>(&self, column: &str) -> Result<Option<T>, CsvParseError> {
        if self.raw(column).is_empty() {
            return Ok(None);
        }
        self.number(column).map(Some)
    }

    pub fn enumerated<T: FromStr>(&self, column: &str, kind: &'static str) -> Result<T, CsvParseError> {
        let value = self.raw(column);
        value.parse().map_err(|_| CsvParseError::InvalidEnum {
            resource: self.resource.to_string(),
            line: self.row.line,
            column: column.to_string(),
            value: value.to_string(),
            kind,
        })
    }

    pub fn confidence(&self, column: &str) -> Result<Confidence, CsvParseError> {
        self.enumerated(column, "confidence level")
    }
}

/// A record type that can be built from one CSV row.
pub trait CsvRecord: Sized {
    /// Header columns the resource must provide.
    const COLUMNS: &'static [&'static str];

    fn from_row(row: &RowReader<'_>) -> Result<Self, CsvParseError>;
}

impl CsvRecord for MarketProjectionRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Year",
        "Conservative_Estimate",
        "Moderate_Estimate",
        "Aggressive_Estimate",
        "Sources_Count",
        "Confidence_Level",
    ];

    fn from_row(row: &RowReader<'_>) -> Result<Self, CsvParseError> {
        Ok(MarketProjectionRecord {
            year: row.number("Year")?,
            conservative: row.number("Conservative_Estimate")?,
            moderate: row.number("Moderate_Estimate")?,
            aggressive: row.number("Aggressive_Estimate")?,
            sources: row.number("Sources_Count")?,
            confidence: row.confidence("Confidence_Level")?,
        })
    }
}

impl CsvRecord for RegionalRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Region",
        "Market_Share_2024",
        "Revenue_2024_M",
        "CAGR_2025_2030",
        "Key_Countries",
    ];

    fn from_row(row: &RowReader<'_>) -> Result<Self, CsvParseError> {
        Ok(RegionalRecord {
            region: row.text("Region"),
            share: row.number("Market_Share_2024")?,
            revenue: row.number("Revenue_2024_M")?,
            cagr: row.number("CAGR_2025_2030")?,
            countries: row.text("Key_Countries"),
        })
    }
}

impl CsvRecord for InvestmentFlowRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Year",
        "VC_Funding_M",
        "Government_Funding_M",
        "Corporate_Investment_M",
        "Deal_Count",
        "Average_Deal_Size_M",
    ];

    fn from_row(row: &RowReader<'_>) -> Result<Self, CsvParseError> {
        Ok(InvestmentFlowRecord {
            year: row.number("Year")?,
            vc: row.number("VC_Funding_M")?,
            government: row.number("Government_Funding_M")?,
            corporate: row.number("Corporate_Investment_M")?,
            deals: row.number("Deal_Count")?,
            avg_deal: row.number("Average_Deal_Size_M")?,
        })
    }
}

impl CsvRecord for CompanyRecord {
    const COLUMNS: &'static [&'static str] = &[
        "Company",
        "Revenue_2024_M",
        "Market_Cap_B",
        "Employees",
        "Technology_Focus",
        "Confidence_Level",
        "Quantum_Revenue_Share",
    ];

    fn from_row(row: &RowReader<'_>) -> Result<Self, CsvParseError> {
        Ok(CompanyRecord {
            name: row.text("Company"),
            revenue: row.optional_number("Revenue_2024_M")?,
            market_cap: row.optional_number("Market_Cap_B")?,
            employees: row.number("Employees")?,
            technology: row.enumerated::<Technology>("Technology_Focus", "technology")?,
            confidence: row.confidence("Confidence_Level")?,
            kind: row.text("Quantum_Revenue_Share"),
        })
    }
}

/// Typed records of one resource plus every row that had to be dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T> {
    pub records: Vec<T>,
    pub skipped: Vec<CsvParseError>,
}

/// Project parsed rows into typed records.
///
/// Fails when a required column is missing or a header name repeats; rows
/// with bad values are moved to `skipped`.
pub fn project<T: CsvRecord>(parsed: ParsedCsv) -> Result<Table<T>, CsvParseError> {
    if let Some((i, column)) = parsed
        .headers
        .iter()
        .enumerate()
        .find(|(i, h)| parsed.headers[..*i].contains(h))
    {
        log::warn!("{}: column '{column}' appears again at position {}", parsed.resource, i + 1);
        return Err(CsvParseError::DuplicateColumn {
            resource: parsed.resource,
            column: column.to_string(),
        });
    }

    if let Some(column) = T::COLUMNS
        .iter()
        .find(|c| !parsed.headers.iter().any(|h| h == *c))
    {
        return Err(CsvParseError::MissingColumn {
            resource: parsed.resource,
            column: column.to_string(),
        });
    }

    let mut skipped = parsed.skipped;
    let mut records = Vec::with_capacity(parsed.rows.len());
    for row in &parsed.rows {
        match T::from_row(&RowReader::new(&parsed.resource, row)) {
            Ok(record) => records.push(record),
            Err(e) if e.is_row_level() => skipped.push(e),
            Err(e) => return Err(e),
        }
    }

    Ok(Table { records, skipped })
}

pub async fn load_table<T: CsvRecord>(
    source: &dyn TextSource,
    resource: &str,
) -> Result<Table<T>, LoadError> {
    let parsed = fetch_csv(source, resource).await?;
    let table = project::<T>(parsed)?;
    for e in &table.skipped {
        log::warn!("Skipping row: {e}");
    }
    log::info!("Loaded {} records from {resource}", table.records.len());
    Ok(table)
}

// ---------------------------------------------------------------------------
// Whole dataset
// ---------------------------------------------------------------------------

/// Outcome of loading all four resources; every fetch has settled.
#[derive(Debug)]
pub struct LoadedTables {
    pub market_projections: Result<Table<MarketProjectionRecord>, LoadError>,
    pub regional: Result<Table<RegionalRecord>, LoadError>,
    pub investment_flows: Result<Table<InvestmentFlowRecord>, LoadError>,
    pub companies: Result<Table<CompanyRecord>, LoadError>,
}

/// What went wrong during a fallback load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Resources replaced by embedded data.
    pub failures: Vec<LoadError>,
    pub skipped_rows: Vec<CsvParseError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.skipped_rows.is_empty()
    }

    /// One-line status text, `None` when nothing went wrong.
    pub fn summary(&self) -> Option<String> {
        if self.is_clean() {
            return None;
        }
        let mut parts = Vec::new();
        if !self.failures.is_empty() {
            let names: Vec<&str> = self.failures.iter().map(|f| f.resource()).collect();
            parts.push(format!("using embedded data for {}", names.join(", ")));
        }
        if !self.skipped_rows.is_empty() {
            parts.push(format!("{} malformed rows skipped", self.skipped_rows.len()));
        }
        Some(parts.join("; "))
    }
}

fn take_or_fallback<T: Clone>(
    result: Result<Table<T>, LoadError>,
    fallback: &[T],
    report: &mut LoadReport,
) -> Vec<T> {
    match result {
        Ok(table) => {
            report.skipped_rows.extend(table.skipped);
            table.records
        }
        Err(e) => {
            log::warn!("{e}; falling back to embedded data");
            report.failures.push(e);
            fallback.to_vec()
        }
    }
}

impl LoadedTables {
    pub fn failure_count(&self) -> usize {
        [
            self.market_projections.is_err(),
            self.regional.is_err(),
            self.investment_flows.is_err(),
            self.companies.is_err(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count()
    }

    /// All-or-nothing: any failed resource fails the whole dataset, listing
    /// every failure.
    pub fn into_dataset(self) -> Result<Dataset, LoadFailures> {
        match (
            self.market_projections,
            self.regional,
            self.investment_flows,
            self.companies,
        ) {
            (Ok(m), Ok(r), Ok(i), Ok(c)) => Ok(Dataset {
                market_projections: m.records,
                regional: r.records,
                investment_flows: i.records,
                companies: c.records,
            }),
            (m, r, i, c) => Err(LoadFailures {
                failures: [m.err(), r.err(), i.err(), c.err()]
                    .into_iter()
                    .flatten()
                    .collect(),
            }),
        }
    }

    /// Replace only the failed resources with the matching slice of
    /// `defaults`.
    pub fn with_fallback(self, defaults: &Dataset) -> (Dataset, LoadReport) {
        let mut report = LoadReport::default();
        let dataset = Dataset {
            market_projections: take_or_fallback(
                self.market_projections,
                &defaults.market_projections,
                &mut report,
            ),
            regional: take_or_fallback(self.regional, &defaults.regional, &mut report),
            investment_flows: take_or_fallback(
                self.investment_flows,
                &defaults.investment_flows,
                &mut report,
            ),
            companies: take_or_fallback(self.companies, &defaults.companies, &mut report),
        };
        (dataset, report)
    }
}

/// Fetch the four resources concurrently and wait for all of them.
pub async fn load_tables(source: &dyn TextSource, resources: &ResourceSet) -> LoadedTables {
    log::info!("Loading CSV resources from {}", source.describe());
    let (market_projections, regional, investment_flows, companies) = tokio::join!(
        load_table::<MarketProjectionRecord>(source, &resources.market_projections),
        load_table::<RegionalRecord>(source, &resources.regional),
        load_table::<InvestmentFlowRecord>(source, &resources.investment_flows),
        load_table::<CompanyRecord>(source, &resources.companies),
    );
    LoadedTables {
        market_projections,
        regional,
        investment_flows,
        companies,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::data::source::TextResponse;
    use crate::error::{FetchCause, TransportError};

    const MARKET: &str = "Year,Conservative_Estimate,Moderate_Estimate,Aggressive_Estimate,Sources_Count,Confidence_Level\n\
        2024,1160,1300,1800,8,Medium\n\
        2025,1410,1800,2500,6,High\n";
    const REGIONAL: &str = "Region,Market_Share_2024,Revenue_2024_M,CAGR_2025_2030,Key_Countries\n\
        North America,37.6,470,35.8,US\n";
    const INVESTMENT: &str = "Year,VC_Funding_M,Government_Funding_M,Corporate_Investment_M,Deal_Count,Average_Deal_Size_M\n\
        2024,1500,1800,900,50,30.0\n";
    const COMPANIES: &str = "Company,Revenue_2024_M,Market_Cap_B,Employees,Technology_Focus,Confidence_Level,Quantum_Revenue_Share\n\
        IBM,1000,,280000,Superconducting,High,Dedicated\n\
        IonQ,,2.5,180,Trapped Ion,Medium,Primary\n";

    /// In-memory source; resources not listed fail at the transport level.
    #[derive(Default)]
    struct MemorySource {
        responses: HashMap<String, TextResponse>,
        requested: Mutex<Vec<String>>,
    }

    impl MemorySource {
        fn with(mut self, resource: &str, body: &str) -> Self {
            self.responses
                .insert(resource.to_string(), TextResponse::ok(body));
            self
        }

        fn with_status(mut self, resource: &str, status: u16) -> Self {
            self.responses.insert(
                resource.to_string(),
                TextResponse {
                    status,
                    reason: "Server Error".to_string(),
                    body: String::new(),
                },
            );
            self
        }

        fn complete() -> Self {
            let names = ResourceSet::default();
            MemorySource::default()
                .with(&names.market_projections, MARKET)
                .with(&names.regional, REGIONAL)
                .with(&names.investment_flows, INVESTMENT)
                .with(&names.companies, COMPANIES)
        }
    }

    #[async_trait]
    impl TextSource for MemorySource {
        async fn get(&self, resource: &str) -> Result<TextResponse, TransportError> {
            self.requested.lock().unwrap().push(resource.to_string());
            self.responses
                .get(resource)
                .cloned()
                .ok_or_else(|| "network down".into())
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    #[test]
    fn parses_any_line_ending_and_trailing_blank_lines() {
        let parsed = parse_csv_text("t.csv", "A,B\r\n1,2\r3,4\n\n  \n");
        assert_eq!(parsed.headers, vec!["A", "B"]);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].fields["A"], "3");
        assert_eq!(parsed.rows[1].fields["B"], "4");
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn shape_mismatch_skips_only_that_row() {
        let parsed = parse_csv_text("t.csv", "A,B\n1,2\n3\n5,6,7\n8,9\n");
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[1].fields["A"], "8");
        assert_eq!(
            parsed.skipped,
            vec![
                CsvParseError::ShapeMismatch {
                    resource: "t.csv".into(),
                    line: 3,
                    expected: 2,
                    found: 1,
                },
                CsvParseError::ShapeMismatch {
                    resource: "t.csv".into(),
                    line: 4,
                    expected: 2,
                    found: 3,
                },
            ]
        );
    }

    #[test]
    fn row_of_empty_fields_is_skipped_as_a_type_error() {
        let text = "Year,Conservative_Estimate,Moderate_Estimate,Aggressive_Estimate,Sources_Count,Confidence_Level\n\
            ,,,,,\n\
            2025,1,2,3,4,High\n";
        let parsed = parse_csv_text("m.csv", text);
        assert_eq!(parsed.rows.len(), 2);

        let table = project::<MarketProjectionRecord>(parsed).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(
            table.skipped,
            vec![CsvParseError::InvalidNumber {
                resource: "m.csv".into(),
                line: 2,
                column: "Year".into(),
                value: String::new(),
            }]
        );
    }

    #[test]
    fn duplicate_header_column_fails_the_resource() {
        let text = "Region,Market_Share_2024,Revenue_2024_M,CAGR_2025_2030,Key_Countries,Region\n\
            Europe,33.8,423,33.2,DE,Asia Pacific\n";
        let err = project::<RegionalRecord>(parse_csv_text("r.csv", text)).unwrap_err();
        assert_eq!(
            err,
            CsvParseError::DuplicateColumn {
                resource: "r.csv".into(),
                column: "Region".into(),
            }
        );
        assert!(!err.is_row_level());
    }

    #[test]
    fn company_projection_maps_empty_numbers_to_absent() {
        let table = project::<CompanyRecord>(parse_csv_text("c.csv", COMPANIES)).unwrap();
        assert!(table.skipped.is_empty());
        assert_eq!(table.records[0].revenue, Some(1000.0));
        assert_eq!(table.records[0].market_cap, None);
        assert_eq!(table.records[1].revenue, None);
        assert_eq!(table.records[1].technology, Technology::TrappedIon);
    }

    #[test]
    fn unparsable_number_is_a_type_error_for_that_row() {
        let text = "Year,Conservative_Estimate,Moderate_Estimate,Aggressive_Estimate,Sources_Count,Confidence_Level\n\
            20x4,1,2,3,4,High\n\
            2025,1,2,3,4,High\n";
        let table = project::<MarketProjectionRecord>(parse_csv_text("m.csv", text)).unwrap();
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.records[0].year, 2025);
        assert_eq!(
            table.skipped,
            vec![CsvParseError::InvalidNumber {
                resource: "m.csv".into(),
                line: 2,
                column: "Year".into(),
                value: "20x4".into(),
            }]
        );
    }

    #[test]
    fn confidence_outside_enumeration_is_rejected() {
        let text = "Year,Conservative_Estimate,Moderate_Estimate,Aggressive_Estimate,Sources_Count,Confidence_Level\n\
            2024,1,2,3,4,high\n";
        let table = project::<MarketProjectionRecord>(parse_csv_text("m.csv", text)).unwrap();
        assert!(table.records.is_empty());
        assert!(matches!(
            table.skipped[0],
            CsvParseError::InvalidEnum { kind: "confidence level", .. }
        ));
    }

    #[test]
    fn missing_header_column_fails_the_resource() {
        let err = project::<RegionalRecord>(parse_csv_text("r.csv", "Region,Market_Share_2024\nEU,1\n"))
            .unwrap_err();
        assert_eq!(
            err,
            CsvParseError::MissingColumn {
                resource: "r.csv".into(),
                column: "Revenue_2024_M".into(),
            }
        );
    }

    #[tokio::test]
    async fn fetch_csv_rejects_on_transport_failure() {
        let source = MemorySource::default();
        let err = fetch_csv(&source, "bad.csv").await.unwrap_err();
        assert_eq!(err.resource, "bad.csv");
        assert!(matches!(err.cause, FetchCause::Transport(_)));
        assert_eq!(*source.requested.lock().unwrap(), vec!["bad.csv".to_string()]);
    }

    #[tokio::test]
    async fn fetch_csv_rejects_on_non_success_status() {
        let source = MemorySource::default().with_status("bad.csv", 500);
        let err = fetch_csv(&source, "bad.csv").await.unwrap_err();
        assert!(matches!(err.cause, FetchCause::Status { code: 500, .. }));
    }

    #[tokio::test]
    async fn loads_all_four_resources() {
        let tables = load_tables(&MemorySource::complete(), &ResourceSet::default()).await;
        assert_eq!(tables.failure_count(), 0);
        let dataset = tables.into_dataset().unwrap();
        assert_eq!(dataset.market_projections.len(), 2);
        assert_eq!(dataset.regional[0].region, "North America");
        assert_eq!(dataset.investment_flows[0].avg_deal, 30.0);
        assert_eq!(dataset.companies.len(), 2);
    }

    #[tokio::test]
    async fn one_failure_does_not_drop_the_others() {
        let names = ResourceSet::default();
        let source = MemorySource::default()
            .with(&names.market_projections, MARKET)
            .with(&names.investment_flows, INVESTMENT)
            .with(&names.companies, COMPANIES);

        let tables = load_tables(&source, &names).await;
        assert_eq!(source.requested.lock().unwrap().len(), 4);
        assert_eq!(tables.failure_count(), 1);

        let defaults = Dataset::embedded();
        let (dataset, report) = tables.with_fallback(&defaults);
        assert_eq!(dataset.market_projections.len(), 2);
        assert_eq!(dataset.regional, defaults.regional);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].resource(), names.regional);
        assert_eq!(
            report.summary().as_deref(),
            Some("using embedded data for quantum_regional_data.csv")
        );
    }

    #[tokio::test]
    async fn all_or_nothing_reports_every_failure() {
        let names = ResourceSet::default();
        let source = MemorySource::default()
            .with(&names.market_projections, MARKET)
            .with_status(&names.companies, 503);

        let err = load_tables(&source, &names).await.into_dataset().unwrap_err();
        let failed: Vec<&str> = err.failures.iter().map(|f| f.resource()).collect();
        assert_eq!(
            failed,
            vec![
                names.regional.as_str(),
                names.investment_flows.as_str(),
                names.companies.as_str()
            ]
        );
    }
}
