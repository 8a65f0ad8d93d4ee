use std::fmt;

use thiserror::Error;

/// Boxed error returned by a [`TextSource`](crate::data::source::TextSource)
/// when the transport itself fails.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Fetch errors
// ---------------------------------------------------------------------------

/// Why a resource could not be fetched.
#[derive(Debug, Error)]
pub enum FetchCause {
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),

    #[error("HTTP status {code} {reason}")]
    Status { code: u16, reason: String },
}

/// A CSV resource could not be retrieved. Always carries the resource id so
/// callers can fall back per resource.
#[derive(Debug, Error)]
#[error("failed to fetch CSV resource '{resource}': {cause}")]
pub struct CsvFetchError {
    pub resource: String,
    #[source]
    pub cause: FetchCause,
}

impl CsvFetchError {
    pub fn transport(resource: &str, err: TransportError) -> Self {
        Self {
            resource: resource.to_string(),
            cause: FetchCause::Transport(err),
        }
    }

    pub fn status(resource: &str, code: u16, reason: impl Into<String>) -> Self {
        Self {
            resource: resource.to_string(),
            cause: FetchCause::Status {
                code,
                reason: reason.into(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Problems found while turning CSV text into typed records.
///
/// Everything except [`CsvParseError::MissingColumn`] is scoped to a single
/// row: the loader skips the row and keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CsvParseError {
    #[error("{resource} line {line}: expected {expected} fields, found {found}")]
    ShapeMismatch {
        resource: String,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{resource} line {line}: malformed record: {message}")]
    Malformed {
        resource: String,
        line: u64,
        message: String,
    },

    #[error("{resource} line {line}: column '{column}' value '{value}' is not a number")]
    InvalidNumber {
        resource: String,
        line: u64,
        column: String,
        value: String,
    },

    #[error("{resource} line {line}: column '{column}' value '{value}' is not a valid {kind}")]
    InvalidEnum {
        resource: String,
        line: u64,
        column: String,
        value: String,
        kind: &'static str,
    },

    #[error("{resource}: missing required column '{column}'")]
    MissingColumn { resource: String, column: String },

    #[error("{resource}: column '{column}' appears more than once in the header")]
    DuplicateColumn { resource: String, column: String },
}

impl CsvParseError {
    /// Whether the error only invalidates one row.
    pub fn is_row_level(&self) -> bool {
        !matches!(
            self,
            CsvParseError::MissingColumn { .. } | CsvParseError::DuplicateColumn { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// The filter dimension a code was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    TimeRange,
    Confidence,
    Region,
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterDimension::TimeRange => write!(f, "time range"),
            FilterDimension::Confidence => write!(f, "confidence"),
            FilterDimension::Region => write!(f, "region"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {dimension} filter code '{code}'")]
pub struct UnknownFilterCodeError {
    pub dimension: FilterDimension,
    pub code: String,
}

impl UnknownFilterCodeError {
    pub fn new(dimension: FilterDimension, code: &str) -> Self {
        Self {
            dimension,
            code: code.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Failure of one resource as a whole.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] CsvFetchError),

    #[error(transparent)]
    Parse(#[from] CsvParseError),
}

impl LoadError {
    pub fn resource(&self) -> &str {
        match self {
            LoadError::Fetch(e) => &e.resource,
            LoadError::Parse(CsvParseError::ShapeMismatch { resource, .. })
            | LoadError::Parse(CsvParseError::Malformed { resource, .. })
            | LoadError::Parse(CsvParseError::InvalidNumber { resource, .. })
            | LoadError::Parse(CsvParseError::InvalidEnum { resource, .. })
            | LoadError::Parse(CsvParseError::MissingColumn { resource, .. })
            | LoadError::Parse(CsvParseError::DuplicateColumn { resource, .. }) => resource,
        }
    }
}

/// Aggregate of every resource that failed during one load.
#[derive(Debug, Error)]
#[error("{} of 4 CSV resources failed to load: {}", .failures.len(), summarize(.failures))]
pub struct LoadFailures {
    pub failures: Vec<LoadError>,
}

fn summarize(failures: &[LoadError]) -> String {
    failures
        .iter()
        .map(|f| f.resource().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_names_resource_and_status() {
        let err = CsvFetchError::status("quantum_regional_data.csv", 500, "Server Error");
        assert_eq!(
            err.to_string(),
            "failed to fetch CSV resource 'quantum_regional_data.csv': HTTP status 500 Server Error"
        );
    }

    #[test]
    fn missing_column_is_not_row_level() {
        let err = CsvParseError::MissingColumn {
            resource: "x.csv".into(),
            column: "Year".into(),
        };
        assert!(!err.is_row_level());
        assert_eq!(LoadError::from(err).resource(), "x.csv");
    }

    #[test]
    fn aggregate_lists_failed_resources() {
        let failures = LoadFailures {
            failures: vec![
                CsvFetchError::status("a.csv", 404, "Not Found").into(),
                CsvFetchError::status("b.csv", 503, "Unavailable").into(),
            ],
        };
        assert_eq!(
            failures.to_string(),
            "2 of 4 CSV resources failed to load: a.csv, b.csv"
        );
    }
}
