//! Error types for the screening pipeline
//!
//! Per-symbol failures (`ProviderError`, `FetchError`, `NormalizeError`) are
//! absorbed at the fetcher/normalizer boundary and never reach the scoring
//! engine. `ScreenError` is what a caller of the pipeline can observe.

use thiserror::Error;

/// Failure talking to the remote market-data provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out")]
    Timeout,

    #[error("No data for symbol: {0}")]
    NotFound(String),

    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// Failure of a single latest-quote lookup
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("No observation returned for {0}")]
    NoData(String),
}

/// Coercion failure while extracting fields from an info bundle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Field {field} is not numeric: {value}")]
    Coercion { field: &'static str, value: String },
}

/// Errors visible at the pipeline boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScreenError {
    #[error("Select at least one company to analyze.")]
    EmptySelection,

    #[error("Threshold {name} = {value} is outside the allowed range {min}..={max}")]
    ThresholdOutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Unknown history period: {0}")]
    UnknownPeriod(String),
}

/// Failure serializing or writing the CSV export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}
