//! Error types for the report engine and its ingestion collaborators.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors produced while loading rows or building reports.
///
/// Every failure is reported to the caller as a whole; the engine never
/// returns a partially populated report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// No invoiced rows exist for the requested (or derived) date.
    #[error("no invoiced sales found for {}", describe_date(.date))]
    NoDataForDate { date: Option<NaiveDate> },
    /// The period kind string is not one of daily, weekly or monthly.
    #[error("invalid period kind '{0}' (expected daily, weekly or monthly)")]
    InvalidPeriodKind(String),
    /// A ledger row is missing a required field or carries an unusable value.
    /// `row` is the 1-based data row index (header excluded).
    #[error("malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
    /// User-provided input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The engine configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_date(date: &Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "any date".to_string(),
    }
}

impl ReportError {
    pub fn malformed(row: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            row,
            reason: reason.into(),
        }
    }
}
