//! CLI subcommand implementations.

pub mod compare;
pub mod dashboard;
pub mod filters;
pub mod snapshot;

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use salesdash_lib::ingest::load_file;
use salesdash_lib::validation;
use salesdash_lib::SaleRow;

/// Read the ledger export named by `--input`.
pub fn load_rows(path: &Path) -> Result<Vec<SaleRow>> {
    let rows =
        load_file(path).with_context(|| format!("failed to read ledger from {}", path.display()))?;
    eprintln!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse an optional `--date` flag.
pub fn parse_date_arg(value: Option<&str>) -> Result<Option<NaiveDate>> {
    Ok(value.map(validation::validate_date).transpose()?)
}
