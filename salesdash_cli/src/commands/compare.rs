use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use salesdash_lib::validation;
use salesdash_lib::{build_comparison_report, EngineConfig};

use crate::commands::{load_rows, parse_date_arg};
use crate::output::{print_comparison, print_json, OutputFormat};

#[derive(Args)]
pub struct CompareArgs {
    /// Ledger export (.csv, or .json for upload records)
    #[arg(long)]
    pub input: PathBuf,

    /// Period kind: daily, weekly, monthly
    #[arg(long, default_value = "daily")]
    pub period: String,

    /// Reference date (YYYY-MM-DD). Defaults to the latest invoiced date
    #[arg(long)]
    pub date: Option<String>,
}

pub fn run(args: &CompareArgs, config: &EngineConfig, format: &OutputFormat) -> Result<()> {
    let kind = validation::validate_period(&args.period)?;
    let date = parse_date_arg(args.date.as_deref())?;
    let rows = load_rows(&args.input)?;
    let report = build_comparison_report(&rows, kind, date, config)?;

    eprintln!(
        "{}: {} against {}",
        report.name, report.current, report.previous
    );

    match format {
        OutputFormat::Json => print_json(&report),
        _ => print_comparison(&report, format)?,
    }

    Ok(())
}
