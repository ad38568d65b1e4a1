use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use salesdash_lib::{build_snapshot_report, EngineConfig};

use crate::commands::{load_rows, parse_date_arg};
use crate::output::{print_json, print_snapshot, OutputFormat};

#[derive(Args)]
pub struct SnapshotArgs {
    /// Ledger export (.csv, or .json for upload records)
    #[arg(long)]
    pub input: PathBuf,

    /// Report date (YYYY-MM-DD). Defaults to the latest invoiced date
    #[arg(long)]
    pub date: Option<String>,
}

pub fn run(args: &SnapshotArgs, config: &EngineConfig, format: &OutputFormat) -> Result<()> {
    let date = parse_date_arg(args.date.as_deref())?;
    let rows = load_rows(&args.input)?;
    let report = build_snapshot_report(&rows, date, config)?;

    eprintln!(
        "Snapshot for {} ({} invoiced orders)",
        report.date, report.totals.orders
    );

    match format {
        OutputFormat::Json => print_json(&report),
        _ => print_snapshot(&report, format)?,
    }

    Ok(())
}
