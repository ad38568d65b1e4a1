use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use salesdash_lib::{list_filter_options, load_rep_mappings, EngineConfig};

use crate::commands::load_rows;
use crate::output::{print_filter_options, print_json, OutputFormat};

#[derive(Args)]
pub struct FiltersArgs {
    /// Ledger export (.csv, or .json for upload records)
    #[arg(long)]
    pub input: PathBuf,
}

pub fn run(args: &FiltersArgs, config: &EngineConfig, format: &OutputFormat) -> Result<()> {
    let rows = load_rows(&args.input)?;
    let reps = load_rep_mappings()?;
    let options = list_filter_options(&rows, &reps, config);

    match format {
        OutputFormat::Json => print_json(&options),
        _ => print_filter_options(&options, format)?,
    }

    Ok(())
}
