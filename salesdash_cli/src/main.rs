mod commands;
mod output;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use salesdash_lib::EngineConfig;

use crate::output::OutputFormat;

/// Environment variable naming the engine config file when `--config` is absent.
const CONFIG_ENV: &str = "SALESDASH_CONFIG";

#[derive(Parser)]
#[command(name = "salesdash")]
#[command(about = "Sales reports from a ledger export: daily snapshots, period comparisons and dashboards")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Engine config file (TOML). Defaults to $SALESDASH_CONFIG if set.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Single-day report for the given or latest invoiced date
    Snapshot(commands::snapshot::SnapshotArgs),
    /// Compare the current period with the one before it
    Compare(commands::compare::CompareArgs),
    /// Director, manager or trader dashboard
    Dashboard(commands::dashboard::DashboardArgs),
    /// List the values available for dashboard filters
    Filters(commands::filters::FiltersArgs),
}

fn parse_output_format(value: &str) -> Result<OutputFormat> {
    match value.trim().to_lowercase().as_str() {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        "csv" => Ok(OutputFormat::Csv),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        other => bail!("unknown output format '{}'. Valid formats: table, json, csv, markdown", other),
    }
}

fn load_config(flag: Option<&Path>) -> Result<EngineConfig> {
    let path = flag
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    match path {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("salesdash=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = parse_output_format(&cli.output)?;
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Snapshot(args) => commands::snapshot::run(args, &config, &format)?,
        Commands::Compare(args) => commands::compare::run(args, &config, &format)?,
        Commands::Dashboard(args) => commands::dashboard::run(args, &config, &format)?,
        Commands::Filters(args) => commands::filters::run(args, &config, &format)?,
    }

    Ok(())
}
