use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use salesdash_lib::dashboard::history_start;
use salesdash_lib::rep_mapping::find_rep;
use salesdash_lib::validation;
use salesdash_lib::{
    director_dashboard, load_rep_mappings, manager_dashboard, trader_dashboard, DashboardFilter,
    EngineConfig, Sort, SortKey, SortOrder,
};

use crate::commands::load_rows;
use crate::output::{
    print_director_dashboard, print_json, print_manager_dashboard, print_trader_dashboard,
    OutputFormat,
};

#[derive(Args)]
pub struct DashboardArgs {
    /// Dashboard: director, manager, trader
    pub role: String,

    /// Ledger export (.csv, or .json for upload records)
    #[arg(long)]
    pub input: PathBuf,

    /// Filter by calendar year
    #[arg(long)]
    pub year: Option<i32>,

    /// Filter by month (1-12)
    #[arg(long)]
    pub month: Option<u32>,

    /// Only customers managed by this rep (e.g. Uriel, Lyle, Calvyn)
    #[arg(long)]
    pub rep: Option<String>,

    /// Filter by customer name (partial match)
    #[arg(long)]
    pub customer: Option<String>,

    /// Filter by product category (e.g. "Fillets", "V/Add Frozen")
    #[arg(long)]
    pub category: Option<String>,

    /// Sort field: sales, mass, count, price, name
    #[arg(long, default_value = "sales")]
    pub sort_by: String,

    /// Sort order: asc, desc
    #[arg(long, default_value = "desc")]
    pub sort_order: String,
}

fn build_filter(args: &DashboardArgs, config: &EngineConfig) -> Result<DashboardFilter> {
    let mut filter = DashboardFilter::default();

    if let Some(year) = args.year {
        filter.year = Some(validation::validate_year(year)?);
    }
    if let Some(month) = args.month {
        filter.month = Some(validation::validate_month(month)?);
    }
    if let Some(ref rep) = args.rep {
        let mappings = load_rep_mappings()?;
        let name = validation::validate_rep(rep, &mappings)?;
        filter.rep = find_rep(&mappings, &name).cloned();
    }
    if let Some(ref customer) = args.customer {
        filter.customer = Some(validation::validate_search(customer)?);
    }
    if let Some(ref category) = args.category {
        filter.category = Some(validation::validate_category(
            category,
            config.unmatched_product_policy,
        )?);
    }

    Ok(filter)
}

pub fn run(args: &DashboardArgs, config: &EngineConfig, format: &OutputFormat) -> Result<()> {
    let filter = build_filter(args, config)?;
    let sort = Sort {
        key: args.sort_by.parse::<SortKey>()?,
        order: args.sort_order.parse::<SortOrder>()?,
    };
    let rows = load_rows(&args.input)?;

    match args.role.trim().to_lowercase().as_str() {
        "director" => {
            let dash = director_dashboard(&rows, &filter, sort, config);
            eprintln!(
                "{} records, {} customer groups",
                dash.summary.record_count,
                dash.suppliers.len()
            );
            match format {
                OutputFormat::Json => print_json(&dash),
                _ => print_director_dashboard(&dash, format)?,
            }
        }
        "manager" => {
            let dash = manager_dashboard(&rows, &filter, sort, config);
            eprintln!(
                "{} customers, {} products",
                dash.summary.unique_customers, dash.summary.unique_products
            );
            match format {
                OutputFormat::Json => print_json(&dash),
                _ => print_manager_dashboard(&dash, format)?,
            }
        }
        "trader" => {
            let dash = trader_dashboard(&rows, &filter, sort, config);
            if let Some(reference) = dash.reference_date {
                eprintln!(
                    "Order history from {} to {}",
                    history_start(reference),
                    reference
                );
            }
            match format {
                OutputFormat::Json => print_json(&dash),
                _ => print_trader_dashboard(&dash, format)?,
            }
        }
        other => bail!(
            "unknown dashboard '{}'. Valid dashboards: director, manager, trader",
            other
        ),
    }

    Ok(())
}
