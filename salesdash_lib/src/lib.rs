//! Library layer for salesdash: sales ledger ingestion, classification, and
//! report aggregation.
//!
//! Rows are classified into product categories and retail customer groups,
//! aggregated, and assembled into daily snapshot reports, period-over-period
//! comparisons and role dashboards. Every report is a plain serializable value
//! computed from an immutable slice of rows.

pub mod aggregate;
pub mod classify;
pub mod compare;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filters;
pub mod ingest;
pub mod ledger;
pub mod period;
pub mod rep_mapping;
pub mod report;
pub mod row;
pub mod validation;

pub use classify::{classify_customer_group, classify_product, Category, CustomerGroup};
pub use compare::{percent_change, Comparison, PercentChange};
pub use config::EngineConfig;
pub use dashboard::{
    director_dashboard, manager_dashboard, trader_dashboard, DashboardFilter, DirectorDashboard,
    ManagerDashboard, Sort, SortKey, SortOrder, TraderDashboard,
};
pub use error::ReportError;
pub use filters::{list_filter_options, FilterOptions};
pub use ledger::{LedgerStore, MemoryLedger};
pub use period::{select_period, DateRange, PeriodKind};
pub use rep_mapping::{load_rep_mappings, RepCustomers, RepMappingError};
pub use report::{build_comparison_report, build_snapshot_report, ComparisonReport, SnapshotReport};
pub use row::SaleRow;
