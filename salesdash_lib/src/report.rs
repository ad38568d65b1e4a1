//! Report assembly: daily snapshots and period-over-period comparisons.
//!
//! Sums are computed on raw values and only rounded here, when the report
//! lines are built: money to 2 decimals, mass to 1 decimal, percentages to 1.

use chrono::NaiveDate;
use serde::Serialize;

use crate::aggregate::{aggregate, bucket_for, rank_desc, total, Bucket, DistinctField, Reducers};
use crate::classify::{classify_customer_group, classify_product, Category, CustomerGroup};
use crate::compare::{round_to, Comparison, MASS_PLACES, MONEY_PLACES};
use crate::config::{EngineConfig, OnEmptyDate};
use crate::error::ReportError;
use crate::period::{select_period, DateRange, PeriodKind};
use crate::row::{invoices, latest_invoice_date, SaleRow};

/// Headline figures for a set of invoiced rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    pub sales_value: f64,
    pub mass: f64,
    pub price_per_kg: f64,
    pub orders: usize,
}

impl Totals {
    fn from_bucket(bucket: &Bucket) -> Self {
        Self {
            sales_value: round_to(bucket.total_sales_value, MONEY_PLACES),
            mass: round_to(bucket.total_mass, MASS_PLACES),
            price_per_kg: round_to(bucket.price_per_kg(), MONEY_PLACES),
            orders: bucket.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLine {
    pub category: Category,
    pub sales_value: f64,
    pub mass: f64,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupLine {
    pub group: CustomerGroup,
    pub sales_value: f64,
    pub mass: f64,
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerLine {
    pub customer: String,
    pub sales_value: f64,
    pub mass: f64,
}

/// A product ranked by mass, with its mass rendered for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductFocus {
    pub product: String,
    pub mass: f64,
    pub display_mass: String,
    pub customer_count: usize,
}

/// Single-day report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotReport {
    pub date: NaiveDate,
    pub totals: Totals,
    /// Every reported category in canonical order, zero-filled.
    pub categories: Vec<CategoryLine>,
    /// The named customer groups, by sales value descending.
    pub groups: Vec<GroupLine>,
    pub top_customers: Vec<CustomerLine>,
    pub product_focus: Vec<ProductFocus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsComparison {
    pub sales_value: Comparison,
    pub mass: Comparison,
    pub price_per_kg: Comparison,
    pub orders: Comparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryComparison {
    pub category: Category,
    pub sales_value: Comparison,
    pub mass: Comparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupComparison {
    pub group: CustomerGroup,
    pub sales_value: Comparison,
    pub mass: Comparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerComparison {
    pub customer: String,
    pub sales_value: Comparison,
}

/// Current period against the period immediately before it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub period: PeriodKind,
    /// For example "This Week vs Last Week".
    pub name: String,
    pub reference_date: NaiveDate,
    pub current: DateRange,
    pub previous: DateRange,
    pub totals: TotalsComparison,
    pub categories: Vec<CategoryComparison>,
    /// Named groups ordered by current sales value descending.
    pub groups: Vec<GroupComparison>,
    /// Top customers of the current period against their own previous value.
    pub top_customers: Vec<CustomerComparison>,
    pub product_focus: Vec<ProductFocus>,
}

/// Render a mass in kilograms: tonnes with one decimal from 1000 kg, whole
/// kilograms below that.
pub fn format_mass(kg: f64) -> String {
    if kg >= 1000.0 {
        format!("{:.1}t", kg / 1000.0)
    } else {
        format!("{:.0}kg", kg)
    }
}

/// Build the report for a single day.
///
/// Without `reference` the latest invoiced date in `rows` is used. A date
/// without invoiced rows fails with [`ReportError::NoDataForDate`] unless the
/// config re-anchors on the latest date.
pub fn build_snapshot_report(
    rows: &[SaleRow],
    reference: Option<NaiveDate>,
    config: &EngineConfig,
) -> Result<SnapshotReport, ReportError> {
    let date = resolve_date(rows, reference, config, DateRange::single)?;
    let day = DateRange::single(date).invoices(rows);
    tracing::debug!(%date, rows = day.len(), "building snapshot report");

    Ok(SnapshotReport {
        date,
        totals: Totals::from_bucket(&total(day.iter().copied(), &Reducers::sums())),
        categories: category_lines(&day, config),
        groups: group_lines(&day, config),
        top_customers: top_customers(&day, config.top_n)
            .into_iter()
            .map(|(customer, bucket)| CustomerLine {
                customer,
                sales_value: round_to(bucket.total_sales_value, MONEY_PLACES),
                mass: round_to(bucket.total_mass, MASS_PLACES),
            })
            .collect(),
        product_focus: product_focus(&day, config.top_n),
    })
}

/// Build a period-over-period comparison around `reference` (the latest
/// invoiced date when absent).
pub fn build_comparison_report(
    rows: &[SaleRow],
    kind: PeriodKind,
    reference: Option<NaiveDate>,
    config: &EngineConfig,
) -> Result<ComparisonReport, ReportError> {
    let reference = resolve_date(rows, reference, config, |d| select_period(d, kind).0)?;
    let (current_range, previous_range) = select_period(reference, kind);
    let current = current_range.invoices(rows);
    let previous = previous_range.invoices(rows);
    tracing::debug!(
        %kind,
        %current_range,
        %previous_range,
        current_rows = current.len(),
        previous_rows = previous.len(),
        "building comparison report"
    );

    let policy = config.zero_baseline_policy;
    let sums = Reducers::sums();
    let now = total(current.iter().copied(), &sums);
    let before = total(previous.iter().copied(), &sums);

    let totals = TotalsComparison {
        sales_value: Comparison::new(
            now.total_sales_value,
            before.total_sales_value,
            MONEY_PLACES,
            policy,
        ),
        mass: Comparison::new(now.total_mass, before.total_mass, MASS_PLACES, policy),
        price_per_kg: Comparison::new(
            now.price_per_kg(),
            before.price_per_kg(),
            MONEY_PLACES,
            policy,
        ),
        orders: Comparison::new(now.count as f64, before.count as f64, 0, policy),
    };

    let product_policy = config.unmatched_product_policy;
    let by_category = |r: &SaleRow| classify_product(&r.product, product_policy);
    let current_categories = aggregate(current.iter().copied(), by_category, &sums);
    let previous_categories = aggregate(previous.iter().copied(), by_category, &sums);
    let categories = Category::reported(product_policy)
        .into_iter()
        .map(|category| {
            let now = bucket_for(&current_categories, &category);
            let before = bucket_for(&previous_categories, &category);
            CategoryComparison {
                category,
                sales_value: Comparison::new(
                    now.total_sales_value,
                    before.total_sales_value,
                    MONEY_PLACES,
                    policy,
                ),
                mass: Comparison::new(now.total_mass, before.total_mass, MASS_PLACES, policy),
            }
        })
        .collect();

    let strictness = config.spar_strictness;
    let by_group = |r: &SaleRow| classify_customer_group(&r.customer, strictness);
    let current_groups = aggregate(current.iter().copied(), by_group, &sums);
    let previous_groups = aggregate(previous.iter().copied(), by_group, &sums);
    let mut ranked: Vec<(CustomerGroup, Bucket)> = CustomerGroup::NAMED
        .iter()
        .map(|g| (*g, bucket_for(&current_groups, g)))
        .collect();
    rank_desc(&mut ranked, |(_, b)| b.total_sales_value);
    let groups = ranked
        .into_iter()
        .map(|(group, now)| {
            let before = bucket_for(&previous_groups, &group);
            GroupComparison {
                group,
                sales_value: Comparison::new(
                    now.total_sales_value,
                    before.total_sales_value,
                    MONEY_PLACES,
                    policy,
                ),
                mass: Comparison::new(now.total_mass, before.total_mass, MASS_PLACES, policy),
            }
        })
        .collect();

    let previous_customers = aggregate(previous.iter().copied(), |r| r.customer.clone(), &sums);
    let top_customers = top_customers(&current, config.top_n)
        .into_iter()
        .map(|(customer, now)| {
            let before = bucket_for(&previous_customers, &customer);
            CustomerComparison {
                sales_value: Comparison::new(
                    now.total_sales_value,
                    before.total_sales_value,
                    MONEY_PLACES,
                    policy,
                ),
                customer,
            }
        })
        .collect();

    Ok(ComparisonReport {
        period: kind,
        name: kind.comparison_name().to_string(),
        reference_date: reference,
        current: current_range,
        previous: previous_range,
        totals,
        categories,
        groups,
        top_customers,
        product_focus: product_focus(&current, config.top_n),
    })
}

/// Pick the date a report is anchored on. `window` maps a candidate date to
/// the range that must contain invoiced rows for the report to be built.
fn resolve_date<W>(
    rows: &[SaleRow],
    reference: Option<NaiveDate>,
    config: &EngineConfig,
    window: W,
) -> Result<NaiveDate, ReportError>
where
    W: Fn(NaiveDate) -> DateRange,
{
    let latest = latest_invoice_date(rows);
    let requested = match reference {
        Some(date) => date,
        None => return latest.ok_or(ReportError::NoDataForDate { date: None }),
    };

    let range = window(requested);
    if invoices(rows).any(|r| range.contains(r.date)) {
        return Ok(requested);
    }

    match (config.on_empty_date, latest) {
        (OnEmptyDate::FallbackToLatest, Some(latest)) => {
            tracing::warn!(
                requested = %requested,
                latest = %latest,
                "no invoiced sales in requested window, falling back to latest date"
            );
            Ok(latest)
        }
        _ => Err(ReportError::NoDataForDate {
            date: Some(requested),
        }),
    }
}

fn category_lines(rows: &[&SaleRow], config: &EngineConfig) -> Vec<CategoryLine> {
    let policy = config.unmatched_product_policy;
    let groups = aggregate(
        rows.iter().copied(),
        |r| classify_product(&r.product, policy),
        &Reducers::sums(),
    );
    Category::reported(policy)
        .into_iter()
        .map(|category| {
            let bucket = bucket_for(&groups, &category);
            CategoryLine {
                category,
                sales_value: round_to(bucket.total_sales_value, MONEY_PLACES),
                mass: round_to(bucket.total_mass, MASS_PLACES),
                orders: bucket.count,
            }
        })
        .collect()
}

fn group_lines(rows: &[&SaleRow], config: &EngineConfig) -> Vec<GroupLine> {
    let strictness = config.spar_strictness;
    let groups = aggregate(
        rows.iter().copied(),
        |r| classify_customer_group(&r.customer, strictness),
        &Reducers::sums(),
    );
    let mut ranked: Vec<(CustomerGroup, Bucket)> = CustomerGroup::NAMED
        .iter()
        .map(|g| (*g, bucket_for(&groups, g)))
        .collect();
    rank_desc(&mut ranked, |(_, b)| b.total_sales_value);
    ranked
        .into_iter()
        .map(|(group, bucket)| GroupLine {
            group,
            sales_value: round_to(bucket.total_sales_value, MONEY_PLACES),
            mass: round_to(bucket.total_mass, MASS_PLACES),
            orders: bucket.count,
        })
        .collect()
}

/// Customers by sales value, highest first; ties keep first-seen order.
fn top_customers(rows: &[&SaleRow], n: usize) -> Vec<(String, Bucket)> {
    let mut customers = aggregate(rows.iter().copied(), |r| r.customer.clone(), &Reducers::sums());
    rank_desc(&mut customers, |(_, b)| b.total_sales_value);
    customers.truncate(n);
    customers
}

/// Products whose mass is still positive at reporting precision, heaviest
/// first.
fn product_focus(rows: &[&SaleRow], n: usize) -> Vec<ProductFocus> {
    let mut products: Vec<(String, Bucket)> = aggregate(
        rows.iter().copied(),
        |r| r.product.clone(),
        &Reducers::distinct(DistinctField::Customer),
    )
    .into_iter()
    .filter(|(_, b)| round_to(b.total_mass, MASS_PLACES) > 0.0)
    .collect();
    rank_desc(&mut products, |(_, b)| b.total_mass);
    products.truncate(n);

    products
        .into_iter()
        .map(|(product, bucket)| ProductFocus {
            product,
            mass: round_to(bucket.total_mass, MASS_PLACES),
            display_mass: format_mass(bucket.total_mass),
            customer_count: bucket.distinct_count.unwrap_or(0),
        })
        .collect()
}
