//! Director, manager and trader dashboards.
//!
//! Every dashboard works on invoiced rows narrowed by a [`DashboardFilter`].
//! Growth compares the filtered window with the calendar window before it
//! (previous month for a month filter, previous year for a year filter) and
//! is left out when the filter names no window.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::aggregate::{aggregate, bucket_for, total, Bucket, DistinctField, Reducers};
use crate::classify::{classify_customer_group, classify_product, Category, CustomerGroup};
use crate::compare::{percent_change, round_to, PercentChange, MASS_PLACES, MONEY_PLACES};
use crate::config::{EngineConfig, ZeroBaselinePolicy};
use crate::error::ReportError;
use crate::rep_mapping::RepCustomers;
use crate::row::{latest_invoice_date, SaleRow};

/// Number of weeks in a trader order history.
pub const HISTORY_WEEKS: usize = 5;
/// Number of products a trader order history covers.
pub const HISTORY_PRODUCTS: usize = 5;

/// Row restrictions shared by all dashboards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
    /// Keeps only the customers this rep manages.
    pub rep: Option<RepCustomers>,
    /// Case-insensitive substring of the customer name.
    pub customer: Option<String>,
    pub category: Option<Category>,
}

impl DashboardFilter {
    pub fn matches(&self, row: &SaleRow, config: &EngineConfig) -> bool {
        if !row.is_invoice() {
            return false;
        }
        if self.year.is_some_and(|y| row.date.year() != y) {
            return false;
        }
        if self.month.is_some_and(|m| row.date.month() != m) {
            return false;
        }
        if let Some(rep) = &self.rep {
            if !rep.manages(&row.customer) {
                return false;
            }
        }
        if let Some(needle) = &self.customer {
            if !row.customer.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = self.category {
            if classify_product(&row.product, config.unmatched_product_policy) != category {
                return false;
            }
        }
        true
    }

    pub fn apply<'a>(&self, rows: &'a [SaleRow], config: &EngineConfig) -> Vec<&'a SaleRow> {
        rows.iter().filter(|r| self.matches(r, config)).collect()
    }

    /// The same filter shifted one calendar window back. `None` without a
    /// year: a bare month spans every year, so it has no single predecessor.
    pub fn previous_window(&self) -> Option<DashboardFilter> {
        let (year, month) = match (self.year, self.month) {
            (Some(y), Some(1)) => (y - 1, Some(12)),
            (Some(y), Some(m)) => (y, Some(m - 1)),
            (Some(y), None) => (y - 1, None),
            (None, _) => return None,
        };
        let year = Some(year);
        Some(DashboardFilter {
            year,
            month,
            ..self.clone()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Sales,
    Mass,
    Count,
    Price,
    Name,
}

impl FromStr for SortKey {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sales" | "sales_value" => Ok(SortKey::Sales),
            "mass" => Ok(SortKey::Mass),
            "count" | "orders" => Ok(SortKey::Count),
            "price" | "price_per_kg" => Ok(SortKey::Price),
            "name" => Ok(SortKey::Name),
            _ => Err(ReportError::InvalidInput(format!(
                "unknown sort key '{}'. Valid keys: sales, mass, count, price, name",
                s.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ReportError::InvalidInput(format!(
                "unknown sort order '{}'. Valid orders: asc, desc",
                s.trim()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sort {
    pub key: SortKey,
    pub order: SortOrder,
}

/// A dashboard line that can be ordered by a [`SortKey`].
trait Ranked {
    fn sort_name(&self) -> &str;
    fn sort_metric(&self, key: SortKey) -> f64;
}

fn sort_lines<T: Ranked>(lines: &mut [T], sort: Sort) {
    lines.sort_by(|a, b| {
        let ordering = match sort.key {
            SortKey::Name => a.sort_name().cmp(b.sort_name()),
            key => a
                .sort_metric(key)
                .partial_cmp(&b.sort_metric(key))
                .unwrap_or(Ordering::Equal),
        };
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Growth of each metric against the previous window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Growth {
    pub sales: PercentChange,
    pub mass: PercentChange,
    pub price: PercentChange,
}

impl Growth {
    /// `None` when there is no previous window to compare with.
    fn between(now: &Bucket, before: Option<&Bucket>, policy: ZeroBaselinePolicy) -> Option<Self> {
        let before = before?;
        Some(Self {
            sales: percent_change(now.total_sales_value, before.total_sales_value, policy),
            mass: percent_change(now.total_mass, before.total_mass, policy),
            price: percent_change(
                now.mean_price_per_kg.unwrap_or(0.0),
                before.mean_price_per_kg.unwrap_or(0.0),
                policy,
            ),
        })
    }
}

/// Rows of the filtered window and, when one exists, of the window before it.
struct Windows<'a> {
    current: Vec<&'a SaleRow>,
    previous: Option<Vec<&'a SaleRow>>,
}

impl<'a> Windows<'a> {
    fn new(rows: &'a [SaleRow], filter: &DashboardFilter, config: &EngineConfig) -> Self {
        let current = filter.apply(rows, config);
        let previous = filter.previous_window().map(|f| f.apply(rows, config));
        tracing::debug!(
            current = current.len(),
            previous = ?previous.as_ref().map(|p| p.len()),
            "dashboard windows selected"
        );
        Self { current, previous }
    }

    /// Aggregate both windows by `key_fn`.
    fn aggregate<K, F>(
        &self,
        key_fn: F,
        reducers: &Reducers,
    ) -> (Vec<(K, Bucket)>, Option<Vec<(K, Bucket)>>)
    where
        K: Eq + std::hash::Hash + Clone,
        F: Fn(&SaleRow) -> K + Copy,
    {
        let current = aggregate(self.current.iter().copied(), key_fn, reducers);
        let previous = self
            .previous
            .as_ref()
            .map(|rows| aggregate(rows.iter().copied(), key_fn, reducers));
        (current, previous)
    }
}

fn previous_bucket<K: PartialEq>(previous: &Option<Vec<(K, Bucket)>>, key: &K) -> Option<Bucket> {
    previous.as_ref().map(|groups| bucket_for(groups, key))
}

fn distinct_count<F>(rows: &[&SaleRow], field: F) -> usize
where
    F: Fn(&SaleRow) -> &str,
{
    rows.iter().map(|r| field(*r)).collect::<HashSet<_>>().len()
}

fn mean_price(bucket: &Bucket) -> f64 {
    round_to(bucket.mean_price_per_kg.unwrap_or(0.0), MONEY_PLACES)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupplierLine {
    pub group: CustomerGroup,
    pub sales_value: f64,
    pub orders: usize,
    pub mass: f64,
    pub mean_price_per_kg: f64,
    pub growth: Option<Growth>,
}

impl Ranked for SupplierLine {
    fn sort_name(&self) -> &str {
        self.group.label()
    }

    fn sort_metric(&self, key: SortKey) -> f64 {
        match key {
            SortKey::Sales | SortKey::Name => self.sales_value,
            SortKey::Mass => self.mass,
            SortKey::Count => self.orders as f64,
            SortKey::Price => self.mean_price_per_kg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorSummary {
    pub total_sales: f64,
    pub total_mass: f64,
    pub mean_price_per_kg: f64,
    pub record_count: usize,
}

/// Performance per customer group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorDashboard {
    pub suppliers: Vec<SupplierLine>,
    pub summary: DirectorSummary,
}

pub fn director_dashboard(
    rows: &[SaleRow],
    filter: &DashboardFilter,
    sort: Sort,
    config: &EngineConfig,
) -> DirectorDashboard {
    let windows = Windows::new(rows, filter, config);
    let reducers = Reducers::sums().with_mean_price();
    let strictness = config.spar_strictness;
    let (current, previous) =
        windows.aggregate(|r: &SaleRow| classify_customer_group(&r.customer, strictness), &reducers);

    let mut suppliers: Vec<SupplierLine> = CustomerGroup::ALL
        .iter()
        .filter_map(|group| {
            let (_, bucket) = current.iter().find(|(g, _)| g == group)?;
            let before = previous_bucket(&previous, group);
            Some(SupplierLine {
                group: *group,
                sales_value: round_to(bucket.total_sales_value, MONEY_PLACES),
                orders: bucket.count,
                mass: round_to(bucket.total_mass, MASS_PLACES),
                mean_price_per_kg: mean_price(bucket),
                growth: Growth::between(bucket, before.as_ref(), config.zero_baseline_policy),
            })
        })
        .collect();
    sort_lines(&mut suppliers, sort);

    let all = total(windows.current.iter().copied(), &reducers);
    DirectorDashboard {
        suppliers,
        summary: DirectorSummary {
            total_sales: round_to(all.total_sales_value, MONEY_PLACES),
            total_mass: round_to(all.total_mass, MASS_PLACES),
            mean_price_per_kg: mean_price(&all),
            record_count: all.count,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerLine {
    pub customer: String,
    pub sales_value: f64,
    pub mass: f64,
    pub orders: usize,
    pub last_order: NaiveDate,
    /// Days between the last order and the latest invoiced date in the ledger.
    pub days_since_last_order: i64,
    pub growth: Option<Growth>,
}

impl Ranked for CustomerLine {
    fn sort_name(&self) -> &str {
        &self.customer
    }

    fn sort_metric(&self, key: SortKey) -> f64 {
        match key {
            SortKey::Sales | SortKey::Name => self.sales_value,
            SortKey::Mass => self.mass,
            SortKey::Count => self.orders as f64,
            SortKey::Price => crate::row::derive_price_per_kg(self.sales_value, self.mass),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductLine {
    pub product: String,
    pub category: Category,
    pub sales_value: f64,
    pub mass: f64,
    pub customer_count: usize,
    pub mean_price_per_kg: f64,
    pub growth: Option<Growth>,
}

impl Ranked for ProductLine {
    fn sort_name(&self) -> &str {
        &self.product
    }

    fn sort_metric(&self, key: SortKey) -> f64 {
        match key {
            SortKey::Sales | SortKey::Name => self.sales_value,
            SortKey::Mass => self.mass,
            SortKey::Count => self.customer_count as f64,
            SortKey::Price => self.mean_price_per_kg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLine {
    pub category: Category,
    pub sales_value: f64,
    pub mass: f64,
    pub mean_price_per_kg: f64,
    pub growth: Option<Growth>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerSummary {
    pub total_sales: f64,
    pub total_mass: f64,
    pub unique_customers: usize,
    pub unique_products: usize,
}

/// Performance per customer, product and category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerDashboard {
    pub customers: Vec<CustomerLine>,
    pub products: Vec<ProductLine>,
    /// Categories with sales, in canonical order.
    pub categories: Vec<CategoryLine>,
    pub summary: ManagerSummary,
}

fn customer_lines(
    rows: &[SaleRow],
    windows: &Windows<'_>,
    sort: Sort,
    config: &EngineConfig,
) -> Vec<CustomerLine> {
    let reducers = Reducers::sums().with_mean_price();
    let (current, previous) = windows.aggregate(|r: &SaleRow| r.customer.clone(), &reducers);
    let latest = latest_invoice_date(rows);

    let mut customers: Vec<CustomerLine> = current
        .iter()
        .filter_map(|(customer, bucket)| {
            let last_order = windows
                .current
                .iter()
                .filter(|r| &r.customer == customer)
                .map(|r| r.date)
                .max()?;
            let before = previous_bucket(&previous, customer);
            Some(CustomerLine {
                customer: customer.clone(),
                sales_value: round_to(bucket.total_sales_value, MONEY_PLACES),
                mass: round_to(bucket.total_mass, MASS_PLACES),
                orders: bucket.count,
                last_order,
                days_since_last_order: latest.map_or(0, |l| (l - last_order).num_days()),
                growth: Growth::between(bucket, before.as_ref(), config.zero_baseline_policy),
            })
        })
        .collect();
    sort_lines(&mut customers, sort);
    customers
}

pub fn manager_dashboard(
    rows: &[SaleRow],
    filter: &DashboardFilter,
    sort: Sort,
    config: &EngineConfig,
) -> ManagerDashboard {
    let windows = Windows::new(rows, filter, config);
    let policy = config.zero_baseline_policy;
    let customers = customer_lines(rows, &windows, sort, config);

    let product_policy = config.unmatched_product_policy;
    let (current, previous) = windows.aggregate(
        |r: &SaleRow| r.product.clone(),
        &Reducers::distinct(DistinctField::Customer).with_mean_price(),
    );
    let mut products: Vec<ProductLine> = current
        .iter()
        .map(|(product, bucket)| {
            let before = previous_bucket(&previous, product);
            ProductLine {
                product: product.clone(),
                category: classify_product(product, product_policy),
                sales_value: round_to(bucket.total_sales_value, MONEY_PLACES),
                mass: round_to(bucket.total_mass, MASS_PLACES),
                customer_count: bucket.distinct_count.unwrap_or(0),
                mean_price_per_kg: mean_price(bucket),
                growth: Growth::between(bucket, before.as_ref(), policy),
            }
        })
        .collect();
    sort_lines(&mut products, sort);

    let (current, previous) = windows.aggregate(
        |r: &SaleRow| classify_product(&r.product, product_policy),
        &Reducers::sums().with_mean_price(),
    );
    let categories = Category::reported(product_policy)
        .into_iter()
        .filter_map(|category| {
            let (_, bucket) = current.iter().find(|(c, _)| *c == category)?;
            let before = previous_bucket(&previous, &category);
            Some(CategoryLine {
                category,
                sales_value: round_to(bucket.total_sales_value, MONEY_PLACES),
                mass: round_to(bucket.total_mass, MASS_PLACES),
                mean_price_per_kg: mean_price(bucket),
                growth: Growth::between(bucket, before.as_ref(), policy),
            })
        })
        .collect();

    let all = total(windows.current.iter().copied(), &Reducers::sums());
    ManagerDashboard {
        customers,
        products,
        categories,
        summary: ManagerSummary {
            total_sales: round_to(all.total_sales_value, MONEY_PLACES),
            total_mass: round_to(all.total_mass, MASS_PLACES),
            unique_customers: distinct_count(&windows.current, |r| r.customer.as_str()),
            unique_products: distinct_count(&windows.current, |r| r.product.as_str()),
        },
    }
}

/// Weekly order counts for one product. `weeks[0]` is the seven days ending
/// on the reference date, `weeks[1]` the seven days before that, and so on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderHistory {
    pub product: String,
    pub weeks: [usize; HISTORY_WEEKS],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraderSummary {
    pub total_sales: f64,
    pub total_mass: f64,
    pub unique_customers: usize,
}

/// Customer activity and recent order rhythm per product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraderDashboard {
    pub customers: Vec<CustomerLine>,
    /// Latest invoiced date in the filtered rows; `None` when nothing matched.
    pub reference_date: Option<NaiveDate>,
    pub order_history: Vec<OrderHistory>,
    pub summary: TraderSummary,
}

pub fn trader_dashboard(
    rows: &[SaleRow],
    filter: &DashboardFilter,
    sort: Sort,
    config: &EngineConfig,
) -> TraderDashboard {
    let windows = Windows::new(rows, filter, config);
    let customers = customer_lines(rows, &windows, sort, config);
    let reference = windows.current.iter().map(|r| r.date).max();

    let mut products: Vec<&str> = Vec::new();
    for row in &windows.current {
        if products.len() == HISTORY_PRODUCTS {
            break;
        }
        if !products.contains(&row.product.as_str()) {
            products.push(&row.product);
        }
    }

    let order_history = match reference {
        Some(reference) => products
            .iter()
            .map(|product| OrderHistory {
                product: product.to_string(),
                weeks: weekly_orders(&windows.current, product, reference),
            })
            .collect(),
        None => Vec::new(),
    };

    let all = total(windows.current.iter().copied(), &Reducers::sums());
    TraderDashboard {
        customers,
        reference_date: reference,
        order_history,
        summary: TraderSummary {
            total_sales: round_to(all.total_sales_value, MONEY_PLACES),
            total_mass: round_to(all.total_mass, MASS_PLACES),
            unique_customers: distinct_count(&windows.current, |r| r.customer.as_str()),
        },
    }
}

fn weekly_orders(rows: &[&SaleRow], product: &str, reference: NaiveDate) -> [usize; HISTORY_WEEKS] {
    let mut weeks = [0; HISTORY_WEEKS];
    for row in rows.iter().filter(|r| r.product == product) {
        let age = (reference - row.date).num_days();
        if age < 0 {
            continue;
        }
        let week = (age / 7) as usize;
        if week < HISTORY_WEEKS {
            weeks[week] += 1;
        }
    }
    weeks
}

/// First day of the order-history window ending on `reference`.
pub fn history_start(reference: NaiveDate) -> NaiveDate {
    reference - Duration::days(HISTORY_WEEKS as i64 * 7 - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rep_mapping::{find_rep, load_rep_mappings};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn inv(day: NaiveDate, customer: &str, product: &str, mass: f64, value: f64) -> SaleRow {
        SaleRow::new(day, "INV", customer, product, mass, value)
    }

    fn ledger() -> Vec<SaleRow> {
        vec![
            inv(date(2025, 4, 10), "Spar Chatsworth", "Whole Bird", 100.0, 4000.0),
            inv(date(2025, 4, 12), "Mega Save Chatsworth", "Chicken Wings", 20.0, 1000.0),
            inv(date(2025, 5, 2), "Spar Chatsworth", "Whole Bird", 100.0, 5000.0),
            inv(date(2025, 5, 9), "Pick n Pay Westwood", "Breast Fillet", 50.0, 4500.0),
            inv(date(2025, 5, 16), "Mega Save Chatsworth", "Chicken Wings", 10.0, 600.0),
            SaleRow::new(date(2025, 5, 16), "CRN", "Spar Chatsworth", "Whole Bird", 5.0, -250.0),
            inv(date(2024, 5, 20), "Spar Chatsworth", "Whole Bird", 80.0, 3000.0),
        ]
    }

    fn may_2025() -> DashboardFilter {
        DashboardFilter {
            year: Some(2025),
            month: Some(5),
            ..DashboardFilter::default()
        }
    }

    #[test]
    fn test_previous_window() {
        let jan = DashboardFilter {
            year: Some(2025),
            month: Some(1),
            ..DashboardFilter::default()
        };
        let prev = jan.previous_window().unwrap();
        assert_eq!((prev.year, prev.month), (Some(2024), Some(12)));

        let year_only = DashboardFilter {
            year: Some(2025),
            ..DashboardFilter::default()
        };
        assert_eq!(year_only.previous_window().unwrap().year, Some(2024));
        assert!(DashboardFilter::default().previous_window().is_none());
    }

    #[test]
    fn test_month_without_year_has_no_previous_window() {
        let january = DashboardFilter {
            month: Some(1),
            ..DashboardFilter::default()
        };
        assert!(january.previous_window().is_none());

        let rows = vec![
            inv(date(2024, 12, 10), "Mega", "Wings", 5.0, 100.0),
            inv(date(2025, 1, 10), "Mega", "Wings", 5.0, 120.0),
            inv(date(2025, 12, 10), "Mega", "Wings", 5.0, 900.0),
        ];
        let dash = manager_dashboard(&rows, &january, Sort::default(), &EngineConfig::default());
        assert_eq!(dash.customers.len(), 1);
        assert!(dash.customers[0].growth.is_none());
    }

    #[test]
    fn test_filter_excludes_credits_and_other_months() {
        let rows = ledger();
        let matched = may_2025().apply(&rows, &EngineConfig::default());
        assert_eq!(matched.len(), 3);
        assert!(matched.iter().all(|r| r.is_invoice()));
    }

    #[test]
    fn test_rep_filter() {
        let mappings = load_rep_mappings().unwrap();
        let filter = DashboardFilter {
            rep: find_rep(&mappings, "Lyle").cloned(),
            ..DashboardFilter::default()
        };
        let rows = ledger();
        let matched = filter.apply(&rows, &EngineConfig::default());
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].customer, "Pick n Pay Westwood");
    }

    #[test]
    fn test_customer_and_category_filter() {
        let rows = ledger();
        let filter = DashboardFilter {
            customer: Some("spar".to_string()),
            category: Some(Category::Wb),
            ..DashboardFilter::default()
        };
        assert_eq!(filter.apply(&rows, &EngineConfig::default()).len(), 3);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("mass".parse::<SortKey>().unwrap(), SortKey::Mass);
        assert_eq!("sales_value".parse::<SortKey>().unwrap(), SortKey::Sales);
        assert!("colour".parse::<SortKey>().is_err());
        assert_eq!("ASC".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("up".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_director_groups_and_growth() {
        let dash = director_dashboard(&ledger(), &may_2025(), Sort::default(), &EngineConfig::default());
        let groups: Vec<_> = dash.suppliers.iter().map(|s| s.group).collect();
        assert_eq!(
            groups,
            vec![CustomerGroup::SparDropShip, CustomerGroup::PicknPay, CustomerGroup::Mega]
        );

        let spar = &dash.suppliers[0];
        assert_eq!(spar.sales_value, 5000.0);
        let growth = spar.growth.unwrap();
        assert_eq!(growth.sales, PercentChange::Change(25.0));
        assert_eq!(growth.mass, PercentChange::Change(0.0));

        let pnp = &dash.suppliers[1];
        assert_eq!(pnp.growth.unwrap().sales, PercentChange::NoBaseline);

        let mega = &dash.suppliers[2];
        assert_eq!(mega.growth.unwrap().sales, PercentChange::Change(-40.0));

        assert_eq!(dash.summary.total_sales, 10100.0);
        assert_eq!(dash.summary.record_count, 3);
    }

    #[test]
    fn test_director_without_window_has_no_growth() {
        let dash = director_dashboard(
            &ledger(),
            &DashboardFilter::default(),
            Sort::default(),
            &EngineConfig::default(),
        );
        assert!(dash.suppliers.iter().all(|s| s.growth.is_none()));
        assert_eq!(dash.summary.record_count, 6);
    }

    #[test]
    fn test_director_year_growth() {
        let filter = DashboardFilter {
            year: Some(2025),
            ..DashboardFilter::default()
        };
        let dash = director_dashboard(&ledger(), &filter, Sort::default(), &EngineConfig::default());
        let spar = dash
            .suppliers
            .iter()
            .find(|s| s.group == CustomerGroup::SparDropShip)
            .unwrap();
        assert_eq!(spar.growth.unwrap().sales, PercentChange::Change(200.0));
    }

    #[test]
    fn test_director_sort_by_name_ascending() {
        let sort = Sort {
            key: SortKey::Name,
            order: SortOrder::Asc,
        };
        let dash = director_dashboard(&ledger(), &may_2025(), sort, &EngineConfig::default());
        let names: Vec<_> = dash.suppliers.iter().map(|s| s.group.label()).collect();
        assert_eq!(names, vec!["Mega", "PnP", "Spar D/Ship"]);
    }

    #[test]
    fn test_director_empty_filter_result() {
        let filter = DashboardFilter {
            year: Some(2030),
            ..DashboardFilter::default()
        };
        let dash = director_dashboard(&ledger(), &filter, Sort::default(), &EngineConfig::default());
        assert!(dash.suppliers.is_empty());
        assert_eq!(dash.summary.record_count, 0);
        assert_eq!(dash.summary.total_sales, 0.0);
    }

    #[test]
    fn test_manager_dashboard() {
        let dash = manager_dashboard(&ledger(), &may_2025(), Sort::default(), &EngineConfig::default());
        assert_eq!(dash.summary.unique_customers, 3);
        assert_eq!(dash.summary.unique_products, 3);

        assert_eq!(dash.customers[0].customer, "Spar Chatsworth");
        assert_eq!(dash.customers[0].last_order, date(2025, 5, 2));
        assert_eq!(dash.customers[0].days_since_last_order, 14);

        let wings = dash.products.iter().find(|p| p.product == "Chicken Wings").unwrap();
        assert_eq!(wings.category, Category::Portion);
        assert_eq!(wings.customer_count, 1);
        assert_eq!(wings.mean_price_per_kg, 60.0);
        assert_eq!(wings.growth.unwrap().price, PercentChange::Change(20.0));

        let categories: Vec<_> = dash.categories.iter().map(|c| c.category).collect();
        assert_eq!(categories, vec![Category::Wb, Category::Fillets, Category::Portion]);
    }

    #[test]
    fn test_trader_order_history() {
        let d = date(2025, 5, 31);
        let rows = vec![
            inv(d, "Spar", "Wings", 1.0, 10.0),
            inv(d - Duration::days(3), "Spar", "Wings", 1.0, 10.0),
            inv(d - Duration::days(7), "Mega", "Wings", 1.0, 10.0),
            inv(d - Duration::days(34), "Mega", "Wings", 1.0, 10.0),
            inv(d - Duration::days(40), "Mega", "Wings", 1.0, 10.0),
            inv(d - Duration::days(15), "Mega", "Livers", 1.0, 10.0),
        ];
        let dash = trader_dashboard(&rows, &DashboardFilter::default(), Sort::default(), &EngineConfig::default());
        assert_eq!(dash.reference_date, Some(d));
        assert_eq!(dash.order_history.len(), 2);
        assert_eq!(dash.order_history[0].product, "Wings");
        assert_eq!(dash.order_history[0].weeks, [2, 1, 0, 0, 1]);
        assert_eq!(dash.order_history[1].weeks, [0, 0, 1, 0, 0]);
        assert_eq!(dash.summary.unique_customers, 2);
        assert_eq!(history_start(d), date(2025, 4, 27));
    }

    #[test]
    fn test_trader_history_limited_to_five_products() {
        let d = date(2025, 5, 31);
        let rows: Vec<SaleRow> = (0..7)
            .map(|i| inv(d, "Spar", &format!("Product {}", i), 1.0, 1.0))
            .collect();
        let dash = trader_dashboard(&rows, &DashboardFilter::default(), Sort::default(), &EngineConfig::default());
        assert_eq!(dash.order_history.len(), HISTORY_PRODUCTS);
        assert_eq!(dash.order_history[4].product, "Product 4");
    }
}
