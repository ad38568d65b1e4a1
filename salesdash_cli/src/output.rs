use anyhow::Result;
use salesdash_lib::compare::Comparison;
use salesdash_lib::dashboard::{
    CategoryLine as CategoryPerformance, CustomerLine as CustomerActivity, OrderHistory,
    ProductLine, SupplierLine,
};
use salesdash_lib::report::{format_mass, CategoryLine, CustomerLine, GroupLine, ProductFocus};
use salesdash_lib::{
    ComparisonReport, DirectorDashboard, FilterOptions, ManagerDashboard, SnapshotReport,
    TraderDashboard,
};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct SummaryRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Orders")]
    #[serde(rename = "Orders")]
    orders: usize,
    #[tabled(rename = "Sales")]
    #[serde(rename = "Sales")]
    sales: String,
    #[tabled(rename = "Mass")]
    #[serde(rename = "Mass")]
    mass: String,
    #[tabled(rename = "Price/kg")]
    #[serde(rename = "Price/kg")]
    price_per_kg: String,
}

#[derive(Tabled, Serialize)]
struct BreakdownRow {
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Sales")]
    #[serde(rename = "Sales")]
    sales: String,
    #[tabled(rename = "Mass")]
    #[serde(rename = "Mass")]
    mass: String,
    #[tabled(rename = "Orders")]
    #[serde(rename = "Orders")]
    orders: usize,
}

#[derive(Tabled, Serialize)]
struct CustomerRow {
    #[tabled(rename = "Customer")]
    #[serde(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Sales")]
    #[serde(rename = "Sales")]
    sales: String,
    #[tabled(rename = "Mass")]
    #[serde(rename = "Mass")]
    mass: String,
}

#[derive(Tabled, Serialize)]
struct ProductFocusRow {
    #[tabled(rename = "Product")]
    #[serde(rename = "Product")]
    product: String,
    #[tabled(rename = "Mass")]
    #[serde(rename = "Mass")]
    mass: String,
    #[tabled(rename = "Customers")]
    #[serde(rename = "Customers")]
    customers: usize,
}

#[derive(Tabled, Serialize)]
struct ComparisonRow {
    #[tabled(rename = "Section")]
    #[serde(rename = "Section")]
    section: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Current")]
    #[serde(rename = "Current")]
    current: String,
    #[tabled(rename = "Previous")]
    #[serde(rename = "Previous")]
    previous: String,
    #[tabled(rename = "Change")]
    #[serde(rename = "Change")]
    change: String,
}

#[derive(Tabled, Serialize)]
struct SupplierRow {
    #[tabled(rename = "Group")]
    #[serde(rename = "Group")]
    group: String,
    #[tabled(rename = "Sales")]
    #[serde(rename = "Sales")]
    sales: String,
    #[tabled(rename = "Orders")]
    #[serde(rename = "Orders")]
    orders: usize,
    #[tabled(rename = "Mass")]
    #[serde(rename = "Mass")]
    mass: String,
    #[tabled(rename = "Avg Price/kg")]
    #[serde(rename = "Avg Price/kg")]
    price_per_kg: String,
    #[tabled(rename = "Sales Growth")]
    #[serde(rename = "Sales Growth")]
    sales_growth: String,
    #[tabled(rename = "Mass Growth")]
    #[serde(rename = "Mass Growth")]
    mass_growth: String,
    #[tabled(rename = "Price Growth")]
    #[serde(rename = "Price Growth")]
    price_growth: String,
}

#[derive(Tabled, Serialize)]
struct CustomerActivityRow {
    #[tabled(rename = "Customer")]
    #[serde(rename = "Customer")]
    customer: String,
    #[tabled(rename = "Sales")]
    #[serde(rename = "Sales")]
    sales: String,
    #[tabled(rename = "Mass")]
    #[serde(rename = "Mass")]
    mass: String,
    #[tabled(rename = "Orders")]
    #[serde(rename = "Orders")]
    orders: usize,
    #[tabled(rename = "Last Order")]
    #[serde(rename = "Last Order")]
    last_order: String,
    #[tabled(rename = "Days Since")]
    #[serde(rename = "Days Since")]
    days_since: i64,
    #[tabled(rename = "Sales Growth")]
    #[serde(rename = "Sales Growth")]
    sales_growth: String,
    #[tabled(rename = "Mass Growth")]
    #[serde(rename = "Mass Growth")]
    mass_growth: String,
}

#[derive(Tabled, Serialize)]
struct ProductPerformanceRow {
    #[tabled(rename = "Product")]
    #[serde(rename = "Product")]
    product: String,
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    category: String,
    #[tabled(rename = "Sales")]
    #[serde(rename = "Sales")]
    sales: String,
    #[tabled(rename = "Mass")]
    #[serde(rename = "Mass")]
    mass: String,
    #[tabled(rename = "Customers")]
    #[serde(rename = "Customers")]
    customers: usize,
    #[tabled(rename = "Avg Price/kg")]
    #[serde(rename = "Avg Price/kg")]
    price_per_kg: String,
    #[tabled(rename = "Sales Growth")]
    #[serde(rename = "Sales Growth")]
    sales_growth: String,
    #[tabled(rename = "Mass Growth")]
    #[serde(rename = "Mass Growth")]
    mass_growth: String,
}

#[derive(Tabled, Serialize)]
struct CategoryPerformanceRow {
    #[tabled(rename = "Category")]
    #[serde(rename = "Category")]
    category: String,
    #[tabled(rename = "Sales")]
    #[serde(rename = "Sales")]
    sales: String,
    #[tabled(rename = "Mass")]
    #[serde(rename = "Mass")]
    mass: String,
    #[tabled(rename = "Avg Price/kg")]
    #[serde(rename = "Avg Price/kg")]
    price_per_kg: String,
    #[tabled(rename = "Sales Growth")]
    #[serde(rename = "Sales Growth")]
    sales_growth: String,
    #[tabled(rename = "Mass Growth")]
    #[serde(rename = "Mass Growth")]
    mass_growth: String,
    #[tabled(rename = "Price Growth")]
    #[serde(rename = "Price Growth")]
    price_growth: String,
}

#[derive(Tabled, Serialize)]
struct OrderHistoryRow {
    #[tabled(rename = "Product")]
    #[serde(rename = "Product")]
    product: String,
    #[tabled(rename = "Week 1")]
    #[serde(rename = "Week 1")]
    week_1: usize,
    #[tabled(rename = "Week 2")]
    #[serde(rename = "Week 2")]
    week_2: usize,
    #[tabled(rename = "Week 3")]
    #[serde(rename = "Week 3")]
    week_3: usize,
    #[tabled(rename = "Week 4")]
    #[serde(rename = "Week 4")]
    week_4: usize,
    #[tabled(rename = "Week 5")]
    #[serde(rename = "Week 5")]
    week_5: usize,
}

#[derive(Tabled, Serialize)]
struct FilterRow {
    #[tabled(rename = "Filter")]
    #[serde(rename = "Filter")]
    filter: String,
    #[tabled(rename = "Values")]
    #[serde(rename = "Values")]
    values: String,
}

// -- Row builders --

fn build_summary_rows(report: &SnapshotReport) -> Vec<SummaryRow> {
    vec![SummaryRow {
        date: report.date.to_string(),
        orders: report.totals.orders,
        sales: format_rands(report.totals.sales_value),
        mass: format_mass(report.totals.mass),
        price_per_kg: format_price(report.totals.price_per_kg),
    }]
}

fn build_category_rows(categories: &[CategoryLine]) -> Vec<BreakdownRow> {
    categories
        .iter()
        .map(|c| BreakdownRow {
            name: c.category.to_string(),
            sales: format_rands(c.sales_value),
            mass: format_mass(c.mass),
            orders: c.orders,
        })
        .collect()
}

fn build_group_rows(groups: &[GroupLine]) -> Vec<BreakdownRow> {
    groups
        .iter()
        .map(|g| BreakdownRow {
            name: g.group.to_string(),
            sales: format_rands(g.sales_value),
            mass: format_mass(g.mass),
            orders: g.orders,
        })
        .collect()
}

fn build_customer_rows(customers: &[CustomerLine]) -> Vec<CustomerRow> {
    customers
        .iter()
        .map(|c| CustomerRow {
            customer: c.customer.clone(),
            sales: format_rands(c.sales_value),
            mass: format_mass(c.mass),
        })
        .collect()
}

fn build_product_focus_rows(products: &[ProductFocus]) -> Vec<ProductFocusRow> {
    products
        .iter()
        .map(|p| ProductFocusRow {
            product: p.product.clone(),
            mass: p.display_mass.clone(),
            customers: p.customer_count,
        })
        .collect()
}

fn comparison_row(
    section: &str,
    name: &str,
    comparison: &Comparison,
    render: fn(f64) -> String,
) -> ComparisonRow {
    ComparisonRow {
        section: section.to_string(),
        name: name.to_string(),
        current: render(comparison.current),
        previous: render(comparison.previous),
        change: comparison.change.to_string(),
    }
}

fn build_comparison_rows(report: &ComparisonReport) -> Vec<ComparisonRow> {
    let totals = &report.totals;
    let mut rows = vec![
        comparison_row("Totals", "Sales", &totals.sales_value, format_rands),
        comparison_row("Totals", "Mass", &totals.mass, format_mass),
        comparison_row("Totals", "Price/kg", &totals.price_per_kg, format_price),
        comparison_row("Totals", "Orders", &totals.orders, format_count),
    ];
    rows.extend(
        report
            .categories
            .iter()
            .map(|c| comparison_row("Category", c.category.label(), &c.sales_value, format_rands)),
    );
    rows.extend(
        report
            .groups
            .iter()
            .map(|g| comparison_row("Group", g.group.label(), &g.sales_value, format_rands)),
    );
    rows.extend(
        report
            .top_customers
            .iter()
            .map(|c| comparison_row("Customer", &c.customer, &c.sales_value, format_rands)),
    );
    rows
}

fn build_supplier_rows(suppliers: &[SupplierLine]) -> Vec<SupplierRow> {
    suppliers
        .iter()
        .map(|s| SupplierRow {
            group: s.group.to_string(),
            sales: format_rands(s.sales_value),
            orders: s.orders,
            mass: format_mass(s.mass),
            price_per_kg: format_price(s.mean_price_per_kg),
            sales_growth: format_growth(s.growth.map(|g| g.sales)),
            mass_growth: format_growth(s.growth.map(|g| g.mass)),
            price_growth: format_growth(s.growth.map(|g| g.price)),
        })
        .collect()
}

fn build_customer_activity_rows(customers: &[CustomerActivity]) -> Vec<CustomerActivityRow> {
    customers
        .iter()
        .map(|c| CustomerActivityRow {
            customer: c.customer.clone(),
            sales: format_rands(c.sales_value),
            mass: format_mass(c.mass),
            orders: c.orders,
            last_order: c.last_order.to_string(),
            days_since: c.days_since_last_order,
            sales_growth: format_growth(c.growth.map(|g| g.sales)),
            mass_growth: format_growth(c.growth.map(|g| g.mass)),
        })
        .collect()
}

fn build_product_performance_rows(products: &[ProductLine]) -> Vec<ProductPerformanceRow> {
    products
        .iter()
        .map(|p| ProductPerformanceRow {
            product: p.product.clone(),
            category: p.category.to_string(),
            sales: format_rands(p.sales_value),
            mass: format_mass(p.mass),
            customers: p.customer_count,
            price_per_kg: format_price(p.mean_price_per_kg),
            sales_growth: format_growth(p.growth.map(|g| g.sales)),
            mass_growth: format_growth(p.growth.map(|g| g.mass)),
        })
        .collect()
}

fn build_category_performance_rows(
    categories: &[CategoryPerformance],
) -> Vec<CategoryPerformanceRow> {
    categories
        .iter()
        .map(|c| CategoryPerformanceRow {
            category: c.category.to_string(),
            sales: format_rands(c.sales_value),
            mass: format_mass(c.mass),
            price_per_kg: format_price(c.mean_price_per_kg),
            sales_growth: format_growth(c.growth.map(|g| g.sales)),
            mass_growth: format_growth(c.growth.map(|g| g.mass)),
            price_growth: format_growth(c.growth.map(|g| g.price)),
        })
        .collect()
}

fn build_order_history_rows(history: &[OrderHistory]) -> Vec<OrderHistoryRow> {
    history
        .iter()
        .map(|h| OrderHistoryRow {
            product: h.product.clone(),
            week_1: h.weeks[0],
            week_2: h.weeks[1],
            week_3: h.weeks[2],
            week_4: h.weeks[3],
            week_5: h.weeks[4],
        })
        .collect()
}

fn build_filter_rows(options: &FilterOptions) -> Vec<FilterRow> {
    fn join<T: ToString>(values: &[T]) -> String {
        values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    vec![
        FilterRow {
            filter: "Years".to_string(),
            values: join(&options.years),
        },
        FilterRow {
            filter: "Months".to_string(),
            values: join(&options.months),
        },
        FilterRow {
            filter: "Groups".to_string(),
            values: join(&options.groups),
        },
        FilterRow {
            filter: "Categories".to_string(),
            values: join(&options.categories),
        },
        FilterRow {
            filter: "Reps".to_string(),
            values: join(&options.reps),
        },
        FilterRow {
            filter: "Customers".to_string(),
            values: join(&options.customers),
        },
    ]
}

// -- Section output --

/// Print one titled block of rows. CSV blocks are separated by a blank line,
/// each with its own header.
fn print_section<T: Tabled + Serialize>(
    title: &str,
    rows: Vec<T>,
    format: &OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", title);
            println!("{}\n", Table::new(rows));
        }
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("### {}\n\n{}\n", title, table);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
            println!();
        }
        OutputFormat::Json => print_json(&rows),
    }
    Ok(())
}

pub fn print_snapshot(report: &SnapshotReport, format: &OutputFormat) -> Result<()> {
    print_section("Totals", build_summary_rows(report), format)?;
    print_section("Categories", build_category_rows(&report.categories), format)?;
    print_section("Customer Groups", build_group_rows(&report.groups), format)?;
    print_section("Top Customers", build_customer_rows(&report.top_customers), format)?;
    print_section(
        "Product Focus",
        build_product_focus_rows(&report.product_focus),
        format,
    )
}

pub fn print_comparison(report: &ComparisonReport, format: &OutputFormat) -> Result<()> {
    print_section(&report.name, build_comparison_rows(report), format)?;
    print_section(
        "Product Focus",
        build_product_focus_rows(&report.product_focus),
        format,
    )
}

pub fn print_director_dashboard(dash: &DirectorDashboard, format: &OutputFormat) -> Result<()> {
    print_section("Customer Groups", build_supplier_rows(&dash.suppliers), format)?;
    eprintln!(
        "Total {} | {} | avg {}/kg",
        format_rands(dash.summary.total_sales),
        format_mass(dash.summary.total_mass),
        format_price(dash.summary.mean_price_per_kg)
    );
    Ok(())
}

pub fn print_manager_dashboard(dash: &ManagerDashboard, format: &OutputFormat) -> Result<()> {
    print_section("Customers", build_customer_activity_rows(&dash.customers), format)?;
    print_section("Products", build_product_performance_rows(&dash.products), format)?;
    print_section(
        "Categories",
        build_category_performance_rows(&dash.categories),
        format,
    )?;
    eprintln!(
        "Total {} | {}",
        format_rands(dash.summary.total_sales),
        format_mass(dash.summary.total_mass)
    );
    Ok(())
}

pub fn print_trader_dashboard(dash: &TraderDashboard, format: &OutputFormat) -> Result<()> {
    print_section("Customers", build_customer_activity_rows(&dash.customers), format)?;
    print_section(
        "Order History",
        build_order_history_rows(&dash.order_history),
        format,
    )?;
    eprintln!(
        "Total {} | {} | {} customers",
        format_rands(dash.summary.total_sales),
        format_mass(dash.summary.total_mass),
        dash.summary.unique_customers
    );
    Ok(())
}

pub fn print_filter_options(options: &FilterOptions, format: &OutputFormat) -> Result<()> {
    print_section("Filters", build_filter_rows(options), format)
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Formatting --

fn format_rands(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{}R{:.1}M", sign, abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{}R{:.1}K", sign, abs / 1_000.0)
    } else {
        format!("{}R{:.2}", sign, abs)
    }
}

fn format_price(value: f64) -> String {
    format!("R{:.2}", value)
}

fn format_count(value: f64) -> String {
    format!("{:.0}", value)
}

fn format_growth(change: Option<salesdash_lib::PercentChange>) -> String {
    change.map_or_else(|| "-".to_string(), |c| c.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use salesdash_lib::{
        build_comparison_report, build_snapshot_report, EngineConfig, PercentChange, PeriodKind,
        SaleRow,
    };

    fn rows() -> Vec<SaleRow> {
        let today = NaiveDate::from_ymd_opt(2025, 5, 16).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2025, 5, 15).unwrap();
        vec![
            SaleRow::new(today, "INV", "Spar Chatsworth", "Whole Bird", 1200.0, 54000.0),
            SaleRow::new(today, "INV", "Mega Save", "Chicken Wings", 40.0, 2200.0),
            SaleRow::new(yesterday, "INV", "Spar Chatsworth", "Whole Bird", 1000.0, 45000.0),
        ]
    }

    // -- format tests --

    #[test]
    fn test_format_rands_millions() {
        assert_eq!(format_rands(15_000_000.0), "R15.0M");
    }

    #[test]
    fn test_format_rands_thousands() {
        assert_eq!(format_rands(54_000.0), "R54.0K");
    }

    #[test]
    fn test_format_rands_small_and_negative() {
        assert_eq!(format_rands(950.5), "R950.50");
        assert_eq!(format_rands(-2_500.0), "-R2.5K");
        assert_eq!(format_rands(0.0), "R0.00");
    }

    #[test]
    fn test_format_growth() {
        assert_eq!(format_growth(None), "-");
        assert_eq!(format_growth(Some(PercentChange::Change(12.5))), "+12.5%");
        assert_eq!(format_growth(Some(PercentChange::NoBaseline)), "no comp");
    }

    // -- Row builder tests --

    #[test]
    fn test_build_summary_rows() {
        let report = build_snapshot_report(&rows(), None, &EngineConfig::default()).unwrap();
        let summary = build_summary_rows(&report);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].date, "2025-05-16");
        assert_eq!(summary[0].orders, 2);
        assert_eq!(summary[0].sales, "R56.2K");
        assert_eq!(summary[0].mass, "1.2t");
    }

    #[test]
    fn test_build_category_rows_zero_filled() {
        let report = build_snapshot_report(&rows(), None, &EngineConfig::default()).unwrap();
        let categories = build_category_rows(&report.categories);
        assert_eq!(categories.len(), 7);
        assert_eq!(categories[0].name, "WB");
        assert_eq!(categories[1].name, "Deli WB");
        assert_eq!(categories[1].sales, "R0.00");
    }

    #[test]
    fn test_build_product_focus_rows() {
        let report = build_snapshot_report(&rows(), None, &EngineConfig::default()).unwrap();
        let products = build_product_focus_rows(&report.product_focus);
        assert_eq!(products[0].product, "Whole Bird");
        assert_eq!(products[0].mass, "1.2t");
        assert_eq!(products[1].mass, "40kg");
    }

    #[test]
    fn test_build_comparison_rows() {
        let report = build_comparison_report(
            &rows(),
            PeriodKind::Daily,
            None,
            &EngineConfig::default(),
        )
        .unwrap();
        let table = build_comparison_rows(&report);
        // 4 totals + 7 categories + 6 groups + 2 customers
        assert_eq!(table.len(), 19);
        assert_eq!(table[0].name, "Sales");
        assert_eq!(table[0].current, "R56.2K");
        assert_eq!(table[0].previous, "R45.0K");
        assert_eq!(table[0].change, "+24.9%");
        assert_eq!(table[3].current, "2");

        let mega = table.iter().find(|r| r.name == "Mega Save").unwrap();
        assert_eq!(mega.section, "Customer");
        assert_eq!(mega.change, "no comp");
    }

    #[test]
    fn test_build_filter_rows() {
        let options = FilterOptions {
            years: vec![2024, 2025],
            months: vec![5],
            groups: vec![],
            customers: vec!["Mega Save".to_string(), "Spar".to_string()],
            categories: vec![],
            reps: vec!["Uriel".to_string()],
        };
        let rows = build_filter_rows(&options);
        assert_eq!(rows[0].values, "2024, 2025");
        assert_eq!(rows[2].values, "");
        assert_eq!(rows[5].values, "Mega Save, Spar");
    }
}
