//! Distinct values available for dashboard filters.

use std::collections::BTreeSet;

use chrono::Datelike;
use serde::Serialize;

use crate::classify::{classify_customer_group, classify_product, Category, CustomerGroup};
use crate::config::EngineConfig;
use crate::rep_mapping::RepCustomers;
use crate::row::{invoices, SaleRow};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub months: Vec<u32>,
    /// Customer groups present, in canonical order.
    pub groups: Vec<CustomerGroup>,
    pub customers: Vec<String>,
    /// Categories present, in canonical order.
    pub categories: Vec<Category>,
    pub reps: Vec<String>,
}

/// Collect filter values from the invoiced rows. Reps come from the mapping,
/// whether or not any of their customers has sales.
pub fn list_filter_options(
    rows: &[SaleRow],
    reps: &[RepCustomers],
    config: &EngineConfig,
) -> FilterOptions {
    let mut years = BTreeSet::new();
    let mut months = BTreeSet::new();
    let mut groups = BTreeSet::new();
    let mut customers = BTreeSet::new();
    let mut categories = BTreeSet::new();

    for row in invoices(rows) {
        years.insert(row.date.year());
        months.insert(row.date.month());
        groups.insert(classify_customer_group(&row.customer, config.spar_strictness));
        customers.insert(row.customer.clone());
        categories.insert(classify_product(&row.product, config.unmatched_product_policy));
    }

    // Enum ordering follows declaration order, which is the canonical order.
    FilterOptions {
        years: years.into_iter().collect(),
        months: months.into_iter().collect(),
        groups: groups.into_iter().collect(),
        customers: customers.into_iter().collect(),
        categories: categories.into_iter().collect(),
        reps: reps.iter().map(|r| r.rep.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rep_mapping::load_rep_mappings;
    use chrono::NaiveDate;

    fn row(y: i32, m: u32, tt: &str, customer: &str, product: &str) -> SaleRow {
        SaleRow::new(
            NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            tt,
            customer,
            product,
            1.0,
            10.0,
        )
    }

    #[test]
    fn test_filter_options_sorted_and_distinct() {
        let rows = vec![
            row(2025, 5, "INV", "Spar Chatsworth", "Chicken Livers"),
            row(2024, 11, "INV", "Mega Save", "Whole Bird"),
            row(2025, 5, "INV", "Dermott Distribution", "Whole Bird"),
            row(2023, 2, "CRN", "Zulu Foods", "Frozen Wings"),
        ];
        let reps = load_rep_mappings().unwrap();
        let options = list_filter_options(&rows, &reps, &EngineConfig::default());

        assert_eq!(options.years, vec![2024, 2025]);
        assert_eq!(options.months, vec![5, 11]);
        assert_eq!(
            options.groups,
            vec![CustomerGroup::SparDropShip, CustomerGroup::Mega, CustomerGroup::Dermott]
        );
        assert_eq!(
            options.customers,
            vec!["Dermott Distribution", "Mega Save", "Spar Chatsworth"]
        );
        assert_eq!(options.categories, vec![Category::Wb, Category::OffalFresh]);
        assert_eq!(options.reps, vec!["Uriel", "Lyle", "Calvyn"]);
    }

    #[test]
    fn test_filter_options_empty_ledger() {
        let options = list_filter_options(&[], &[], &EngineConfig::default());
        assert!(options.years.is_empty());
        assert!(options.customers.is_empty());
        assert!(options.reps.is_empty());
    }

    #[test]
    fn test_filter_options_serialize_labels() {
        let rows = vec![row(2025, 5, "INV", "T&P Chats", "Deli Whole Bird")];
        let options = list_filter_options(&rows, &[], &EngineConfig::default());
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["groups"], serde_json::json!(["T&Pay"]));
        assert_eq!(json["categories"], serde_json::json!(["Deli WB"]));
    }
}
