//! Row model: one line of the sales ledger.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Transaction type tag of a genuine invoiced sale. Only these rows count
/// toward any report.
pub const INVOICE: &str = "INV";

/// One ledger entry.
///
/// `mass` is kilograms and never negative once a row has passed ingestion.
/// `sales_value` is signed; reversals simply reduce the sums they land in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRow {
    pub date: NaiveDate,
    pub transaction_type: String,
    pub customer: String,
    pub product: String,
    pub mass: f64,
    pub sales_value: f64,
    pub price_per_kg: f64,
}

impl SaleRow {
    /// Builds a row with a derived `price_per_kg`.
    pub fn new(
        date: NaiveDate,
        transaction_type: impl Into<String>,
        customer: impl Into<String>,
        product: impl Into<String>,
        mass: f64,
        sales_value: f64,
    ) -> Self {
        Self {
            date,
            transaction_type: transaction_type.into(),
            customer: customer.into(),
            product: product.into(),
            mass,
            sales_value,
            price_per_kg: derive_price_per_kg(sales_value, mass),
        }
    }

    /// Replaces the derived price with one supplied by the source.
    pub fn with_price_per_kg(mut self, price_per_kg: f64) -> Self {
        self.price_per_kg = price_per_kg;
        self
    }

    pub fn is_invoice(&self) -> bool {
        self.transaction_type.trim() == INVOICE
    }
}

/// `sales_value / mass`, or 0 when there is no mass to divide by.
pub fn derive_price_per_kg(sales_value: f64, mass: f64) -> f64 {
    if mass == 0.0 {
        0.0
    } else {
        sales_value / mass
    }
}

/// Invoiced rows only, in ledger order.
pub fn invoices(rows: &[SaleRow]) -> impl Iterator<Item = &SaleRow> {
    rows.iter().filter(|r| r.is_invoice())
}

/// Latest date carried by an invoiced row.
pub fn latest_invoice_date(rows: &[SaleRow]) -> Option<NaiveDate> {
    invoices(rows).map(|r| r.date).max()
}
