//! Ledger ingestion from spreadsheet CSV exports and JSON record uploads.
//!
//! Loading is fail-fast: the first unusable row aborts the load with a
//! [`ReportError::MalformedRow`] naming its 1-based data row index.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::error::ReportError;
use crate::row::{derive_price_per_kg, SaleRow};
use crate::validation::parse_date;

/// One spreadsheet row as exported. Every column is optional at this stage so
/// a missing cell can be reported against its row instead of failing the
/// whole file. Unknown columns (for example a precomputed `Category`) are
/// ignored.
#[derive(Debug, Deserialize)]
struct SpreadsheetRecord {
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Transaction Type", default)]
    transaction_type: Option<String>,
    #[serde(rename = "Customer", default)]
    customer: Option<String>,
    #[serde(rename = "Product", default)]
    product: Option<String>,
    #[serde(rename = "Mass", default)]
    mass: Option<String>,
    #[serde(rename = "Sales Value", default)]
    sales_value: Option<String>,
    #[serde(rename = "Price per Kg", default)]
    price_per_kg: Option<String>,
}

/// One structured upload record.
#[derive(Debug, Deserialize)]
struct UploadRecord {
    date: String,
    transaction_type: String,
    customer: String,
    product: String,
    mass: f64,
    sales_value: f64,
    #[serde(default)]
    price_per_kg: Option<f64>,
}

fn required<'a>(value: &'a Option<String>, column: &str, row: usize) -> Result<&'a str, ReportError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ReportError::malformed(row, format!("missing {}", column))),
    }
}

/// Removes thousands separators from the integer part. A `,` or space is
/// only a separator between groups of exactly three digits after a leading
/// group of one to three; anything else (a decimal comma, mixed separators)
/// yields `None`.
fn strip_grouping(raw: &str) -> Option<String> {
    let (sign, body) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.strip_prefix('+').unwrap_or(raw)),
    };
    let (int_part, frac_part) = match body.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (body, None),
    };
    if frac_part.is_some_and(|f| f.contains([',', ' '])) {
        return None;
    }

    let has_comma = int_part.contains(',');
    let has_space = int_part.contains(' ');
    let digits = match (has_comma, has_space) {
        (false, false) => int_part.to_string(),
        (true, true) => return None,
        _ => {
            let sep = if has_comma { ',' } else { ' ' };
            let mut groups = int_part.split(sep);
            let lead = groups.next().unwrap_or_default();
            let is_digits = |g: &str| g.chars().all(|c| c.is_ascii_digit());
            if lead.is_empty() || lead.len() > 3 || !is_digits(lead) {
                return None;
            }
            let mut joined = lead.to_string();
            for group in groups {
                if group.len() != 3 || !is_digits(group) {
                    return None;
                }
                joined.push_str(group);
            }
            joined
        }
    };

    Some(match frac_part {
        Some(frac) => format!("{}{}.{}", sign, digits, frac),
        None => format!("{}{}", sign, digits),
    })
}

fn parse_number(raw: &str, column: &str, row: usize) -> Result<f64, ReportError> {
    strip_grouping(raw.trim())
        .and_then(|cleaned| cleaned.parse::<f64>().ok())
        .ok_or_else(|| ReportError::malformed(row, format!("{} '{}' is not a number", column, raw)))
}

/// Builds a validated row. Mass must be a finite non-negative number and the
/// sales value finite.
fn build_row(
    row: usize,
    date_raw: &str,
    transaction_type: &str,
    customer: &str,
    product: &str,
    mass: f64,
    sales_value: f64,
    price_per_kg: Option<f64>,
) -> Result<SaleRow, ReportError> {
    let date = parse_date(date_raw)
        .ok_or_else(|| ReportError::malformed(row, format!("invalid date '{}'", date_raw)))?;
    let transaction_type = transaction_type.trim();
    let customer = customer.trim();
    let product = product.trim();
    if transaction_type.is_empty() {
        return Err(ReportError::malformed(row, "missing Transaction Type"));
    }
    if customer.is_empty() {
        return Err(ReportError::malformed(row, "missing Customer"));
    }
    if product.is_empty() {
        return Err(ReportError::malformed(row, "missing Product"));
    }
    if !mass.is_finite() || mass < 0.0 {
        return Err(ReportError::malformed(
            row,
            format!("mass {} must be a non-negative number", mass),
        ));
    }
    if !sales_value.is_finite() {
        return Err(ReportError::malformed(row, "sales value is not finite"));
    }
    let price = match price_per_kg {
        Some(p) if p.is_finite() => p,
        Some(_) => return Err(ReportError::malformed(row, "price per kg is not finite")),
        None => derive_price_per_kg(sales_value, mass),
    };

    Ok(SaleRow::new(date, transaction_type, customer, product, mass, sales_value)
        .with_price_per_kg(price))
}

fn from_spreadsheet(record: &SpreadsheetRecord, row: usize) -> Result<SaleRow, ReportError> {
    let date = required(&record.date, "Date", row)?;
    let transaction_type = required(&record.transaction_type, "Transaction Type", row)?;
    let customer = required(&record.customer, "Customer", row)?;
    let product = required(&record.product, "Product", row)?;
    let mass = parse_number(required(&record.mass, "Mass", row)?, "Mass", row)?;
    let sales_value = parse_number(
        required(&record.sales_value, "Sales Value", row)?,
        "Sales Value",
        row,
    )?;
    let price_per_kg = match record.price_per_kg.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(parse_number(raw, "Price per Kg", row)?),
        _ => None,
    };

    build_row(
        row,
        date,
        transaction_type,
        customer,
        product,
        mass,
        sales_value,
        price_per_kg,
    )
}

/// Read rows from a CSV export with the header
/// `Date,Transaction Type,Customer,Product,Mass,Sales Value,Price per Kg`.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<SaleRow>, ReportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, result) in csv_reader.deserialize::<SpreadsheetRecord>().enumerate() {
        let row = index + 1;
        let record = result.map_err(|e| ReportError::malformed(row, e.to_string()))?;
        rows.push(from_spreadsheet(&record, row)?);
    }

    tracing::debug!(rows = rows.len(), "read ledger rows from CSV");
    Ok(rows)
}

/// Read rows from a JSON array of upload records.
pub fn read_json(content: &str) -> Result<Vec<SaleRow>, ReportError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(content)?;

    let mut rows = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        let row = index + 1;
        let record: UploadRecord =
            serde_json::from_value(value).map_err(|e| ReportError::malformed(row, e.to_string()))?;
        rows.push(build_row(
            row,
            &record.date,
            &record.transaction_type,
            &record.customer,
            &record.product,
            record.mass,
            record.sales_value,
            record.price_per_kg,
        )?);
    }

    tracing::debug!(rows = rows.len(), "read ledger rows from JSON");
    Ok(rows)
}

/// Load a ledger file, choosing the reader by extension (`.json` for upload
/// records, anything else as CSV).
pub fn load_file(path: &Path) -> Result<Vec<SaleRow>, ReportError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        let content = std::fs::read_to_string(path)?;
        read_json(&content)
    } else {
        let file = std::fs::File::open(path)?;
        read_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const HEADER: &str = "Date,Transaction Type,Customer,Product,Mass,Sales Value,Price per Kg\n";

    fn csv(body: &str) -> String {
        format!("{}{}", HEADER, body)
    }

    #[test]
    fn test_read_csv_basic() {
        let data = csv(
            "2025-05-17,INV,Spar Chatsworth,Whole Bird,12.5,562.50,45\n\
             2025-05-17,CRN,Spar Chatsworth,Whole Bird,1,-45,\n",
        );
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 5, 17).unwrap());
        assert_eq!(rows[0].customer, "Spar Chatsworth");
        assert_eq!(rows[0].mass, 12.5);
        assert_eq!(rows[0].price_per_kg, 45.0);
        assert_eq!(rows[1].transaction_type, "CRN");
        // Empty price cell is derived.
        assert_eq!(rows[1].price_per_kg, -45.0);
    }

    #[test]
    fn test_read_csv_ignores_extra_columns() {
        let data = "Date,Transaction Type,Customer,Product,Mass,Sales Value,Price per Kg,Category\n\
                    2025-05-17,INV,Mega,Wings,2,90,45,Portion\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_read_csv_missing_price_column_derives() {
        let data = "Date,Transaction Type,Customer,Product,Mass,Sales Value\n\
                    2025-05-17,INV,Mega,Wings,2,90\n";
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0].price_per_kg, 45.0);
    }

    #[test]
    fn test_read_csv_thousands_separator() {
        let data = csv("2025-05-17,INV,Mega,Wings,\"1,200\",\"54,000.00\",\n");
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0].mass, 1200.0);
        assert_eq!(rows[0].sales_value, 54000.0);

        let data = csv("2025-05-17,INV,Mega,Wings,\"1 200\",\"-1,054,000.50\",\n");
        let rows = read_csv(data.as_bytes()).unwrap();
        assert_eq!(rows[0].mass, 1200.0);
        assert_eq!(rows[0].sales_value, -1054000.5);
    }

    #[test]
    fn test_decimal_comma_rejected_with_row_index() {
        let data = csv(
            "2025-05-17,INV,Mega,Wings,2,90,45\n\
             2025-05-17,INV,Spar,Wings,\"12,5\",\"1 200,50\",\n",
        );
        match read_csv(data.as_bytes()).unwrap_err() {
            ReportError::MalformedRow { row, reason } => {
                assert_eq!(row, 2);
                assert!(reason.contains("'12,5'"), "reason was {reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_strip_grouping() {
        assert_eq!(strip_grouping("54,000.00").as_deref(), Some("54000.00"));
        assert_eq!(strip_grouping("450").as_deref(), Some("450"));
        assert_eq!(strip_grouping("12,5"), None);
        assert_eq!(strip_grouping("1 200,50"), None);
        assert_eq!(strip_grouping("1234,567"), None);
        assert_eq!(strip_grouping(",200"), None);
        assert_eq!(strip_grouping("1.200,50"), None);
    }

    #[test]
    fn test_non_numeric_mass_fails_with_row_index() {
        let data = csv(
            "2025-05-17,INV,Mega,Wings,2,90,45\n\
             2025-05-17,INV,Mega,Wings,lots,90,45\n",
        );
        let err = read_csv(data.as_bytes()).unwrap_err();
        match err {
            ReportError::MalformedRow { row, reason } => {
                assert_eq!(row, 2);
                assert!(reason.contains("Mass"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_mass_rejected() {
        let data = csv("2025-05-17,INV,Mega,Wings,-2,90,45\n");
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, ReportError::MalformedRow { row: 1, .. }));
    }

    #[test]
    fn test_missing_customer_rejected() {
        let data = csv("2025-05-17,INV,,Wings,2,90,45\n");
        let err = read_csv(data.as_bytes()).unwrap_err();
        match err {
            ReportError::MalformedRow { reason, .. } => assert_eq!(reason, "missing Customer"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date_rejected() {
        let data = csv("someday,INV,Mega,Wings,2,90,45\n");
        assert!(matches!(
            read_csv(data.as_bytes()),
            Err(ReportError::MalformedRow { row: 1, .. })
        ));
    }

    #[test]
    fn test_read_json_records() {
        let json = r#"[
            {"date": "2025-05-17", "transaction_type": "INV", "customer": "Mega",
             "product": "Wings", "mass": 2.0, "sales_value": 90.0, "price_per_kg": 45.0,
             "category": "Portion", "customer_group": "Mega"},
            {"date": "2025-05-18T00:00:00", "transaction_type": "INV", "customer": "Spar",
             "product": "Livers", "mass": 0.0, "sales_value": 10.0}
        ]"#;
        let rows = read_json(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2025, 5, 18).unwrap());
        assert_eq!(rows[1].price_per_kg, 0.0);
    }

    #[test]
    fn test_read_json_type_error_has_row_index() {
        let json = r#"[
            {"date": "2025-05-17", "transaction_type": "INV", "customer": "Mega",
             "product": "Wings", "mass": 2.0, "sales_value": 90.0},
            {"date": "2025-05-17", "transaction_type": "INV", "customer": "Mega",
             "product": "Wings", "mass": "heavy", "sales_value": 90.0}
        ]"#;
        assert!(matches!(
            read_json(json),
            Err(ReportError::MalformedRow { row: 2, .. })
        ));
    }

    #[test]
    fn test_read_json_not_an_array() {
        assert!(matches!(read_json("{}"), Err(ReportError::Json(_))));
    }
}
