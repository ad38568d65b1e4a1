use chrono::NaiveDate;

use crate::classify::Category;
use crate::config::UnmatchedProductPolicy;
use crate::error::ReportError;
use crate::period::PeriodKind;
use crate::rep_mapping::{find_rep, RepCustomers};

pub const MAX_SEARCH_LENGTH: usize = 100;

/// Date layouts accepted from spreadsheet exports and command-line flags.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, ReportError> {
    if input.len() > max_len {
        return Err(ReportError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(ReportError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a customer search string: enforce length, strip control chars, trim.
pub fn validate_search(input: &str) -> Result<String, ReportError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Parse a calendar date. A trailing time part (`2025-05-17 08:30:00` or
/// `2025-05-17T08:30:00`) is dropped.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    let day_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day_part, fmt).ok())
}

/// Parse a user-supplied date, reporting the offending value on failure.
pub fn validate_date(input: &str) -> Result<NaiveDate, ReportError> {
    parse_date(input).ok_or_else(|| {
        ReportError::InvalidInput(format!(
            "invalid date '{}' (expected YYYY-MM-DD)",
            input.trim()
        ))
    })
}

pub fn validate_period(input: &str) -> Result<PeriodKind, ReportError> {
    input.parse()
}

pub fn validate_year(year: i32) -> Result<i32, ReportError> {
    if !(2000..=2100).contains(&year) {
        return Err(ReportError::InvalidInput(format!(
            "year {} is out of range (2000-2100)",
            year
        )));
    }
    Ok(year)
}

pub fn validate_month(month: u32) -> Result<u32, ReportError> {
    if !(1..=12).contains(&month) {
        return Err(ReportError::InvalidInput(format!(
            "month {} is out of range (1-12)",
            month
        )));
    }
    Ok(month)
}

/// Resolve a rep name against the mapping, returning its canonical spelling.
pub fn validate_rep(input: &str, mappings: &[RepCustomers]) -> Result<String, ReportError> {
    let name = sanitize_text(input, MAX_SEARCH_LENGTH)?;
    match find_rep(mappings, &name) {
        Some(found) => Ok(found.rep.clone()),
        None => {
            let known: Vec<&str> = mappings.iter().map(|m| m.rep.as_str()).collect();
            Err(ReportError::InvalidInput(format!(
                "unknown rep '{}'. Valid reps: {}",
                name,
                known.join(", ")
            )))
        }
    }
}

/// Resolve a category label against the categories `policy` can produce.
pub fn validate_category(
    input: &str,
    policy: UnmatchedProductPolicy,
) -> Result<Category, ReportError> {
    let reported = Category::reported(policy);
    Category::from_label(input)
        .filter(|c| reported.contains(c))
        .ok_or_else(|| {
            let valid: Vec<&str> = reported.iter().map(|c| c.label()).collect();
            ReportError::InvalidInput(format!(
                "unknown category '{}'. Valid categories: {}",
                input.trim(),
                valid.join(", ")
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rep_mapping::load_rep_mappings;

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_text("  Spar\u{7}  ", 100).unwrap(), "Spar");
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(matches!(sanitize_text(" \t ", 100), Err(ReportError::InvalidInput(_))));
    }

    #[test]
    fn test_sanitize_rejects_too_long() {
        let long = "x".repeat(MAX_SEARCH_LENGTH + 1);
        assert!(validate_search(&long).is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 5, 17);
        assert_eq!(parse_date("2025-05-17"), expected);
        assert_eq!(parse_date("2025/05/17"), expected);
        assert_eq!(parse_date("17/05/2025"), expected);
        assert_eq!(parse_date("2025-05-17 00:00:00"), expected);
        assert_eq!(parse_date("2025-05-17T08:30:00"), expected);
    }

    #[test]
    fn test_parse_date_invalid() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2025-02-30"), None);
        assert!(validate_date("").is_err());
    }

    #[test]
    fn test_validate_period() {
        assert_eq!(validate_period("weekly").unwrap(), PeriodKind::Weekly);
        assert!(matches!(
            validate_period("hourly"),
            Err(ReportError::InvalidPeriodKind(_))
        ));
    }

    #[test]
    fn test_validate_year_and_month() {
        assert!(validate_year(2025).is_ok());
        assert!(validate_year(1999).is_err());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_validate_rep() {
        let mappings = load_rep_mappings().unwrap();
        assert_eq!(validate_rep("lyle", &mappings).unwrap(), "Lyle");
        let err = validate_rep("Bob", &mappings).unwrap_err();
        assert!(err.to_string().contains("Valid reps: Uriel, Lyle, Calvyn"));
    }

    #[test]
    fn test_validate_category() {
        assert_eq!(
            validate_category("fillets", UnmatchedProductPolicy::Wb).unwrap(),
            Category::Fillets
        );
        assert!(validate_category("Beef", UnmatchedProductPolicy::Wb).is_err());
    }

    #[test]
    fn test_validate_category_other_follows_policy() {
        match validate_category("Other", UnmatchedProductPolicy::Wb) {
            Err(ReportError::InvalidInput(msg)) => {
                assert!(msg.ends_with("Valid categories: WB, Deli WB, Fillets, Portion, V/Add, V/Add Frozen, Offal Fresh"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(
            validate_category("other", UnmatchedProductPolicy::Other).unwrap(),
            Category::Other
        );
    }
}
