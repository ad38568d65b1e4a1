//! Period selection: current and immediately preceding date ranges.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::ReportError;
use crate::row::SaleRow;

/// Kind of period-over-period comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Daily,
    Weekly,
    Monthly,
}

impl PeriodKind {
    /// Human-readable name of the comparison.
    pub fn comparison_name(self) -> &'static str {
        match self {
            PeriodKind::Daily => "Today vs Yesterday",
            PeriodKind::Weekly => "This Week vs Last Week",
            PeriodKind::Monthly => "This Month vs Last Month",
        }
    }
}

impl FromStr for PeriodKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "day" => Ok(PeriodKind::Daily),
            "weekly" | "week" => Ok(PeriodKind::Weekly),
            "monthly" | "month" => Ok(PeriodKind::Monthly),
            _ => Err(ReportError::InvalidPeriodKind(s.to_string())),
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PeriodKind::Daily => "daily",
            PeriodKind::Weekly => "weekly",
            PeriodKind::Monthly => "monthly",
        };
        f.write_str(name)
    }
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Invoiced rows dated inside the range, in ledger order.
    pub fn invoices<'a>(&self, rows: &'a [SaleRow]) -> Vec<&'a SaleRow> {
        rows.iter()
            .filter(|r| r.is_invoice() && self.contains(r.date))
            .collect()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{} to {}", self.start, self.end)
        }
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Last day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    next_month_start(date).pred_opt().unwrap_or(date)
}

fn next_month_start(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// First day of the calendar month before the one containing `date`.
pub fn previous_month_start(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Compute the current range for `kind` around `reference` and the range
/// immediately before it.
///
/// * daily: the reference day against the day before.
/// * weekly: the full Monday-Sunday week containing the reference day against
///   the seven days before that Monday.
/// * monthly: the first of the month through the reference day against the
///   same number of days from the first of the previous month, clamped to that
///   month's last day so the ranges never overlap.
pub fn select_period(reference: NaiveDate, kind: PeriodKind) -> (DateRange, DateRange) {
    match kind {
        PeriodKind::Daily => {
            let previous = reference - Duration::days(1);
            (DateRange::single(reference), DateRange::single(previous))
        }
        PeriodKind::Weekly => {
            let monday = week_start(reference);
            let current = DateRange::new(monday, monday + Duration::days(6));
            let previous = DateRange::new(monday - Duration::days(7), monday - Duration::days(1));
            (current, previous)
        }
        PeriodKind::Monthly => {
            let current = DateRange::new(month_start(reference), reference);
            let prev_start = previous_month_start(reference);
            let span = Duration::days(reference.day() as i64 - 1);
            let prev_end = (prev_start + span).min(month_end(prev_start));
            (current, DateRange::new(prev_start, prev_end))
        }
    }
}
