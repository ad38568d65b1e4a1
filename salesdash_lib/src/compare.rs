//! Percentage change between a current and a previous aggregate value.

use std::fmt;

use serde::Serialize;

use crate::config::ZeroBaselinePolicy;

/// Outcome of comparing two values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PercentChange {
    /// Signed percentage, rounded to one decimal place.
    Change(f64),
    /// The previous value was zero, so no percentage can be computed.
    NoBaseline,
}

impl PercentChange {
    pub fn value(self) -> Option<f64> {
        match self {
            PercentChange::Change(v) => Some(v),
            PercentChange::NoBaseline => None,
        }
    }
}

impl fmt::Display for PercentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PercentChange::Change(v) if *v > 0.0 => write!(f, "+{:.1}%", v),
            PercentChange::Change(v) if *v == 0.0 => f.write_str("0.0%"),
            PercentChange::Change(v) => write!(f, "{:.1}%", v),
            PercentChange::NoBaseline => f.write_str("no comp"),
        }
    }
}

/// Presentation rounding for money.
pub const MONEY_PLACES: i32 = 2;
/// Presentation rounding for mass.
pub const MASS_PLACES: i32 = 1;

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    // Normalise -0.0 so serialized output never shows a signed zero.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Percentage change from `previous` to `current`.
///
/// Both zero is no change. A zero previous value with a non-zero current one
/// follows `policy`: `NoBaseline`, or a flat 100% in the direction of the
/// current value. The divisor is the magnitude of `previous` so that a
/// negative baseline still reports improvement as a positive change.
pub fn percent_change(current: f64, previous: f64, policy: ZeroBaselinePolicy) -> PercentChange {
    if previous == 0.0 {
        if current == 0.0 {
            return PercentChange::Change(0.0);
        }
        return match policy {
            ZeroBaselinePolicy::NoBaseline => PercentChange::NoBaseline,
            ZeroBaselinePolicy::Hundred => PercentChange::Change(100.0 * current.signum()),
        };
    }
    PercentChange::Change(round_to((current - previous) / previous.abs() * 100.0, 1))
}

/// A value in the current period beside its previous-period counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub current: f64,
    pub previous: f64,
    pub change: PercentChange,
}

impl Comparison {
    /// Compare raw values; `places` is the presentation rounding for the
    /// values themselves, applied after the change has been computed.
    pub fn new(current: f64, previous: f64, places: i32, policy: ZeroBaselinePolicy) -> Self {
        Self {
            current: round_to(current, places),
            previous: round_to(previous, places),
            change: percent_change(current, previous, policy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_BASELINE: ZeroBaselinePolicy = ZeroBaselinePolicy::NoBaseline;

    #[test]
    fn test_increase() {
        assert_eq!(percent_change(110.0, 100.0, NO_BASELINE), PercentChange::Change(10.0));
    }

    #[test]
    fn test_decrease() {
        assert_eq!(percent_change(90.0, 100.0, NO_BASELINE), PercentChange::Change(-10.0));
    }

    #[test]
    fn test_rounded_to_one_decimal() {
        assert_eq!(percent_change(1.0, 3.0, NO_BASELINE), PercentChange::Change(-66.7));
    }

    #[test]
    fn test_both_zero() {
        assert_eq!(percent_change(0.0, 0.0, NO_BASELINE), PercentChange::Change(0.0));
        assert_eq!(
            percent_change(0.0, 0.0, ZeroBaselinePolicy::Hundred),
            PercentChange::Change(0.0)
        );
    }

    #[test]
    fn test_zero_baseline_no_baseline_policy() {
        assert_eq!(percent_change(50.0, 0.0, NO_BASELINE), PercentChange::NoBaseline);
        assert_eq!(percent_change(-50.0, 0.0, NO_BASELINE), PercentChange::NoBaseline);
    }

    #[test]
    fn test_zero_baseline_hundred_policy() {
        let policy = ZeroBaselinePolicy::Hundred;
        assert_eq!(percent_change(50.0, 0.0, policy), PercentChange::Change(100.0));
        assert_eq!(percent_change(7.0, 0.0, policy), PercentChange::Change(100.0));
        assert_eq!(percent_change(-5.0, 0.0, policy), PercentChange::Change(-100.0));
    }

    #[test]
    fn test_drop_to_zero() {
        assert_eq!(percent_change(0.0, 80.0, NO_BASELINE), PercentChange::Change(-100.0));
    }

    #[test]
    fn test_negative_baseline_uses_magnitude() {
        assert_eq!(percent_change(-50.0, -100.0, NO_BASELINE), PercentChange::Change(50.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(PercentChange::Change(12.34).to_string(), "+12.3%");
        assert_eq!(PercentChange::Change(-4.0).to_string(), "-4.0%");
        assert_eq!(PercentChange::Change(0.0).to_string(), "0.0%");
        assert_eq!(PercentChange::NoBaseline.to_string(), "no comp");
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(PercentChange::Change(10.0)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "change", "value": 10.0}));
        let json = serde_json::to_value(PercentChange::NoBaseline).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "no_baseline"}));
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1234.5678, 2), 1234.57);
        assert_eq!(round_to(1234.56, 1), 1234.6);
        assert_eq!(round_to(-0.04, 1), 0.0);
    }

    #[test]
    fn test_comparison_rounds_values_not_change() {
        let cmp = Comparison::new(110.004, 100.0, 2, NO_BASELINE);
        assert_eq!(cmp.current, 110.0);
        assert_eq!(cmp.previous, 100.0);
        assert_eq!(cmp.change, PercentChange::Change(10.0));
    }
}
