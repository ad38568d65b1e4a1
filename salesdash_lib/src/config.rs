//! Engine configuration.
//!
//! Every point where the historical report generators disagreed is a named
//! policy here, so one canonical classifier and comparator serve all reports.
//! The configuration is read from TOML; every field is optional.
//!
//! ```toml
//! unmatched_product_policy = "other"
//! spar_strictness = "strict"
//! zero_baseline_policy = "no_baseline"
//! on_empty_date = "fallback_to_latest"
//! top_n = 5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Default length of the top-N rankings.
pub const DEFAULT_TOP_N: usize = 5;

/// Label assigned to products no keyword rule recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmatchedProductPolicy {
    /// Unrecognised products are whole birds.
    #[default]
    Wb,
    /// Unrecognised products land in a separate `Other` category.
    Other,
}

/// How strictly a `SPAR` customer name qualifies for the `Spar D/Ship` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SparStrictness {
    /// `SPAR` anywhere in the name is enough.
    #[default]
    Lenient,
    /// `SPAR` must co-occur with `SUPER`, `DC` or `DISTRIBUTION`.
    Strict,
}

/// Result of a percentage change against a zero previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroBaselinePolicy {
    /// Report that no baseline exists.
    #[default]
    NoBaseline,
    /// Report a flat 100% move in the direction of the current value.
    Hundred,
}

/// What a report does when the requested date has no invoiced rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnEmptyDate {
    #[default]
    Fail,
    /// Re-anchor the report on the latest invoiced date in the ledger.
    FallbackToLatest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub unmatched_product_policy: UnmatchedProductPolicy,
    pub spar_strictness: SparStrictness,
    pub zero_baseline_policy: ZeroBaselinePolicy,
    pub on_empty_date: OnEmptyDate,
    pub top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            unmatched_product_policy: UnmatchedProductPolicy::default(),
            spar_strictness: SparStrictness::default(),
            zero_baseline_policy: ZeroBaselinePolicy::default(),
            on_empty_date: OnEmptyDate::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ReportError> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| ReportError::Config(e.to_string()))?;
        if config.top_n == 0 {
            return Err(ReportError::Config("top_n must be at least 1".to_string()));
        }
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), ?config, "loaded engine config");
        Ok(config)
    }
}
