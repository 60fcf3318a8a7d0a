//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - held in memory for the lifetime of the process
//! - printed as terminal tables or JSON
//! - exported to CSV

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::FiscalYear;

/// Canonical forecast type.
///
/// Raw labels containing "review" (any case) are `Review`; everything else,
/// including blanks, is `Main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ForecastType {
    Main,
    Review,
}

impl ForecastType {
    pub const ALL: [ForecastType; 2] = [ForecastType::Main, ForecastType::Review];

    pub fn from_raw(raw: &str) -> Self {
        if raw.to_ascii_lowercase().contains("review") {
            ForecastType::Review
        } else {
            ForecastType::Main
        }
    }

    /// Case-insensitive match against the canonical names.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|t| t.as_str().eq_ignore_ascii_case(raw))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ForecastType::Main => "Main",
            ForecastType::Review => "Review",
        }
    }
}

impl std::fmt::Display for ForecastType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the long table: product × period × method.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Trimmed, uppercased product identifier.
    pub product: String,
    pub period_date: Option<NaiveDate>,
    pub fiscal_year: Option<FiscalYear>,
    pub forecast_type: ForecastType,
    /// Name of the method column this forecast came from.
    pub method: String,
    pub actual: Option<f64>,
    pub forecast: Option<f64>,
    /// The source row's (cleaned, possibly recoded) adopted-method label.
    pub adopted_method: String,
    pub is_adopted: bool,
    pub is_ai: bool,
}

impl Observation {
    /// `(actual, forecast)` when both are present.
    pub fn pair(&self) -> Option<(f64, f64)> {
        Some((self.actual?, self.forecast?))
    }

    pub fn fy_label(&self) -> Option<String> {
        self.fiscal_year.map(FiscalYear::label)
    }
}

/// Forecast accuracy over a slice of observations.
///
/// Undefined measures are `NaN` (serialized as `null`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracyMetrics {
    pub bias: f64,
    pub rmse: f64,
    pub mape: f64,
    pub wape: f64,
    pub n: usize,
}

impl AccuracyMetrics {
    pub fn empty() -> Self {
        Self {
            bias: f64::NAN,
            rmse: f64::NAN,
            mape: f64::NAN,
            wape: f64::NAN,
            n: 0,
        }
    }
}

/// A single reported metrics row (summary, comparison or trend).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsRecord {
    pub product: String,
    pub fy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_type: Option<ForecastType>,
    pub method: String,
    pub bias: f64,
    pub rmse: f64,
    pub mape: f64,
    pub wape: f64,
    pub n: usize,
    pub is_adopted: bool,
    pub is_ai: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActualPoint {
    pub period: NaiveDate,
    pub forecast_type: ForecastType,
    pub actual: f64,
}

/// Actual consumption for one product-FY, ordered by period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActualSeries {
    pub product: String,
    pub fy: String,
    pub points: Vec<ActualPoint>,
}

impl ActualSeries {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.actual).collect()
    }
}

/// Names of the fixed identity columns of the wide input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityColumns {
    pub product: String,
    pub period: String,
    pub actual: String,
    pub forecast_type: String,
    pub adopted_method: String,
}

impl Default for IdentityColumns {
    fn default() -> Self {
        Self {
            product: "product_name".to_string(),
            period: "period".to_string(),
            actual: "Actual Consumption".to_string(),
            forecast_type: "Forecast Type".to_string(),
            adopted_method: "Adopted Method".to_string(),
        }
    }
}

impl IdentityColumns {
    pub fn names(&self) -> [&str; 5] {
        [
            &self.product,
            &self.period,
            &self.actual,
            &self.forecast_type,
            &self.adopted_method,
        ]
    }
}

/// How forecast-method columns are detected in the wide table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodColumns {
    /// Every column that is not an identity column and not ignored.
    Remaining { ignore: Vec<String> },
    /// Exactly these columns, in this order.
    Named(Vec<String>),
}

impl Default for MethodColumns {
    fn default() -> Self {
        MethodColumns::Remaining { ignore: Vec::new() }
    }
}

/// Rewrites an adopted-method label for financial years before a cutoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecodeRule {
    pub from: String,
    pub to: String,
    pub before_fy_start: i32,
}

impl RecodeRule {
    /// LMIS consumption was only recognised from FY2025 onwards.
    pub fn lmis_before_2025() -> Self {
        Self {
            from: "Consumption LMIS".to_string(),
            to: "Consumption".to_string(),
            before_fy_start: 2025,
        }
    }

    pub fn apply<'a>(&'a self, label: &'a str, fy: Option<FiscalYear>) -> &'a str {
        match fy {
            Some(fy) if fy.start_year() < self.before_fy_start && label == self.from => &self.to,
            _ => label,
        }
    }
}

/// Default keyword set marking AI/LMIS-era methods.
pub const DEFAULT_AI_KEYWORDS: [&str; 3] = ["ai", "ml", "lmis"];

/// Configuration of the single canonical ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    pub columns: IdentityColumns,
    pub method_columns: MethodColumns,
    /// Observations with an FY start year below this are not evaluable.
    pub min_fy_start: Option<i32>,
    pub recodes: Vec<RecodeRule>,
    pub ai_keywords: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            columns: IdentityColumns::default(),
            method_columns: MethodColumns::default(),
            min_fy_start: None,
            recodes: Vec::new(),
            ai_keywords: DEFAULT_AI_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_type_from_raw_label() {
        assert_eq!(ForecastType::from_raw("Review"), ForecastType::Review);
        assert_eq!(ForecastType::from_raw("Mid-year REVIEW forecast"), ForecastType::Review);
        assert_eq!(ForecastType::from_raw("Main"), ForecastType::Main);
        assert_eq!(ForecastType::from_raw(""), ForecastType::Main);
        assert_eq!(ForecastType::from_raw("Annual"), ForecastType::Main);
    }

    #[test]
    fn forecast_type_parse_is_case_insensitive() {
        assert_eq!(ForecastType::parse("review"), Some(ForecastType::Review));
        assert_eq!(ForecastType::parse(" MAIN "), Some(ForecastType::Main));
        assert_eq!(ForecastType::parse("annual"), None);
    }

    #[test]
    fn lmis_recode_only_applies_before_cutoff() {
        let rule = RecodeRule::lmis_before_2025();
        let fy24 = Some(FiscalYear::from_start_year(2024));
        let fy25 = Some(FiscalYear::from_start_year(2025));
        assert_eq!(rule.apply("Consumption LMIS", fy24), "Consumption");
        assert_eq!(rule.apply("Consumption LMIS", fy25), "Consumption LMIS");
        assert_eq!(rule.apply("Consumption LMIS", None), "Consumption LMIS");
        assert_eq!(rule.apply("Morbidity", fy24), "Morbidity");
    }

    #[test]
    fn observation_pair_requires_both_values() {
        let mut obs = Observation {
            product: "P".to_string(),
            period_date: None,
            fiscal_year: None,
            forecast_type: ForecastType::Main,
            method: "M".to_string(),
            actual: Some(1.0),
            forecast: Some(2.0),
            adopted_method: "M".to_string(),
            is_adopted: true,
            is_ai: false,
        };
        assert_eq!(obs.pair(), Some((1.0, 2.0)));
        obs.actual = None;
        assert_eq!(obs.pair(), None);
    }
}
