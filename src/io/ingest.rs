//! Ingestion: wide raw table to normalized long table.
//!
//! This module is responsible for turning a wide export (one column per
//! forecast method) into one `Observation` per row × method column.
//!
//! Design goals:
//! - **Strict schema**: missing identity columns or zero method columns abort
//!   ingestion (exit code 2) rather than serving partial data
//! - **Row-level tolerance**: unparseable periods and numbers become `None`
//!   and drop out of the evaluable set; they never fail the load
//! - **One pipeline**: every dataset variant goes through the same code,
//!   parameterized by `IngestConfig`

use serde::Serialize;

use crate::domain::{FiscalYear, ForecastType, IngestConfig, MethodColumns, Observation};
use crate::error::AppError;
use crate::io::table::{Cell, RawTable};
use crate::parse::{cell_number, parse_period};

/// Counts describing a completed ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub rows_read: usize,
    pub skipped_records: usize,
    pub method_columns: Vec<String>,
    /// Long-table rows produced (rows × method columns).
    pub observations: usize,
    /// Rows with product, method and a numeric forecast.
    pub catalog: usize,
    /// Catalog rows that also have an actual and an eligible FY.
    pub evaluable: usize,
    /// Source rows whose non-blank period could not be resolved.
    pub unparseable_periods: usize,
}

/// The immutable ingestion result queried for the process lifetime.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Vec<Observation>,
    min_fy_start: Option<i32>,
    summary: IngestSummary,
}

impl Dataset {
    /// Run the full ingestion pipeline over a raw table.
    pub fn from_table(table: &RawTable, config: &IngestConfig) -> Result<Self, AppError> {
        let columns = resolve_columns(table, config)?;
        let unparseable_periods = table
            .rows()
            .iter()
            .filter(|row| {
                let cell = &row[columns.period];
                *cell != Cell::Empty && parse_period(cell).is_none()
            })
            .count();

        let long = reshape_resolved(table, config, &columns);
        let observations_len = long.len();

        let mut dataset = Self::from_observations(long, config.min_fy_start);
        dataset.summary.rows_read = table.len();
        dataset.summary.skipped_records = table.skipped_records;
        dataset.summary.method_columns = columns.methods.iter().map(|(name, _)| name.clone()).collect();
        dataset.summary.observations = observations_len;
        dataset.summary.unparseable_periods = unparseable_periods;

        if unparseable_periods > 0 {
            tracing::warn!(unparseable_periods, "some periods could not be resolved; those rows are not evaluable");
        }
        tracing::info!(
            rows = dataset.summary.rows_read,
            methods = dataset.summary.method_columns.len(),
            observations = dataset.summary.observations,
            catalog = dataset.summary.catalog,
            evaluable = dataset.summary.evaluable,
            "dataset ingested"
        );

        Ok(dataset)
    }

    /// Build a dataset from already-normalized observations.
    ///
    /// Rows without product, method or numeric forecast are dropped here.
    pub fn from_observations(observations: Vec<Observation>, min_fy_start: Option<i32>) -> Self {
        let observations: Vec<Observation> = observations
            .into_iter()
            .filter(|o| !o.product.is_empty() && !o.method.is_empty() && o.forecast.is_some())
            .collect();

        let mut dataset = Self {
            observations,
            min_fy_start,
            summary: IngestSummary::default(),
        };
        dataset.summary.catalog = dataset.observations.len();
        dataset.summary.evaluable = dataset.evaluable().count();
        dataset
    }

    /// Every catalog row (the lax view used by list operations).
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Rows usable for metrics: actual present and FY eligible.
    pub fn evaluable(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter().filter(|o| self.is_evaluable(o))
    }

    pub fn is_evaluable(&self, obs: &Observation) -> bool {
        obs.pair().is_some() && self.is_eligible_fy(obs.fiscal_year)
    }

    /// FY present and not before the configured cutoff.
    pub fn is_eligible_fy(&self, fy: Option<FiscalYear>) -> bool {
        match (fy, self.min_fy_start) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(fy), Some(min)) => fy.start_year() >= min,
        }
    }

    pub fn min_fy_start(&self) -> Option<i32> {
        self.min_fy_start
    }

    pub fn summary(&self) -> &IngestSummary {
        &self.summary
    }
}

/// Reshape a wide table into the long table, one row per row × method column.
///
/// No filtering happens here: the output length is always
/// `table.len() * method_columns`.
pub fn reshape(table: &RawTable, config: &IngestConfig) -> Result<Vec<Observation>, AppError> {
    let columns = resolve_columns(table, config)?;
    Ok(reshape_resolved(table, config, &columns))
}

/// Column indices resolved against a concrete table.
#[derive(Debug, Clone)]
struct ResolvedColumns {
    product: usize,
    period: usize,
    actual: usize,
    forecast_type: usize,
    adopted_method: usize,
    methods: Vec<(String, usize)>,
}

fn resolve_columns(table: &RawTable, config: &IngestConfig) -> Result<ResolvedColumns, AppError> {
    let required = |name: &str| {
        table
            .column_index(name)
            .ok_or_else(|| AppError::input(format!("Missing required column: `{name}`")))
    };

    let ids = &config.columns;
    let product = required(&ids.product)?;
    let period = required(&ids.period)?;
    let actual = required(&ids.actual)?;
    let forecast_type = required(&ids.forecast_type)?;
    let adopted_method = required(&ids.adopted_method)?;
    let identity = [product, period, actual, forecast_type, adopted_method];

    let methods: Vec<(String, usize)> = match &config.method_columns {
        MethodColumns::Named(names) => names
            .iter()
            .map(|name| {
                let idx = table
                    .column_index(name)
                    .ok_or_else(|| AppError::input(format!("Missing method column: `{name}`")))?;
                Ok((table.columns()[idx].clone(), idx))
            })
            .collect::<Result<_, AppError>>()?,
        MethodColumns::Remaining { ignore } => table
            .columns()
            .iter()
            .enumerate()
            .filter(|(idx, name)| {
                !identity.contains(idx)
                    && !name.is_empty()
                    && !ignore.iter().any(|i| i.trim().eq_ignore_ascii_case(name))
            })
            .map(|(idx, name)| (name.clone(), idx))
            .collect(),
    };

    if methods.is_empty() {
        return Err(AppError::input(
            "No forecast method columns found: the table has only identity columns.",
        ));
    }

    Ok(ResolvedColumns {
        product,
        period,
        actual,
        forecast_type,
        adopted_method,
        methods,
    })
}

fn reshape_resolved(table: &RawTable, config: &IngestConfig, columns: &ResolvedColumns) -> Vec<Observation> {
    let mut out = Vec::with_capacity(table.len() * columns.methods.len());

    for row in table.rows() {
        let product = row[columns.product].as_text().to_uppercase();
        let period_date = parse_period(&row[columns.period]);
        let fiscal_year = period_date.map(FiscalYear::from_date);
        let actual = cell_number(&row[columns.actual]);
        let forecast_type = ForecastType::from_raw(&row[columns.forecast_type].as_text());

        let raw_label = row[columns.adopted_method].as_text();
        let adopted_method = config
            .recodes
            .iter()
            .fold(raw_label.as_str(), |label, rule| rule.apply(label, fiscal_year))
            .to_string();

        for (method, idx) in &columns.methods {
            out.push(Observation {
                product: product.clone(),
                period_date,
                fiscal_year,
                forecast_type,
                method: method.clone(),
                actual,
                forecast: cell_number(&row[*idx]),
                is_adopted: !adopted_method.is_empty() && *method == adopted_method,
                is_ai: is_ai_method(method, &config.ai_keywords),
                adopted_method: adopted_method.clone(),
            });
        }
    }

    out
}

/// Whether a method name marks an AI/LMIS-era method.
///
/// Single-word keywords must match a whole alphanumeric token of the name
/// (so "ai" does not flag "Naive"); keywords containing other characters
/// are matched as substrings. Both sides are compared case-insensitively.
pub fn is_ai_method(method: &str, keywords: &[String]) -> bool {
    let lower = method.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    keywords.iter().any(|kw| {
        let kw = kw.trim().to_lowercase();
        if kw.is_empty() {
            return false;
        }
        if kw.chars().all(char::is_alphanumeric) {
            tokens.contains(&kw.as_str())
        } else {
            lower.contains(&kw)
        }
    })
}
