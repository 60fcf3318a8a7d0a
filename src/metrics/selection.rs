//! Slice selection and adopted-method resolution.
//!
//! Selection narrows by exact (case-sensitive) product and exact FY label;
//! the forecast type matches case-insensitively. Each way a slice can come
//! up empty is reported as its own `QueryError` variant.
//!
//! The adopted method for a product-FY is the most frequent adopted-method
//! label among source rows with a usable actual/forecast pair, ties going to
//! the label seen first.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::domain::{FiscalYear, ForecastType, MetricsRecord, Observation};
use crate::error::QueryError;
use crate::io::ingest::Dataset;
use crate::metrics::engine::compute_metrics;

/// Shown when no row of a slice carries an adopted-method label.
pub const UNLABELLED_METHOD: &str = "<unlabelled>";

/// Rows of `product` in `fy` (optionally of one forecast type) with a usable pair.
pub fn select_slice<'d>(
    dataset: &'d Dataset,
    product: &str,
    fy: &str,
    forecast_type: Option<&str>,
) -> Result<Vec<&'d Observation>, QueryError> {
    let product_rows: Vec<&Observation> = dataset
        .observations()
        .iter()
        .filter(|o| o.product == product)
        .collect();
    if product_rows.is_empty() {
        return Err(QueryError::UnknownProduct {
            product: product.to_string(),
        });
    }

    let mut rows: Vec<&Observation> = product_rows
        .into_iter()
        .filter(|o| dataset.is_eligible_fy(o.fiscal_year) && o.fy_label().as_deref() == Some(fy))
        .collect();
    if rows.is_empty() {
        return Err(QueryError::NoDataForYear {
            product: product.to_string(),
            fy: fy.to_string(),
        });
    }

    if let Some(raw) = forecast_type {
        let wanted = ForecastType::parse(raw).ok_or_else(|| QueryError::UnknownForecastType {
            forecast_type: raw.to_string(),
        })?;
        rows.retain(|o| o.forecast_type == wanted);
        if rows.is_empty() {
            return Err(QueryError::NoDataForForecastType {
                product: product.to_string(),
                fy: fy.to_string(),
                forecast_type: wanted.to_string(),
            });
        }
    }

    rows.retain(|o| o.pair().is_some());
    if rows.is_empty() {
        return Err(QueryError::NoUsablePairs {
            product: product.to_string(),
            fy: fy.to_string(),
        });
    }

    Ok(rows)
}

/// Most frequent non-empty adopted-method label; first seen wins ties.
///
/// Each source row votes once: observations sharing a period and forecast
/// type come from the same row, however many method columns it filled.
pub fn resolve_adopted_method(rows: &[&Observation]) -> Option<String> {
    let mut voted = HashSet::new();
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for o in rows {
        let label = o.adopted_method.as_str();
        if label.is_empty() || !voted.insert((o.period_date, o.forecast_type)) {
            continue;
        }
        match counts.iter_mut().find(|(l, _)| *l == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, n) in counts {
        if best.is_none_or(|(_, best_n)| n > best_n) {
            best = Some((label, n));
        }
    }
    best.map(|(label, _)| label.to_string())
}

/// Single-method summary of a slice using its resolved adopted method.
pub fn adopted_summary(
    rows: &[&Observation],
    product: &str,
    fy: &str,
    forecast_type: Option<ForecastType>,
) -> Result<MetricsRecord, QueryError> {
    let method = resolve_adopted_method(rows).unwrap_or_else(|| UNLABELLED_METHOD.to_string());
    let adopted: Vec<&Observation> = rows.iter().copied().filter(|o| o.method == method).collect();

    let m = compute_metrics(adopted.iter().copied());
    if m.n == 0 {
        return Err(QueryError::AdoptedMethodHasNoRows {
            product: product.to_string(),
            fy: fy.to_string(),
            method,
        });
    }

    Ok(MetricsRecord {
        product: product.to_string(),
        fy: fy.to_string(),
        forecast_type,
        is_ai: adopted.iter().any(|o| o.is_ai),
        method,
        bias: m.bias,
        rmse: m.rmse,
        mape: m.mape,
        wape: m.wape,
        n: m.n,
        is_adopted: true,
    })
}

/// One metrics row per (forecast type, method) in first-appearance order.
///
/// `is_adopted` is true when any observation of the group was adopted.
pub fn method_records(rows: &[&Observation], product: &str, fy: &str) -> Vec<MetricsRecord> {
    let mut groups: Vec<((ForecastType, &str), Vec<&Observation>)> = Vec::new();
    for &o in rows {
        let key = (o.forecast_type, o.method.as_str());
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(o),
            None => groups.push((key, vec![o])),
        }
    }

    groups
        .into_iter()
        .map(|((forecast_type, method), members)| {
            let m = compute_metrics(members.iter().copied());
            MetricsRecord {
                product: product.to_string(),
                fy: fy.to_string(),
                forecast_type: Some(forecast_type),
                method: method.to_string(),
                bias: m.bias,
                rmse: m.rmse,
                mape: m.mape,
                wape: m.wape,
                n: m.n,
                is_adopted: members.iter().any(|o| o.is_adopted),
                is_ai: members.iter().any(|o| o.is_ai),
            }
        })
        .collect()
}

/// Comparison order: adopted first, then WAPE ascending, then RMSE ascending.
/// Undefined values sort last. The sort is stable.
pub fn sort_records(records: &mut [MetricsRecord]) {
    records.sort_by(compare_records);
}

pub fn compare_records(a: &MetricsRecord, b: &MetricsRecord) -> Ordering {
    b.is_adopted
        .cmp(&a.is_adopted)
        .then_with(|| cmp_nan_last(a.wape, b.wape))
        .then_with(|| cmp_nan_last(a.rmse, b.rmse))
}

fn cmp_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Distinct evaluable financial years of a product, oldest first.
pub fn evaluable_years(dataset: &Dataset, product: &str) -> Vec<FiscalYear> {
    let mut years: Vec<FiscalYear> = dataset
        .evaluable()
        .filter(|o| o.product == product)
        .filter_map(|o| o.fiscal_year)
        .collect();
    years.sort();
    years.dedup();
    years
}
