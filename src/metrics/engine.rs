//! Forecast accuracy measures.
//!
//! With `e = forecast - actual` over rows where both values are present:
//!
//! ```text
//! bias = mean(e)
//! rmse = sqrt(mean(e^2))
//! mape = mean(|e| / actual) * 100      over rows with actual != 0
//! wape = sum(|e|) / sum(|actual|) * 100
//! ```
//!
//! Undefined results are `NaN`: everything on an empty slice, MAPE when every
//! actual is zero, WAPE when the absolute actuals sum to zero. An empty slice
//! is a valid result (`n = 0`), not an error.

use crate::domain::{AccuracyMetrics, Observation};

/// Metrics over observations; rows missing either value are skipped.
pub fn compute_metrics<'a, I>(rows: I) -> AccuracyMetrics
where
    I: IntoIterator<Item = &'a Observation>,
{
    let pairs: Vec<(f64, f64)> = rows.into_iter().filter_map(Observation::pair).collect();
    metrics_from_pairs(&pairs)
}

/// Metrics over `(actual, forecast)` pairs.
pub fn metrics_from_pairs(pairs: &[(f64, f64)]) -> AccuracyMetrics {
    if pairs.is_empty() {
        return AccuracyMetrics::empty();
    }

    let n = pairs.len();
    let nf = n as f64;

    let mut sum_err = 0.0;
    let mut sum_sq = 0.0;
    let mut sum_abs_err = 0.0;
    let mut sum_abs_actual = 0.0;
    let mut sum_pct = 0.0;
    let mut n_pct = 0usize;

    for &(actual, forecast) in pairs {
        let e = forecast - actual;
        sum_err += e;
        sum_sq += e * e;
        sum_abs_err += e.abs();
        sum_abs_actual += actual.abs();
        if actual != 0.0 {
            sum_pct += e.abs() / actual;
            n_pct += 1;
        }
    }

    let mape = if n_pct > 0 {
        sum_pct / n_pct as f64 * 100.0
    } else {
        f64::NAN
    };
    let wape = if sum_abs_actual != 0.0 {
        sum_abs_err / sum_abs_actual * 100.0
    } else {
        f64::NAN
    };

    AccuracyMetrics {
        bias: sum_err / nf,
        rmse: (sum_sq / nf).sqrt(),
        mape,
        wape,
        n,
    }
}
