//! ASCII bar chart of an actual-consumption series.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each period is one `#` bar drawn from the zero line to its value.

use crate::domain::ActualSeries;

/// Render the series as a `width` × `height` bar chart.
pub fn render_actuals_chart(series: &ActualSeries, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let values = series.values();
    let Some((y_min, y_max)) = y_range(&values) else {
        return format!("Plot: {} {} | no data\n", series.product, series.fy);
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let base = map_y(0.0_f64.clamp(y_min, y_max), y_min, y_max, height);

    for (i, &v) in values.iter().enumerate() {
        let x = map_x(i, values.len(), width);
        let top = map_y(v, y_min, y_max, height);
        let (lo, hi) = if top <= base { (top, base) } else { (base, top) };
        for row in grid.iter_mut().take(hi + 1).skip(lo) {
            row[x] = '#';
        }
    }

    let first = series.points.first().map(|p| p.period.to_string()).unwrap_or_default();
    let last = series.points.last().map(|p| p.period.to_string()).unwrap_or_default();

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} {} | periods=[{first}, {last}] | actual=[{y_min:.2}, {y_max:.2}]\n",
        series.product, series.fy
    ));
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }
    out.push_str(&"-".repeat(width));
    out.push('\n');

    out
}

fn y_range(values: &[f64]) -> Option<(f64, f64)> {
    let mut min_y = 0.0_f64;
    let mut max_y = f64::NEG_INFINITY;
    for &v in values {
        min_y = min_y.min(v);
        max_y = max_y.max(v);
    }
    if !max_y.is_finite() {
        return None;
    }
    if max_y <= min_y {
        max_y = min_y + 1.0;
    }
    Some((min_y, max_y))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    // Keep the zero line on the bottom edge for non-negative series.
    let lo = if min == 0.0 { 0.0 } else { min - pad };
    (lo, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    ((u * (width as f64 - 1.0)).round() as usize).min(width - 1)
}

fn map_y(v: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y_max - v) / (y_max - y_min)).clamp(0.0, 1.0);
    ((u * (height as f64 - 1.0)).round() as usize).min(height - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActualPoint, ForecastType};
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> ActualSeries {
        ActualSeries {
            product: "AMOX".to_string(),
            fy: "FY23/24".to_string(),
            points: values
                .iter()
                .enumerate()
                .map(|(i, &actual)| ActualPoint {
                    period: NaiveDate::from_ymd_opt(2023, 7 + i as u32, 1).unwrap(),
                    forecast_type: ForecastType::Main,
                    actual,
                })
                .collect(),
        }
    }

    #[test]
    fn chart_has_fixed_shape() {
        let out = render_actuals_chart(&series(&[100.0, 200.0, 50.0]), 20, 8);
        let lines: Vec<&str> = out.lines().collect();
        // header + grid rows + axis
        assert_eq!(lines.len(), 1 + 8 + 1);
        assert!(lines[0].contains("periods=[2023-07-01, 2023-09-01]"));
        assert_eq!(lines[9], "-".repeat(20));
    }

    #[test]
    fn tallest_bar_reaches_the_top_row() {
        let out = render_actuals_chart(&series(&[100.0, 200.0, 50.0]), 21, 10);
        let lines: Vec<&str> = out.lines().collect();
        // Only the middle column (200) reaches the top row.
        assert_eq!(lines[1].find('#'), Some(10));
        assert_eq!(lines[1].matches('#').count(), 1);
        // Every bar touches the bottom row.
        let bottom = lines[10];
        assert_eq!(bottom.chars().filter(|&c| c == '#').count(), 3);
    }

    #[test]
    fn empty_series_has_no_grid() {
        let out = render_actuals_chart(&series(&[]), 20, 8);
        assert_eq!(out, "Plot: AMOX FY23/24 | no data\n");
    }
}
