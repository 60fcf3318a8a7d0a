//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the metrics code stays clean and testable
//! - output changes are localized (important for snapshot-style tests)

use crate::domain::{ActualSeries, MetricsRecord};
use crate::io::ingest::IngestSummary;

/// One item per line under a title.
pub fn format_list(title: &str, items: &[String]) -> String {
    let mut out = format!("{title} ({}):\n", items.len());
    for item in items {
        out.push_str(&format!("  {item}\n"));
    }
    out
}

/// Single-method summary block.
pub fn format_summary(rec: &MetricsRecord) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== {} {} ===\n", rec.product, rec.fy));
    if let Some(t) = rec.forecast_type {
        out.push_str(&format!("Forecast type: {t}\n"));
    }
    out.push_str(&format!(
        "Adopted method: {}{}\n",
        rec.method,
        if rec.is_ai { " (AI)" } else { "" }
    ));
    out.push_str(&format!("n    : {}\n", rec.n));
    out.push_str(&format!("Bias : {}\n", fmt_num(rec.bias)));
    out.push_str(&format!("RMSE : {}\n", fmt_num(rec.rmse)));
    out.push_str(&format!("MAPE : {}\n", fmt_pct(rec.mape)));
    out.push_str(&format!("WAPE : {}\n", fmt_pct(rec.wape)));
    out
}

/// Comparison / trend table. `*` marks adopted rows, `AI` AI-era methods.
pub fn format_records(records: &[MetricsRecord]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<1} {:<8} {:<7} {:<28} {:>5} {:>12} {:>12} {:>9} {:>9} {:<2}\n",
            "", "fy", "type", "method", "n", "bias", "rmse", "mape", "wape", "ai"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<1} {:-<8} {:-<7} {:-<28} {:->5} {:->12} {:->12} {:->9} {:->9} {:-<2}\n",
            "", "", "", "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for r in records {
        out.push_str(
            format!(
                "{:<1} {:<8} {:<7} {:<28} {:>5} {:>12} {:>12} {:>9} {:>9} {:<2}\n",
                if r.is_adopted { "*" } else { "" },
                r.fy,
                r.forecast_type.map(|t| t.as_str()).unwrap_or(""),
                truncate(&r.method, 28),
                r.n,
                fmt_num(r.bias),
                fmt_num(r.rmse),
                fmt_pct(r.mape),
                fmt_pct(r.wape),
                if r.is_ai { "AI" } else { "" },
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Period / actual listing.
pub fn format_actuals(series: &ActualSeries) -> String {
    let mut out = format!("Actuals: {} {} (n={})\n", series.product, series.fy, series.points.len());
    for p in &series.points {
        out.push_str(&format!("  {}  {:<6} {:>12.2}\n", p.period, p.forecast_type.as_str(), p.actual));
    }
    out
}

/// Startup ingestion report.
pub fn format_ingest_summary(s: &IngestSummary, min_fy_start: Option<i32>) -> String {
    let mut out = String::new();
    out.push_str("=== fa - dataset ===\n");
    out.push_str(&format!(
        "Rows: read={} | skipped records={} | unparseable periods={}\n",
        s.rows_read, s.skipped_records, s.unparseable_periods
    ));
    out.push_str(&format!(
        "Method columns ({}): {}\n",
        s.method_columns.len(),
        s.method_columns.join(", ")
    ));
    out.push_str(&format!(
        "Observations: long={} | catalog={} | evaluable={}\n",
        s.observations, s.catalog, s.evaluable
    ));
    match min_fy_start {
        Some(y) => out.push_str(&format!("FY cutoff: start year >= {y}\n")),
        None => out.push_str("FY cutoff: none\n"),
    }
    out
}

pub fn fmt_num(v: f64) -> String {
    if v.is_finite() { format!("{v:.2}") } else { "n/a".to_string() }
}

pub fn fmt_pct(v: f64) -> String {
    if v.is_finite() { format!("{v:.2}%") } else { "n/a".to_string() }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ForecastType;

    fn record(method: &str, wape: f64, is_adopted: bool) -> MetricsRecord {
        MetricsRecord {
            product: "AMOX".to_string(),
            fy: "FY23/24".to_string(),
            forecast_type: Some(ForecastType::Main),
            method: method.to_string(),
            bias: -5.0,
            rmse: 15.811,
            mape: 10.0,
            wape,
            n: 2,
            is_adopted,
            is_ai: false,
        }
    }

    #[test]
    fn nan_renders_as_na() {
        assert_eq!(fmt_num(f64::NAN), "n/a");
        assert_eq!(fmt_pct(f64::NAN), "n/a");
        assert_eq!(fmt_num(15.8114), "15.81");
        assert_eq!(fmt_pct(10.0), "10.00%");
    }

    #[test]
    fn records_table_marks_adopted_rows() {
        let out = format_records(&[record("Consumption", 10.0, true), record("Naive", f64::NAN, false)]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("* FY23/24"));
        assert!(lines[2].contains("10.00%"));
        assert!(lines[3].starts_with("  FY23/24"));
        assert!(lines[3].contains("n/a"));
    }

    #[test]
    fn summary_block() {
        let out = format_summary(&record("Consumption", 10.0, true));
        assert!(out.contains("Adopted method: Consumption\n"));
        assert!(out.contains("Bias : -5.00\n"));
        assert!(out.contains("WAPE : 10.00%\n"));
    }

    #[test]
    fn long_method_names_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
