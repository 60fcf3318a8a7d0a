//! Export metrics rows to CSV or JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Undefined metrics are written as empty CSV fields / JSON `null`.

use std::fs::File;
use std::path::Path;

use csv::Writer as CsvWriter;

use crate::domain::MetricsRecord;
use crate::error::AppError;

/// Write metrics rows, choosing JSON for a `.json` extension and CSV otherwise.
pub fn write_records(path: &Path, records: &[MetricsRecord]) -> Result<(), AppError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        write_records_json(path, records)
    } else {
        write_records_csv(path, records)
    }
}

/// Write metrics rows to a CSV file.
pub fn write_records_csv(path: &Path, records: &[MetricsRecord]) -> Result<(), AppError> {
    let mut wtr = CsvWriter::from_path(path)
        .map_err(|e| AppError::output(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    wtr.write_record([
        "product",
        "fy",
        "forecast_type",
        "method",
        "n",
        "bias",
        "rmse",
        "mape",
        "wape",
        "is_adopted",
        "is_ai",
    ])
    .map_err(|e| AppError::output(format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        let row = [
            r.product.clone(),
            r.fy.clone(),
            r.forecast_type.map(|t| t.as_str()).unwrap_or("").to_string(),
            r.method.clone(),
            r.n.to_string(),
            fmt_opt(r.bias),
            fmt_opt(r.rmse),
            fmt_opt(r.mape),
            fmt_opt(r.wape),
            r.is_adopted.to_string(),
            r.is_ai.to_string(),
        ];
        wtr.write_record(&row)
            .map_err(|e| AppError::output(format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::output(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write metrics rows to a JSON file.
pub fn write_records_json(path: &Path, records: &[MetricsRecord]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::output(format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, records)
        .map_err(|e| AppError::output(format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

fn fmt_opt(v: f64) -> String {
    if v.is_finite() { format!("{v:.6}") } else { String::new() }
}
