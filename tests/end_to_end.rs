use std::path::{Path, PathBuf};

use fa_metrics::app::pipeline::{load, normalize_fy, normalize_product};
use fa_metrics::domain::{ForecastType, IngestConfig, MethodColumns, RecodeRule};
use fa_metrics::error::{AppError, EXIT_INPUT, EXIT_NOT_FOUND, QueryError};
use fa_metrics::io::export::write_records;

const CSV: &str = "\
product_name,period,Actual Consumption,Forecast Type,Adopted Method,Consumption,Consumption LMIS,AI Forecast,notes
amox,2023-07,\"1,000\",Main,Consumption,\"1,100\",,\"1,050\",first
amox,2023-08,2000,Main,Consumption,1800,,1900,
amox,45200,500,Review,AI Forecast,400,,550,
amox,Jul-24,800,Main,Consumption LMIS,1000,820,840,
zinc,2023-07,,Main,Consumption,12,,,
";

fn write_csv(dir: &Path) -> PathBuf {
    let path = dir.join("forecasts.csv");
    std::fs::write(&path, CSV).unwrap();
    path
}

fn config() -> IngestConfig {
    IngestConfig {
        method_columns: MethodColumns::Remaining {
            ignore: vec!["notes".to_string()],
        },
        ..IngestConfig::default()
    }
}

#[test]
fn ingest_summary_counts_rows_and_methods() {
    let dir = tempfile::tempdir().unwrap();
    let svc = load(&write_csv(dir.path()), &config()).unwrap();

    let summary = svc.dataset().summary();
    assert_eq!(summary.rows_read, 5);
    assert_eq!(summary.method_columns, vec!["Consumption", "Consumption LMIS", "AI Forecast"]);
    assert_eq!(summary.observations, 15);
    assert_eq!(summary.unparseable_periods, 0);

    assert_eq!(svc.products(), vec!["AMOX", "ZINC"]);
    assert_eq!(svc.forecast_types(), vec!["Main", "Review"]);
    assert_eq!(svc.fiscal_years("AMOX").unwrap(), vec!["FY23/24", "FY24/25"]);
}

#[test]
fn adopted_summary_with_thousands_separators() {
    let dir = tempfile::tempdir().unwrap();
    let svc = load(&write_csv(dir.path()), &config()).unwrap();

    let rec = svc
        .adopted_summary(&normalize_product(" amox "), &normalize_fy("2023"), Some("Main"))
        .unwrap();
    assert_eq!(rec.method, "Consumption");
    assert_eq!(rec.forecast_type, Some(ForecastType::Main));
    assert_eq!(rec.n, 2);
    assert!((rec.bias - -50.0).abs() < 1e-9);
    assert!((rec.rmse - 25_000f64.sqrt()).abs() < 1e-9);
    assert!((rec.mape - 10.0).abs() < 1e-9);
    assert!((rec.wape - 10.0).abs() < 1e-9);
}

#[test]
fn lmis_recode_changes_the_adopted_method() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_csv(dir.path());

    let plain = load(&path, &config()).unwrap();
    let rec = plain.adopted_summary("AMOX", "FY24/25", None).unwrap();
    assert_eq!(rec.method, "Consumption LMIS");
    assert!(rec.is_ai);
    assert!((rec.bias - 20.0).abs() < 1e-9);

    let recoded_config = IngestConfig {
        recodes: vec![RecodeRule::lmis_before_2025()],
        ..config()
    };
    let recoded = load(&path, &recoded_config).unwrap();
    let rec = recoded.adopted_summary("AMOX", "FY24/25", None).unwrap();
    assert_eq!(rec.method, "Consumption");
    assert!(!rec.is_ai);
    assert!((rec.bias - 200.0).abs() < 1e-9);
}

#[test]
fn comparison_exports_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let svc = load(&write_csv(dir.path()), &config()).unwrap();

    let records = svc.compare_methods("AMOX", "FY23/24", None).unwrap();
    assert_eq!(records.len(), 4);
    assert!(records[..2].iter().all(|r| r.is_adopted));
    assert!(records[2..].iter().all(|r| !r.is_adopted));

    let out = dir.path().join("compare.csv");
    write_records(&out, &records).unwrap();
    let text = std::fs::read_to_string(&out).unwrap();
    assert_eq!(text.lines().count(), 5);
    assert!(text.starts_with("product,fy,forecast_type,method,"));
}

#[test]
fn not_found_outcomes_map_to_exit_codes() {
    let dir = tempfile::tempdir().unwrap();
    let svc = load(&write_csv(dir.path()), &config()).unwrap();

    let err = svc.fiscal_years("ZINC").unwrap_err();
    assert_eq!(err, QueryError::NoFiscalYears { product: "ZINC".to_string() });
    assert_eq!(AppError::from(err).exit_code(), EXIT_NOT_FOUND);

    assert!(matches!(
        svc.adopted_summary("AMOX", "FY30/31", None),
        Err(QueryError::NoDataForYear { .. })
    ));
}

#[test]
fn missing_identity_column_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "product_name,period,Consumption\nA,2023-07,1\n").unwrap();

    let err = load(&path, &IngestConfig::default()).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_INPUT);
    assert!(err.message().contains("Actual Consumption"));
}
