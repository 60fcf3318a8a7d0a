//! Shared "load pipeline" logic: CLI arguments -> ingestion config -> dataset.
//!
//! Keeping this in one place avoids duplicating the startup workflow:
//! resolve path -> read CSV -> reshape/classify -> query facade

use std::path::{Path, PathBuf};

use crate::cli::DataArgs;
use crate::domain::{FiscalYear, IngestConfig, MethodColumns, RecodeRule};
use crate::error::AppError;
use crate::io::ingest::Dataset;
use crate::io::table::read_csv_table;
use crate::query::ForecastAccuracy;

/// Environment variable consulted when `--data` is not given.
pub const DATA_PATH_ENV: &str = "FA_DATA_PATH";

/// Resolve the input path from the flag, falling back to the environment.
pub fn resolve_data_path(arg: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Some(path) = arg {
        return Ok(path.to_path_buf());
    }
    match std::env::var(DATA_PATH_ENV) {
        Ok(v) if !v.trim().is_empty() => Ok(PathBuf::from(v.trim())),
        _ => Err(AppError::input(format!(
            "No input data: pass --data <CSV> or set {DATA_PATH_ENV}"
        ))),
    }
}

/// Build the ingestion config from CLI flags.
pub fn ingest_config_from_args(args: &DataArgs) -> IngestConfig {
    let mut config = IngestConfig::default();

    let columns = &mut config.columns;
    for (slot, value) in [
        (&mut columns.product, &args.product_col),
        (&mut columns.period, &args.period_col),
        (&mut columns.actual, &args.actual_col),
        (&mut columns.forecast_type, &args.type_col),
        (&mut columns.adopted_method, &args.adopted_col),
    ] {
        if let Some(v) = value {
            *slot = v.clone();
        }
    }

    config.method_columns = if args.method_cols.is_empty() {
        MethodColumns::Remaining {
            ignore: args.ignore_cols.clone(),
        }
    } else {
        MethodColumns::Named(args.method_cols.clone())
    };
    config.min_fy_start = args.min_fy;
    if args.recode_lmis {
        config.recodes.push(RecodeRule::lmis_before_2025());
    }

    config
}

/// Read, reshape and classify the input table.
pub fn load(path: &Path, config: &IngestConfig) -> Result<ForecastAccuracy, AppError> {
    tracing::info!(path = %path.display(), "loading dataset");
    let table = read_csv_table(path)?;
    let dataset = Dataset::from_table(&table, config)?;
    Ok(ForecastAccuracy::new(dataset))
}

/// Products are stored trimmed and uppercased.
pub fn normalize_product(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Accept `FY23/24`, `23/24` or a start year such as `2023`.
///
/// Unrecognised input is passed through so the query reports it as missing.
pub fn normalize_fy(raw: &str) -> String {
    FiscalYear::parse(raw).map_or_else(|| raw.trim().to_string(), FiscalYear::label)
}
