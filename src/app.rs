//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - ingests the dataset once
//! - dispatches the query and prints tables/JSON/plots
//! - writes optional exports

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{ActualsArgs, Cli, Command, CompareArgs, SliceArgs, TrendArgs};
use crate::domain::{MetricsRecord, OutputFormat};
use crate::error::AppError;
use crate::query::ForecastAccuracy;

pub mod pipeline;

use pipeline::{normalize_fy, normalize_product};

/// Entry point for the `fa` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let path = pipeline::resolve_data_path(cli.data.data.as_deref())?;
    let config = pipeline::ingest_config_from_args(&cli.data);
    let svc = pipeline::load(&path, &config)?;

    dispatch(&svc, cli.command, cli.format)
}

/// Logs go to stderr so stdout stays clean for JSON output.
fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fa_metrics=info".into());
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn dispatch(svc: &ForecastAccuracy, command: Command, format: OutputFormat) -> Result<(), AppError> {
    match command {
        Command::Info => {
            let summary = svc.dataset().summary();
            match format {
                OutputFormat::Table => print!(
                    "{}",
                    crate::report::format_ingest_summary(summary, svc.dataset().min_fy_start())
                ),
                OutputFormat::Json => println!("{}", crate::report::render_json(summary)?),
            }
            Ok(())
        }
        Command::Products => print_list("Products", &svc.products(), format),
        Command::Methods => print_list("Methods", &svc.methods(), format),
        Command::Types => print_list("Forecast types", &svc.forecast_types(), format),
        Command::Years(args) => {
            let product = normalize_product(&args.product);
            let years = svc.fiscal_years(&product)?;
            print_list(&format!("Financial years for {product}"), &years, format)
        }
        Command::Summary(args) => handle_summary(svc, &args, format),
        Command::Compare(args) => handle_compare(svc, &args, format),
        Command::Trend(args) => handle_trend(svc, &args, format),
        Command::Actuals(args) => handle_actuals(svc, &args, format),
    }
}

fn handle_summary(svc: &ForecastAccuracy, args: &SliceArgs, format: OutputFormat) -> Result<(), AppError> {
    let rec = svc.adopted_summary(
        &normalize_product(&args.product),
        &normalize_fy(&args.fy),
        args.forecast_type.as_deref(),
    )?;
    match format {
        OutputFormat::Table => print!("{}", crate::report::format_summary(&rec)),
        OutputFormat::Json => println!("{}", crate::report::render_json(&rec)?),
    }
    Ok(())
}

fn handle_compare(svc: &ForecastAccuracy, args: &CompareArgs, format: OutputFormat) -> Result<(), AppError> {
    let slice = &args.slice;
    let records = svc.compare_methods(
        &normalize_product(&slice.product),
        &normalize_fy(&slice.fy),
        slice.forecast_type.as_deref(),
    )?;
    print_records(&records, format)?;

    if let Some(path) = &args.export {
        crate::io::export::write_records(path, &records)?;
        tracing::info!(path = %path.display(), rows = records.len(), "comparison exported");
    }
    Ok(())
}

fn handle_trend(svc: &ForecastAccuracy, args: &TrendArgs, format: OutputFormat) -> Result<(), AppError> {
    let years: Vec<String> = args.years.iter().map(|y| normalize_fy(y)).collect();
    let records = svc.trend(
        &normalize_product(&args.product),
        (!years.is_empty()).then_some(years.as_slice()),
        args.forecast_type.as_deref(),
    )?;
    print_records(&records, format)?;

    if let Some(path) = &args.export {
        crate::io::export::write_records(path, &records)?;
        tracing::info!(path = %path.display(), rows = records.len(), "trend exported");
    }
    Ok(())
}

fn handle_actuals(svc: &ForecastAccuracy, args: &ActualsArgs, format: OutputFormat) -> Result<(), AppError> {
    let slice = &args.slice;
    let series = svc.actuals(
        &normalize_product(&slice.product),
        &normalize_fy(&slice.fy),
        slice.forecast_type.as_deref(),
    )?;
    match format {
        OutputFormat::Table => print!("{}", crate::report::format_actuals(&series)),
        OutputFormat::Json => println!("{}", crate::report::render_json(&series)?),
    }
    if args.plot {
        println!();
        print!("{}", crate::plot::render_actuals_chart(&series, args.width, args.height));
    }
    Ok(())
}

fn print_list(title: &str, items: &[String], format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Table => print!("{}", crate::report::format_list(title, items)),
        OutputFormat::Json => println!("{}", crate::report::render_json(items)?),
    }
    Ok(())
}

fn print_records(records: &[MetricsRecord], format: OutputFormat) -> Result<(), AppError> {
    match format {
        OutputFormat::Table => print!("{}", crate::report::format_records(records)),
        OutputFormat::Json => println!("{}", crate::report::render_json(records)?),
    }
    Ok(())
}
