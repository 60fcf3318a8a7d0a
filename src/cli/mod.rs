//! Command-line parsing for the forecast-accuracy tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the ingestion/metrics code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::OutputFormat;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fa", version, about = "Forecast accuracy metrics over a wide forecast export")]
pub struct Cli {
    #[command(flatten)]
    pub data: DataArgs,

    /// Output format for query results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// Options describing the input table. Shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct DataArgs {
    /// Wide CSV export. Falls back to `FA_DATA_PATH`.
    #[arg(long, value_name = "CSV", global = true)]
    pub data: Option<PathBuf>,

    /// Product identifier column.
    #[arg(long, value_name = "NAME", global = true)]
    pub product_col: Option<String>,

    /// Period column.
    #[arg(long, value_name = "NAME", global = true)]
    pub period_col: Option<String>,

    /// Actual consumption column.
    #[arg(long, value_name = "NAME", global = true)]
    pub actual_col: Option<String>,

    /// Forecast type column.
    #[arg(long, value_name = "NAME", global = true)]
    pub type_col: Option<String>,

    /// Adopted method column.
    #[arg(long, value_name = "NAME", global = true)]
    pub adopted_col: Option<String>,

    /// Treat exactly these columns as forecast methods (repeatable).
    #[arg(long = "method-col", value_name = "NAME", global = true)]
    pub method_cols: Vec<String>,

    /// Exclude a non-identity column from method detection (repeatable).
    #[arg(long = "ignore-col", value_name = "NAME", global = true)]
    pub ignore_cols: Vec<String>,

    /// Only evaluate financial years starting in or after this year.
    #[arg(long, value_name = "YEAR", global = true)]
    pub min_fy: Option<i32>,

    /// Count "Consumption LMIS" as "Consumption" before FY2025.
    #[arg(long, global = true)]
    pub recode_lmis: bool,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the ingestion summary.
    Info,
    /// List products.
    Products,
    /// List forecast methods.
    Methods,
    /// List forecast types present in the data.
    Types,
    /// List evaluable financial years for a product.
    Years(ProductArgs),
    /// Accuracy of the adopted method for one product and financial year.
    Summary(SliceArgs),
    /// Compare every method for one product and financial year.
    Compare(CompareArgs),
    /// Method comparison across financial years.
    Trend(TrendArgs),
    /// Actual consumption for one product and financial year.
    Actuals(ActualsArgs),
}

#[derive(Debug, Args, Clone)]
pub struct ProductArgs {
    pub product: String,
}

/// One product-FY slice, optionally restricted to a forecast type.
#[derive(Debug, Args, Clone)]
pub struct SliceArgs {
    pub product: String,

    /// Financial year, e.g. `FY23/24` or `2023`.
    pub fy: String,

    /// Forecast type (Main or Review).
    #[arg(long = "type", value_name = "TYPE")]
    pub forecast_type: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub slice: SliceArgs,

    /// Export the comparison (CSV, or JSON for a `.json` path).
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct TrendArgs {
    pub product: String,

    /// Financial years to include (repeatable). Defaults to every evaluable year.
    #[arg(long = "fy", value_name = "FY")]
    pub years: Vec<String>,

    /// Forecast type (Main or Review).
    #[arg(long = "type", value_name = "TYPE")]
    pub forecast_type: Option<String>,

    /// Export the trend rows (CSV, or JSON for a `.json` path).
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ActualsArgs {
    #[command(flatten)]
    pub slice: SliceArgs,

    /// Render an ASCII bar chart below the listing.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 60)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 15)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn global_options_after_subcommand() {
        let cli = Cli::parse_from([
            "fa",
            "trend",
            "amox",
            "--fy",
            "FY23/24",
            "--fy",
            "2024",
            "--data",
            "x.csv",
            "--method-col",
            "Consumption",
            "--format",
            "json",
        ]);
        assert_eq!(cli.data.data, Some(PathBuf::from("x.csv")));
        assert_eq!(cli.data.method_cols, vec!["Consumption"]);
        assert_eq!(cli.format, OutputFormat::Json);
        let Command::Trend(args) = cli.command else {
            panic!("expected trend");
        };
        assert_eq!(args.years, vec!["FY23/24", "2024"]);
    }

    #[test]
    fn slice_arguments() {
        let cli = Cli::parse_from(["fa", "summary", "AMOX", "FY23/24", "--type", "review"]);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.fy, "FY23/24");
        assert_eq!(args.forecast_type.as_deref(), Some("review"));
        assert_eq!(cli.format, OutputFormat::Table);
    }
}
