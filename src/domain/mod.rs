//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the financial-year classifier (`FiscalYear`)
//! - normalized long-table observations (`Observation`, `ForecastType`)
//! - metrics outputs (`AccuracyMetrics`, `MetricsRecord`, `ActualSeries`)
//! - ingestion configuration (`IngestConfig`, `IdentityColumns`, `MethodColumns`)

pub mod fiscal;
pub mod types;

pub use fiscal::*;
pub use types::*;
