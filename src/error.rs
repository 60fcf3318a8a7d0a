//! Error types.
//!
//! Two tiers:
//! - `AppError`: fatal, process-level failures carrying an exit code
//!   (bad configuration, unreadable or structurally incompatible input,
//!   output failures).
//! - `QueryError`: recoverable "not found" outcomes of a single query.

use thiserror::Error;

/// Exit code for configuration, source and schema errors.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for queries that found no data.
pub const EXIT_NOT_FOUND: u8 = 3;
/// Exit code for output/export failures.
pub const EXIT_OUTPUT: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::new(EXIT_OUTPUT, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::new(EXIT_NOT_FOUND, err.to_string())
    }
}

/// A query matched nothing usable.
///
/// Every variant is a distinct, identifiable outcome; none of them is a
/// crash, and none is reported as an empty success.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Unknown product '{product}'.")]
    UnknownProduct { product: String },

    #[error("No data found for product '{product}' in {fy}.")]
    NoDataForYear { product: String, fy: String },

    #[error("No '{forecast_type}' forecasts for product '{product}' in {fy}.")]
    NoDataForForecastType {
        product: String,
        fy: String,
        forecast_type: String,
    },

    #[error("No usable forecast/actual pairs for product '{product}' in {fy}.")]
    NoUsablePairs { product: String, fy: String },

    #[error("Adopted method '{method}' has no rows for product '{product}' in {fy}.")]
    AdoptedMethodHasNoRows {
        product: String,
        fy: String,
        method: String,
    },

    #[error("No evaluable financial years for product '{product}'.")]
    NoFiscalYears { product: String },

    #[error("No data for product '{product}' in any of: {}.", years.join(", "))]
    NoDataForYears { product: String, years: Vec<String> },

    #[error("Unknown forecast type '{forecast_type}' (expected Main or Review).")]
    UnknownForecastType { forecast_type: String },
}
