//! Reporting: terminal tables and JSON rendering of query results.

pub mod format;

pub use format::*;

use serde::Serialize;

use crate::error::AppError;

/// Pretty JSON for any query result. Undefined metrics become `null`.
pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::output(format!("Failed to render JSON: {e}")))
}
