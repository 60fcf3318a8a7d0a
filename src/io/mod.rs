//! Input/output helpers.
//!
//! - raw table + CSV reader (`table`)
//! - wide-to-long ingestion (`ingest`)
//! - metrics exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;
pub mod table;

pub use export::*;
pub use ingest::*;
pub use table::*;
