//! `fa-metrics` library crate.
//!
//! The binary (`fa`) is a thin wrapper around this library so that:
//!
//! - ingestion and metrics are testable without spawning processes
//! - the query facade can be reused by other front-ends (e.g. an HTTP service)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod metrics;
pub mod parse;
pub mod plot;
pub mod query;
pub mod report;
