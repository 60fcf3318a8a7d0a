//! Cell-level parsing: periods and numbers.
//!
//! Both parsers are total: a bad cell yields `None`, never an error, so a
//! single malformed row can only drop out of the evaluable set.

pub mod numeric;
pub mod period;

pub use numeric::*;
pub use period::*;
