//! Accuracy metrics and slice selection.
//!
//! - `engine`: bias / RMSE / MAPE / WAPE over any slice of observations
//! - `selection`: product/FY/type slicing, adopted-method resolution and
//!   the comparison sort order

pub mod engine;
pub mod selection;

pub use engine::*;
pub use selection::*;
