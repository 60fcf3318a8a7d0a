//! Locale-formatted numeric cells (`"132,830"`) to `f64`.

use crate::io::Cell;

/// Tokens that mean "no value" in the source exports.
pub const MISSING_TOKENS: [&str; 6] = ["", "nan", "None", "N/A", "NA", "-"];

/// Convert a raw text cell to a finite float.
///
/// Surrounding whitespace and thousands separators are removed first;
/// sentinel tokens (case-insensitive) and any residual non-numeric text
/// yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if MISSING_TOKENS.iter().any(|t| t.eq_ignore_ascii_case(s)) {
        return None;
    }
    let cleaned = s.replace(',', "");
    let v = cleaned.trim().parse::<f64>().ok()?;
    v.is_finite().then_some(v)
}

pub fn cell_number(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Empty => None,
        Cell::Number(v) => v.is_finite().then_some(*v),
        Cell::Text(s) => parse_number(s),
    }
}
