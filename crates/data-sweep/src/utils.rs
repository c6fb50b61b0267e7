//! Shared parsing helpers used by the detector and the resolvers.

use crate::types::Cell;

/// Parse text the way a float constructor would: surrounding whitespace is
/// ignored, `inf` and `nan` are accepted.
pub fn parse_float(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Whether a non-missing cell reads as a number.
pub fn is_numeric_cell(cell: &Cell) -> bool {
    match cell {
        Cell::Number(_) => true,
        Cell::Text(s) => parse_float(s).is_some(),
        Cell::Null => false,
    }
}

/// Coerce a cell to a number; anything unparseable (or NaN) is missing.
pub fn coerce_numeric(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(n) => Some(*n),
        Cell::Text(s) => parse_float(s),
        Cell::Null => None,
    };
    value.filter(|v| !v.is_nan())
}
