// Processing module for column statistics
// Author: Gabriel Demetrios Lafis

mod stats;

pub use stats::*;

/// Read a cell as a finite number.
///
/// Surrounding whitespace is ignored. Spellings of NaN and infinity count
/// as non-numeric.
pub fn to_number(cell: &str) -> Option<f64> {
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
