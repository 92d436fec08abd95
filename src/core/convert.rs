//! Conversion between two currencies through the pivot currency

use super::rates::{RateEntry, RateTable};

const MISSING: RateEntry = RateEntry {
    rate: 0.0,
    quantity: 1.0,
};

/// Rounds to two decimal places, the precision of currency subunits.
///
/// Rounds the exact binary value with ties to even, so `0.125` becomes `0.12`
/// and `0.045` (stored just below) becomes `0.04`. Never overflows.
pub fn round_to_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Converts without the final rounding. Returns 0 when either code is absent.
pub fn convert_unrounded(amount: f64, from: &str, to: &str, table: &RateTable) -> f64 {
    let from_entry = table.get(from).unwrap_or(&MISSING);
    let to_entry = table.get(to).unwrap_or(&MISSING);
    if from_entry.rate == 0.0 || to_entry.rate == 0.0 {
        return 0.0;
    }

    let pivot_amount = (amount / from_entry.quantity) * from_entry.rate;
    (pivot_amount / to_entry.rate) * to_entry.quantity
}

/// Converts `amount` of `from` into `to`, rounded to cents.
///
/// A code missing from `table` yields `0.0`; callers restrict choices to
/// [`RateTable::codes`] to avoid it.
pub fn convert(amount: f64, from: &str, to: &str, table: &RateTable) -> f64 {
    round_to_cents(convert_unrounded(amount, from, to, table))
}
