//! Numeric helpers shared by the aggregation and deficit components.

use crate::constants::{AMOUNT_DECIMALS, AMOUNT_TOLERANCE};

/// Rounds an amount to the fixed precision used at rollup and comparison
/// boundaries.
pub fn round_amount(value: f64) -> f64 {
    let factor = 10f64.powi(AMOUNT_DECIMALS as i32);
    (value * factor).round() / factor
}

/// Whether a reported and a recomputed amount disagree beyond tolerance.
///
/// Both values are rounded to the fixed precision first, so `1.000004999`
/// and `1.0` compare equal.
pub fn is_value_different(original: f64, calculated: f64) -> bool {
    (round_amount(original) - round_amount(calculated)).abs() > AMOUNT_TOLERANCE
}

/// Percent of plan: executed / approved x 100.
///
/// A zero approved amount yields 0, never a division error, regardless of
/// the executed value.
pub fn percent_of_plan(executed: f64, approved: f64) -> f64 {
    if approved == 0.0 {
        return 0.0;
    }
    round_amount(executed / approved * 100.0)
}
