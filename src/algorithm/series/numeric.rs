//! Numeric helpers shared by the correction stages

/// Round to the nearest integer, ties to even.
///
/// Non-finite input maps to 0.
#[must_use]
pub fn round_half_even(value: f64) -> i64 {
    if value.is_finite() {
        value.round_ties_even() as i64
    } else {
        0
    }
}

/// Arithmetic mean rounded with [`round_half_even`], 0 for an empty slice
#[must_use]
pub fn rounded_mean(values: &[i64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    let sum: i64 = values.iter().sum();
    round_half_even(sum as f64 / values.len() as f64)
}
