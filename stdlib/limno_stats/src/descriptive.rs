//! Descriptive primitives shared by every test.

use crate::stable::{KahanSum, Welford};

/// Arithmetic mean with compensated summation. `NaN` for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    let mut sum = KahanSum::new();
    sum.extend(xs.iter().copied());
    sum.value() / xs.len() as f64
}

/// Bessel-corrected sample variance. `NaN` when `n < 2`.
pub fn variance(xs: &[f64]) -> f64 {
    Welford::from_slice(xs).variance_sample()
}

/// Sample standard deviation. `NaN` when `n < 2`.
pub fn sd(xs: &[f64]) -> f64 {
    variance(xs).sqrt()
}

/// Median with the usual even/odd handling. `NaN` for an empty slice.
pub fn median(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return f64::NAN;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Index of the first non-finite value, if any.
pub(crate) fn first_non_finite(xs: &[f64]) -> Option<usize> {
    xs.iter().position(|x| !x.is_finite())
}
