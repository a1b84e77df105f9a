//! Closed-form distribution functions used when no provider is available.
//!
//! The normal CDF uses the Abramowitz–Stegun 7.1.26 rational approximation of `erf`
//! (absolute error below 1.5e-7). Binomial probabilities are evaluated in log-space
//! from cumulative log-factorials so exact small-sample tails stay finite for `n` in
//! the thousands.

use crate::config::Alternative;

const AS_P: f64 = 0.327_591_1;
const AS_A: [f64; 5] = [
    0.254_829_592,
    -0.284_496_736,
    1.421_413_741,
    -1.453_152_027,
    1.061_405_429,
];

/// Error function, Abramowitz–Stegun 7.1.26. Odd by construction.
pub fn erf(x: f64) -> f64 {
    if x == 0.0 {
        return 0.0;
    }
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + AS_P * x);
    let poly = AS_A.iter().rev().fold(0.0, |acc, &a| acc * t + a) * t;
    sign * (1.0 - poly * (-x * x).exp())
}

/// Standard normal CDF.
pub fn normal_cdf(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }
    (0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))).clamp(0.0, 1.0)
}

/// Upper tail of a chi-square variate with one degree of freedom, `2·(1 − Φ(√χ²))`.
pub fn chi_square_df1_sf(chi2: f64) -> f64 {
    if chi2.is_nan() {
        return f64::NAN;
    }
    if chi2 <= 0.0 {
        return 1.0;
    }
    (2.0 * normal_cdf(-chi2.sqrt())).clamp(0.0, 1.0)
}

/// `ln(k!)` for `k = 0..=n`.
fn ln_factorials(n: usize) -> Vec<f64> {
    let mut table = Vec::with_capacity(n + 1);
    let mut acc = 0.0;
    table.push(acc);
    for k in 1..=n {
        acc += (k as f64).ln();
        table.push(acc);
    }
    table
}

/// `ln C(n, k)`. Negative infinity when `k > n`.
pub fn log_choose(n: usize, k: usize) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let lf = ln_factorials(n);
    lf[n] - lf[k] - lf[n - k]
}

fn binom_pmf_with(lf: &[f64], n: usize, k: usize, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    if p <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    if p >= 1.0 {
        return if k == n { 1.0 } else { 0.0 };
    }
    let log_pmf =
        lf[n] - lf[k] - lf[n - k] + k as f64 * p.ln() + (n - k) as f64 * (1.0 - p).ln();
    log_pmf.exp().max(0.0)
}

/// Binomial probability mass `P(X = k)`, `X ~ Bin(n, p)`.
pub fn binom_pmf(n: usize, k: usize, p: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    binom_pmf_with(&ln_factorials(n), n, k, p)
}

/// Binomial CDF `P(X ≤ k)`, clamped to `[0, 1]`.
pub fn binom_cdf(n: usize, k: usize, p: f64) -> f64 {
    if p.is_nan() {
        return f64::NAN;
    }
    if k >= n {
        return 1.0;
    }
    let lf = ln_factorials(n);
    let total: f64 = (0..=k).map(|i| binom_pmf_with(&lf, n, i, p)).sum();
    total.clamp(0.0, 1.0)
}

/// Clips a probability into `[0, 1]`, leaving `NaN` untouched.
pub fn clip_probability(p: f64) -> f64 {
    if p.is_nan() {
        p
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Picks the p-value for `alternative` from the two one-sided tail probabilities.
///
/// `lower` is `P(S ≤ s)` and `upper` is `P(S ≥ s)` for the observed statistic `s`.
/// Two-sided doubles the smaller tail, capped at 1.
pub fn tail_p_value(lower: f64, upper: f64, alternative: Alternative) -> f64 {
    let p = match alternative {
        Alternative::Greater => upper,
        Alternative::Less => lower,
        Alternative::TwoSided => 2.0 * lower.min(upper),
    };
    clip_probability(p)
}
