//! Exact null distributions for rank statistics on tie-free samples.

/// Frequencies of the Mann-Whitney statistic `U = 0..=m·n` for group sizes `m` and `n`.
///
/// These are the coefficients of the Gaussian binomial `[m+n choose m]_q`, built as
/// `∏_{i=1..m} (1 − q^{n+i}) / (1 − q^i)`. Every intermediate product is itself a
/// Gaussian binomial, so the coefficients stay non-negative between steps.
pub fn mann_whitney_frequencies(m: usize, n: usize) -> Vec<f64> {
    let (m, n) = if m <= n { (m, n) } else { (n, m) };
    let max_u = m * n;
    let mut coeffs = vec![0.0f64; max_u + 1];
    coeffs[0] = 1.0;
    for i in 1..=m {
        let up = n + i;
        for d in (up..=max_u).rev() {
            coeffs[d] -= coeffs[d - up];
        }
        for d in i..=max_u {
            coeffs[d] += coeffs[d - i];
        }
    }
    for c in coeffs.iter_mut() {
        *c = c.round().max(0.0);
    }
    coeffs
}

/// Frequencies of the signed-rank statistic `W+ = 0..=n(n+1)/2` over the `2^n` sign
/// patterns of ranks `1..=n`.
pub fn signed_rank_frequencies(n: usize) -> Vec<f64> {
    let max_w = n * (n + 1) / 2;
    let mut counts = vec![0.0; max_w + 1];
    counts[0] = 1.0;
    for rank in 1..=n {
        let reach = rank * (rank + 1) / 2;
        for w in (rank..=reach).rev() {
            counts[w] += counts[w - rank];
        }
    }
    counts
}

/// Lower and upper tail probabilities `(P(S ≤ s), P(S ≥ s))` of an integer statistic
/// with the given frequency table.
pub fn tails(frequencies: &[f64], s: usize) -> (f64, f64) {
    let total: f64 = frequencies.iter().sum();
    if total <= 0.0 || frequencies.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let s = s.min(frequencies.len() - 1);
    let lower: f64 = frequencies[..=s].iter().sum();
    let upper: f64 = frequencies[s..].iter().sum();
    ((lower / total).min(1.0), (upper / total).min(1.0))
}
