//! Numerically stable accumulators: Kahan summation and Welford variance

/// Kahan compensated summation
#[derive(Debug, Clone, Copy, Default)]
pub struct KahanSum {
    sum: f64,
    c: f64, // compensation
}

impl KahanSum {
    pub fn new() -> Self {
        Self { sum: 0.0, c: 0.0 }
    }

    pub fn add(&mut self, x: f64) {
        let y = x - self.c;
        let t = self.sum + y;
        self.c = (t - self.sum) - y;
        self.sum = t;
    }

    pub fn value(&self) -> f64 {
        self.sum
    }
}

impl Extend<f64> for KahanSum {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.add(x);
        }
    }
}

/// Welford's single-pass mean and variance
#[derive(Debug, Clone, Copy, Default)]
pub struct Welford {
    n: usize,
    mean: f64,
    m2: f64,
}

impl Welford {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_slice(xs: &[f64]) -> Self {
        let mut w = Self::new();
        w.extend(xs.iter().copied());
        w
    }

    pub fn update(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (x - self.mean);
    }

    pub fn count(&self) -> usize {
        self.n
    }

    /// `NaN` when no value has been seen.
    pub fn mean(&self) -> f64 {
        if self.n == 0 {
            f64::NAN
        } else {
            self.mean
        }
    }

    /// Bessel-corrected variance, `NaN` below two observations.
    pub fn variance_sample(&self) -> f64 {
        if self.n < 2 {
            f64::NAN
        } else {
            self.m2 / (self.n as f64 - 1.0)
        }
    }
}

impl Extend<f64> for Welford {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for x in iter {
            self.update(x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kahan_reduces_error() {
        let mut s_naive = 0.0;
        let mut ks = KahanSum::new();
        for _ in 0..1_000_000 {
            s_naive += 1e-8;
            ks.add(1e-8);
        }
        assert!((ks.value() - 0.01_f64).abs() <= (s_naive - 0.01_f64).abs());
        assert!((ks.value() - 0.01_f64).abs() < 1e-12);
    }

    #[test]
    fn welford_matches_two_pass_variance() {
        let data = [12.1, 11.8, 13.4, 12.9, 12.2, 11.5];
        let w = Welford::from_slice(&data);
        let mean = data.iter().sum::<f64>() / data.len() as f64;
        let var = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (data.len() as f64 - 1.0);
        assert_eq!(w.count(), 6);
        assert!((w.mean() - mean).abs() < 1e-12);
        assert!((w.variance_sample() - var).abs() < 1e-12);
    }

    #[test]
    fn welford_undefined_below_two() {
        assert!(Welford::new().mean().is_nan());
        assert!(Welford::from_slice(&[4.2]).variance_sample().is_nan());
    }
}
