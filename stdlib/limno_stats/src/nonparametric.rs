//! Rank and counting tests: Wilcoxon signed-rank, sign test, Mann-Whitney U and
//! Mood's median test.
//!
//! Differences whose magnitude is below [`TIE_TOLERANCE`] count as zero and are
//! dropped before ranking or counting (the "wilcox" zero convention). When nothing is
//! left to test the result is degenerate with `p_value = 1`.

use log::{debug, trace, warn};

use crate::config::{Alternative, MannWhitneyMethod, TestConfig};
use crate::descriptive::median;
use crate::distributions::{log_choose, tail_p_value};
use crate::engine::{continuity_z, normal_tail, HypothesisEngine};
use crate::error::{Result, StatsError};
use crate::exact::{mann_whitney_frequencies, tails};
use crate::ranks::{rank_with_ties, TIE_TOLERANCE};
use crate::result::{
    MannWhitneyDetails, MoodMedianDetails, PValueMethod, SignTestDetails, SignedRankDetails,
    TestKind, TestResult,
};

/// `ln(2^53)`: beyond this many arrangements the exact U counts are no longer exact
/// integers in an `f64`.
const EXACT_LOG_ARRANGEMENTS: f64 = 36.7;

fn is_zero_difference(d: f64) -> bool {
    d.abs() < TIE_TOLERANCE
}

fn check_mu0(mu0: f64) -> Result<()> {
    if mu0.is_finite() {
        Ok(())
    } else {
        Err(StatsError::InvalidParameter {
            name: "mu0",
            value: mu0,
        })
    }
}

impl SignedRankDetails {
    fn undefined(n: usize) -> Self {
        Self {
            n,
            n_zero: 0,
            w_plus: f64::NAN,
            w_minus: f64::NAN,
            statistic: f64::NAN,
            z: None,
            mean: f64::NAN,
            variance: f64::NAN,
            tie_groups: Vec::new(),
        }
    }
}

impl MannWhitneyDetails {
    fn undefined(n1: usize, n2: usize) -> Self {
        Self {
            n1,
            n2,
            rank_sum1: f64::NAN,
            u1: f64::NAN,
            u2: f64::NAN,
            u: f64::NAN,
            z: None,
            mean: f64::NAN,
            variance: f64::NAN,
            tie_groups: Vec::new(),
        }
    }
}

impl MoodMedianDetails {
    fn undefined(n1: usize, n2: usize) -> Self {
        Self {
            n1,
            n2,
            grand_median: f64::NAN,
            table: [[0; 2]; 2],
            expected: [[f64::NAN; 2]; 2],
            chi2: f64::NAN,
            df: 1,
        }
    }
}

impl HypothesisEngine {
    /// One-sample Wilcoxon signed-rank test of `x - mu0`.
    ///
    /// The signed-rank provider is consulted first. If it is absent or declines the
    /// input (ties, large n), the tie-corrected normal approximation is used:
    /// `var = n(n+1)(2n+1)/24 - Σt(t²-1)/24` with a 0.5 continuity correction.
    pub fn wilcoxon_signed_rank(
        &self,
        x: &[f64],
        mu0: f64,
        config: &TestConfig,
    ) -> Result<TestResult<SignedRankDetails>> {
        config.validate()?;
        check_mu0(mu0)?;
        let test = TestKind::WilcoxonSignedRank;
        if !self.admit(test, x, 1)? {
            return Ok(TestResult::insufficient(
                test,
                config,
                SignedRankDetails::undefined(x.len()),
            ));
        }
        let differences: Vec<f64> = x.iter().map(|v| v - mu0).collect();
        Ok(self.signed_rank(&differences, config))
    }

    /// Wilcoxon signed-rank test on the paired differences `x[i] - y[i]`.
    pub fn wilcoxon_paired(
        &self,
        x: &[f64],
        y: &[f64],
        config: &TestConfig,
    ) -> Result<TestResult<SignedRankDetails>> {
        config.validate()?;
        let test = TestKind::WilcoxonSignedRank;
        let undefined = || {
            TestResult::insufficient(test, config, SignedRankDetails::undefined(x.len()))
        };
        if !self.admit_pair(test, x, y)? {
            return Ok(undefined());
        }
        let differences: Vec<f64> = x.iter().zip(y).map(|(a, b)| a - b).collect();
        if !self.admit(test, &differences, 1)? {
            return Ok(undefined());
        }
        Ok(self.signed_rank(&differences, config))
    }

    fn signed_rank(&self, differences: &[f64], config: &TestConfig) -> TestResult<SignedRankDetails> {
        let test = TestKind::WilcoxonSignedRank;
        let nonzero: Vec<f64> = differences
            .iter()
            .copied()
            .filter(|d| !is_zero_difference(*d))
            .collect();
        let n = nonzero.len();
        let n_zero = differences.len() - n;

        if n == 0 {
            let details = SignedRankDetails {
                n_zero,
                w_plus: 0.0,
                w_minus: 0.0,
                mean: 0.0,
                variance: 0.0,
                ..SignedRankDetails::undefined(0)
            };
            return TestResult::degenerate(test, config, PValueMethod::Undefined, details);
        }

        let abs: Vec<f64> = nonzero.iter().map(|d| d.abs()).collect();
        let ranking = rank_with_ties(&abs);
        let w_plus: f64 = nonzero
            .iter()
            .zip(&ranking.ranks)
            .filter(|(d, _)| **d > 0.0)
            .map(|(_, r)| *r)
            .sum();
        let nf = n as f64;
        let w_minus = nf * (nf + 1.0) / 2.0 - w_plus;
        let mean = nf * (nf + 1.0) / 4.0;
        let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - ranking.tie_term() / 24.0;
        let mut details = SignedRankDetails {
            n,
            n_zero,
            w_plus,
            w_minus,
            statistic: match config.alternative {
                Alternative::TwoSided => w_plus.min(w_minus),
                Alternative::Greater | Alternative::Less => w_plus,
            },
            z: None,
            mean,
            variance,
            tie_groups: ranking.tied_group_sizes(),
        };

        if let Some(provider) = self.providers().signed_rank() {
            match provider.signed_rank(&nonzero, config.alpha, config.alternative) {
                Ok(outcome) if outcome.p_value.is_finite() => {
                    trace!(
                        "{}: {} W={} p={}",
                        test.label(),
                        provider.name(),
                        outcome.statistic,
                        outcome.p_value
                    );
                    details.statistic = outcome.statistic;
                    return TestResult::new(
                        test,
                        outcome.p_value,
                        config,
                        PValueMethod::RankProvider,
                        details,
                    );
                }
                Ok(outcome) => debug!(
                    "{} returned p={}, using normal approximation",
                    provider.name(),
                    outcome.p_value
                ),
                Err(err) => debug!("{} declined: {err}; using normal approximation", provider.name()),
            }
        }

        if variance.is_nan() || variance <= 0.0 {
            warn!("{}: zero rank variance", test.label());
            return TestResult::degenerate(test, config, PValueMethod::Undefined, details);
        }
        let z = continuity_z(w_plus, mean, variance, config.alternative);
        let p = normal_tail(z, config.alternative);
        details.z = Some(z);
        trace!("{}: W+={w_plus} z={z} p={p}", test.label());
        TestResult::new(test, p, config, PValueMethod::NormalApproximation, details)
    }

    /// Exact sign test of `x - mu0` against a fair coin.
    ///
    /// With `k` positive differences out of `n`: `Greater` is `P(X >= k)`, `Less` is
    /// `P(X <= k)` and two-sided doubles the smaller, capped at 1.
    pub fn sign_test(
        &self,
        x: &[f64],
        mu0: f64,
        config: &TestConfig,
    ) -> Result<TestResult<SignTestDetails>> {
        config.validate()?;
        check_mu0(mu0)?;
        let test = TestKind::SignTest;
        let mut details = SignTestDetails {
            n: 0,
            n_positive: 0,
            n_negative: 0,
            n_zero: 0,
        };
        if !self.admit(test, x, 1)? {
            return Ok(TestResult::insufficient(test, config, details));
        }

        for d in x.iter().map(|v| v - mu0) {
            if is_zero_difference(d) {
                details.n_zero += 1;
            } else if d > 0.0 {
                details.n_positive += 1;
            } else {
                details.n_negative += 1;
            }
        }
        let (k, n) = (details.n_positive, details.n_positive + details.n_negative);
        details.n = n;
        if n == 0 {
            return Ok(TestResult::degenerate(
                test,
                config,
                PValueMethod::ExactBinomial,
                details,
            ));
        }

        let at_most_k = self.fair_coin_cdf(k, n);
        let at_least_k = self.fair_coin_cdf(n - k, n);
        let p = tail_p_value(at_most_k, at_least_k, config.alternative);
        trace!("{}: k={k} n={n} p={p}", test.label());
        Ok(TestResult::new(
            test,
            p,
            config,
            PValueMethod::ExactBinomial,
            details,
        ))
    }

    /// Mann-Whitney U test of `x` against `y`. `Greater` means `x` tends to be larger.
    ///
    /// Tie-free samples use the exact null distribution of `U1` according to
    /// [`MannWhitneyMethod`]; otherwise `z` is computed from the tie-corrected variance
    /// `n1·n2(N+1)/12 - n1·n2·Σt(t²-1)/(12N(N-1))` with a 0.5 continuity correction.
    pub fn mann_whitney_u(
        &self,
        x: &[f64],
        y: &[f64],
        config: &TestConfig,
    ) -> Result<TestResult<MannWhitneyDetails>> {
        config.validate()?;
        let test = TestKind::MannWhitneyU;
        if !(self.admit(test, x, 1)? && self.admit(test, y, 1)?) {
            return Ok(TestResult::insufficient(
                test,
                config,
                MannWhitneyDetails::undefined(x.len(), y.len()),
            ));
        }

        let (n1, n2) = (x.len(), y.len());
        let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
        let ranking = rank_with_ties(&pooled);
        let rank_sum1: f64 = ranking.ranks[..n1].iter().sum();
        let (f1, f2, big_n) = (n1 as f64, n2 as f64, (n1 + n2) as f64);
        let u1 = rank_sum1 - f1 * (f1 + 1.0) / 2.0;
        let u2 = f1 * f2 - u1;
        let mean = f1 * f2 / 2.0;
        let variance = f1 * f2 * (big_n + 1.0) / 12.0
            - f1 * f2 * ranking.tie_term() / (12.0 * big_n * (big_n - 1.0));
        let mut details = MannWhitneyDetails {
            n1,
            n2,
            rank_sum1,
            u1,
            u2,
            u: u1.min(u2),
            z: None,
            mean,
            variance,
            tie_groups: ranking.tied_group_sizes(),
        };

        if self.use_exact_u(n1, n2, ranking.has_ties()) {
            let frequencies = mann_whitney_frequencies(n1, n2);
            let (lower, upper) = tails(&frequencies, u1.round() as usize);
            let p = tail_p_value(lower, upper, config.alternative);
            trace!("{}: exact U1={u1} p={p}", test.label());
            return Ok(TestResult::new(
                test,
                p,
                config,
                PValueMethod::ExactRankDistribution,
                details,
            ));
        }

        if variance.is_nan() || variance <= 0.0 {
            warn!("{}: every observation is tied", test.label());
            return Ok(TestResult::degenerate(
                test,
                config,
                PValueMethod::Undefined,
                details,
            ));
        }
        let z = continuity_z(u1, mean, variance, config.alternative);
        let p = normal_tail(z, config.alternative);
        details.z = Some(z);
        trace!("{}: U1={u1} z={z} p={p}", test.label());
        Ok(TestResult::new(
            test,
            p,
            config,
            PValueMethod::NormalApproximation,
            details,
        ))
    }

    fn use_exact_u(&self, n1: usize, n2: usize, ties: bool) -> bool {
        if ties || log_choose(n1 + n2, n1) > EXACT_LOG_ARRANGEMENTS {
            return false;
        }
        match self.config().mann_whitney_method {
            MannWhitneyMethod::Auto => n1.min(n2) <= self.config().exact_threshold,
            MannWhitneyMethod::Exact => true,
            MannWhitneyMethod::Asymptotic => false,
        }
    }

    /// Mood's median test: a 2×2 chi-square test (df = 1, no Yates correction) of
    /// counts at or below versus above the pooled median. Always two-sided.
    pub fn mood_median_test(
        &self,
        x: &[f64],
        y: &[f64],
        config: &TestConfig,
    ) -> Result<TestResult<MoodMedianDetails>> {
        config.validate()?;
        let test = TestKind::MoodMedian;
        if !(self.admit(test, x, 1)? && self.admit(test, y, 1)?) {
            return Ok(TestResult::insufficient(
                test,
                config,
                MoodMedianDetails::undefined(x.len(), y.len()),
            )
            .with_alternative(Alternative::TwoSided));
        }

        let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
        let grand_median = median(&pooled);
        let at_or_below = |s: &[f64]| s.iter().filter(|v| **v <= grand_median).count();
        let (below_x, below_y) = (at_or_below(x), at_or_below(y));
        let table = [
            [below_x, below_y],
            [x.len() - below_x, y.len() - below_y],
        ];

        let total = pooled.len() as f64;
        let columns = [x.len() as f64, y.len() as f64];
        let mut expected = [[0.0; 2]; 2];
        let mut chi2 = 0.0;
        for (row, observed) in table.iter().enumerate() {
            let row_total = (observed[0] + observed[1]) as f64;
            for col in 0..2 {
                let e = row_total * columns[col] / total;
                expected[row][col] = e;
                chi2 += (observed[col] as f64 - e).powi(2) / e;
            }
        }
        let mut details = MoodMedianDetails {
            n1: x.len(),
            n2: y.len(),
            grand_median,
            table,
            expected,
            chi2,
            df: 1,
        };

        if expected.iter().flatten().any(|e| *e <= 0.0) {
            warn!("{}: empty row in contingency table", test.label());
            details.chi2 = f64::NAN;
            return Ok(TestResult::degenerate(
                test,
                config,
                PValueMethod::Undefined,
                details,
            )
            .with_alternative(Alternative::TwoSided));
        }

        let (p, method) = self.chi_square_sf(chi2);
        trace!("{}: median={grand_median} chi2={chi2} p={p}", test.label());
        Ok(TestResult::new(test, p, config, method, details).with_alternative(Alternative::TwoSided))
    }
}
