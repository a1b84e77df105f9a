//! t-tests and TOST equivalence.

use log::{trace, warn};

use crate::config::{Alternative, TestConfig};
use crate::descriptive::{mean, variance};
use crate::engine::HypothesisEngine;
use crate::error::{Result, StatsError};
use crate::result::{EquivalenceDetails, PValueMethod, TTestDetails, TestKind, TestResult};

/// Summary of one sample: size, mean and sample variance.
#[derive(Debug, Clone, Copy)]
struct Moments {
    n: usize,
    mean: f64,
    var: f64,
}

impl Moments {
    fn of(xs: &[f64]) -> Self {
        Self {
            n: xs.len(),
            mean: mean(xs),
            var: variance(xs),
        }
    }

    fn sd(&self) -> f64 {
        self.var.sqrt()
    }

    /// Squared standard error of the mean.
    fn se2(&self) -> f64 {
        self.var / self.n as f64
    }
}

fn pooled_variance(a: &Moments, b: &Moments) -> f64 {
    ((a.n - 1) as f64 * a.var + (b.n - 1) as f64 * b.var) / (a.n + b.n - 2) as f64
}

fn welch_df(a: &Moments, b: &Moments) -> f64 {
    let (va, vb) = (a.se2(), b.se2());
    (va + vb).powi(2) / (va * va / (a.n - 1) as f64 + vb * vb / (b.n - 1) as f64)
}

fn check_parameter(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(StatsError::InvalidParameter { name, value })
    }
}

fn check_bounds(lower: f64, upper: f64) -> Result<()> {
    if lower.is_finite() && upper.is_finite() && lower < upper {
        Ok(())
    } else {
        Err(StatsError::InvalidBounds { lower, upper })
    }
}

fn is_degenerate_se(se: f64) -> bool {
    !(se > 0.0 && se.is_finite())
}

/// Cohen's d; `NaN` when the standardiser is zero or undefined.
fn effect_size(difference: f64, sd: f64) -> f64 {
    if sd > 0.0 && sd.is_finite() {
        difference / sd
    } else {
        f64::NAN
    }
}

impl TTestDetails {
    fn undefined(n1: usize, n2: Option<usize>, mu0: f64) -> Self {
        Self {
            n1,
            n2,
            mean1: f64::NAN,
            mean2: n2.map(|_| f64::NAN),
            sd1: f64::NAN,
            sd2: n2.map(|_| f64::NAN),
            mu0,
            statistic: f64::NAN,
            df: f64::NAN,
            cohens_d: f64::NAN,
        }
    }
}

impl EquivalenceDetails {
    fn undefined(n: usize, lower: f64, upper: f64) -> Self {
        Self {
            n,
            mean: f64::NAN,
            sd: f64::NAN,
            se: f64::NAN,
            df: f64::NAN,
            lower,
            upper,
            t_lower: f64::NAN,
            t_upper: f64::NAN,
            p_lower: f64::NAN,
            p_upper: f64::NAN,
            equivalent: false,
        }
    }
}

impl HypothesisEngine {
    /// One-sample t-test of `mean(x) == mu0` with `df = n - 1`.
    pub fn t_test_one_sample(
        &self,
        x: &[f64],
        mu0: f64,
        config: &TestConfig,
    ) -> Result<TestResult<TTestDetails>> {
        config.validate()?;
        check_parameter("mu0", mu0)?;
        let test = TestKind::OneSampleT;
        if !self.admit(test, x, 2)? {
            return Ok(TestResult::insufficient(
                test,
                config,
                TTestDetails::undefined(x.len(), None, mu0),
            ));
        }
        Ok(self.one_sample_t(test, &Moments::of(x), mu0, config))
    }

    /// Paired t-test: a one-sample t-test of `x[i] - y[i]` against zero. `mean1` and
    /// `sd1` describe the differences.
    pub fn t_test_paired(
        &self,
        x: &[f64],
        y: &[f64],
        config: &TestConfig,
    ) -> Result<TestResult<TTestDetails>> {
        config.validate()?;
        let test = TestKind::PairedT;
        let undefined = || {
            TestResult::insufficient(test, config, TTestDetails::undefined(x.len(), None, 0.0))
        };
        if !self.admit_pair(test, x, y)? {
            return Ok(undefined());
        }
        let differences: Vec<f64> = x.iter().zip(y).map(|(a, b)| a - b).collect();
        if !self.admit(test, &differences, 2)? {
            return Ok(undefined());
        }
        Ok(self.one_sample_t(test, &Moments::of(&differences), 0.0, config))
    }

    fn one_sample_t(
        &self,
        test: TestKind,
        m: &Moments,
        mu0: f64,
        config: &TestConfig,
    ) -> TestResult<TTestDetails> {
        let se = m.se2().sqrt();
        let df = (m.n - 1) as f64;
        let mut details = TTestDetails {
            n1: m.n,
            n2: None,
            mean1: m.mean,
            mean2: None,
            sd1: m.sd(),
            sd2: None,
            mu0,
            statistic: f64::NAN,
            df,
            cohens_d: effect_size(m.mean - mu0, m.sd()),
        };
        if is_degenerate_se(se) {
            warn!("{}: zero standard error, no test possible", test.label());
            return TestResult::degenerate(test, config, PValueMethod::Undefined, details);
        }

        details.statistic = (m.mean - mu0) / se;
        let (p, method) = self.t_tail(details.statistic, df, config.alternative);
        trace!("{}: t={} df={} p={p}", test.label(), details.statistic, df);
        TestResult::new(test, p, config, method, details)
    }

    /// Welch's unequal-variance t-test. The Welch–Satterthwaite df is fractional and is
    /// used as is.
    pub fn t_test_welch(
        &self,
        x: &[f64],
        y: &[f64],
        config: &TestConfig,
    ) -> Result<TestResult<TTestDetails>> {
        self.two_sample_t(TestKind::WelchT, x, y, config)
    }

    /// Student's pooled-variance t-test with `df = n1 + n2 - 2`.
    pub fn t_test_student(
        &self,
        x: &[f64],
        y: &[f64],
        config: &TestConfig,
    ) -> Result<TestResult<TTestDetails>> {
        self.two_sample_t(TestKind::StudentT, x, y, config)
    }

    fn two_sample_t(
        &self,
        test: TestKind,
        x: &[f64],
        y: &[f64],
        config: &TestConfig,
    ) -> Result<TestResult<TTestDetails>> {
        config.validate()?;
        if !(self.admit(test, x, 2)? && self.admit(test, y, 2)?) {
            return Ok(TestResult::insufficient(
                test,
                config,
                TTestDetails::undefined(x.len(), Some(y.len()), 0.0),
            ));
        }

        let (a, b) = (Moments::of(x), Moments::of(y));
        let pooled = pooled_variance(&a, &b);
        let (se, df) = match test {
            TestKind::WelchT => ((a.se2() + b.se2()).sqrt(), welch_df(&a, &b)),
            _ => (
                (pooled * (1.0 / a.n as f64 + 1.0 / b.n as f64)).sqrt(),
                (a.n + b.n - 2) as f64,
            ),
        };
        let mut details = TTestDetails {
            n1: a.n,
            n2: Some(b.n),
            mean1: a.mean,
            mean2: Some(b.mean),
            sd1: a.sd(),
            sd2: Some(b.sd()),
            mu0: 0.0,
            statistic: f64::NAN,
            df,
            cohens_d: effect_size(a.mean - b.mean, pooled.sqrt()),
        };
        if is_degenerate_se(se) {
            warn!("{}: both samples are constant", test.label());
            details.df = f64::NAN;
            return Ok(TestResult::degenerate(
                test,
                config,
                PValueMethod::Undefined,
                details,
            ));
        }

        details.statistic = (a.mean - b.mean) / se;
        let (p, method) = self.t_tail(details.statistic, df, config.alternative);
        trace!("{}: t={} df={df} p={p}", test.label(), details.statistic);
        Ok(TestResult::new(test, p, config, method, details))
    }

    /// Two one-sided tests for `lower < mean(x) < upper`.
    ///
    /// `p_lower` tests `t = (mean - lower)/se` and `p_upper` tests
    /// `t = (upper - mean)/se`, both as upper-tail (`Greater`) tests at `df = n - 1`.
    /// The overall p-value is the larger of the two, so `significant` equals
    /// `details.equivalent`. `config.alternative` is ignored.
    pub fn equivalence_test(
        &self,
        x: &[f64],
        lower: f64,
        upper: f64,
        config: &TestConfig,
    ) -> Result<TestResult<EquivalenceDetails>> {
        config.validate()?;
        check_bounds(lower, upper)?;
        let test = TestKind::Equivalence;
        if !self.admit(test, x, 2)? {
            return Ok(TestResult::insufficient(
                test,
                config,
                EquivalenceDetails::undefined(x.len(), lower, upper),
            )
            .with_alternative(Alternative::Greater));
        }

        let m = Moments::of(x);
        let se = m.se2().sqrt();
        Ok(self.tost(test, m.n, m.mean, m.sd(), se, (m.n - 1) as f64, lower, upper, config))
    }

    /// Welch-based TOST for `lower < mean(x) - mean(y) < upper`. `n` is the total of
    /// both samples and `sd` is undefined.
    pub fn equivalence_two_sample(
        &self,
        x: &[f64],
        y: &[f64],
        lower: f64,
        upper: f64,
        config: &TestConfig,
    ) -> Result<TestResult<EquivalenceDetails>> {
        config.validate()?;
        check_bounds(lower, upper)?;
        let test = TestKind::TwoSampleEquivalence;
        if !(self.admit(test, x, 2)? && self.admit(test, y, 2)?) {
            return Ok(TestResult::insufficient(
                test,
                config,
                EquivalenceDetails::undefined(x.len() + y.len(), lower, upper),
            )
            .with_alternative(Alternative::Greater));
        }

        let (a, b) = (Moments::of(x), Moments::of(y));
        let se = (a.se2() + b.se2()).sqrt();
        Ok(self.tost(
            test,
            a.n + b.n,
            a.mean - b.mean,
            f64::NAN,
            se,
            welch_df(&a, &b),
            lower,
            upper,
            config,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    fn tost(
        &self,
        test: TestKind,
        n: usize,
        estimate: f64,
        sd: f64,
        se: f64,
        df: f64,
        lower: f64,
        upper: f64,
        config: &TestConfig,
    ) -> TestResult<EquivalenceDetails> {
        let mut details = EquivalenceDetails {
            n,
            mean: estimate,
            sd,
            se,
            ..EquivalenceDetails::undefined(n, lower, upper)
        };
        if is_degenerate_se(se) {
            warn!("{}: zero standard error, no test possible", test.label());
            details.df = f64::NAN;
            return TestResult::degenerate(test, config, PValueMethod::Undefined, details)
                .with_alternative(Alternative::Greater);
        }

        details.df = df;
        details.t_lower = (estimate - lower) / se;
        details.t_upper = (upper - estimate) / se;
        let (p_lower, method) = self.t_tail(details.t_lower, df, Alternative::Greater);
        let (p_upper, _) = self.t_tail(details.t_upper, df, Alternative::Greater);
        details.p_lower = p_lower;
        details.p_upper = p_upper;
        details.equivalent = p_lower < config.alpha && p_upper < config.alpha;
        trace!(
            "{}: t_lower={} p_lower={p_lower} t_upper={} p_upper={p_upper}",
            test.label(),
            details.t_lower,
            details.t_upper
        );

        TestResult::new(test, p_lower.max(p_upper), config, method, details)
            .with_alternative(Alternative::Greater)
    }
}
