//! Structured results returned by every test.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{Alternative, TestConfig};
use crate::distributions::clip_probability;

/// Which test produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum TestKind {
    OneSampleT,
    WelchT,
    StudentT,
    PairedT,
    Equivalence,
    TwoSampleEquivalence,
    WilcoxonSignedRank,
    SignTest,
    MannWhitneyU,
    MoodMedian,
}

impl TestKind {
    pub fn label(&self) -> &'static str {
        match self {
            TestKind::OneSampleT => "one-sample t-test",
            TestKind::WelchT => "Welch two-sample t-test",
            TestKind::StudentT => "Student two-sample t-test",
            TestKind::PairedT => "paired t-test",
            TestKind::Equivalence => "TOST equivalence test",
            TestKind::TwoSampleEquivalence => "two-sample TOST equivalence test",
            TestKind::WilcoxonSignedRank => "Wilcoxon signed-rank test",
            TestKind::SignTest => "sign test",
            TestKind::MannWhitneyU => "Mann-Whitney U test",
            TestKind::MoodMedian => "Mood's median test",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a p-value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum PValueMethod {
    /// Student-t tail from the t-CDF provider.
    StudentT,
    /// Standard normal tail (closed-form erf approximation).
    NormalApproximation,
    /// Chi-square tail from the chi-square provider.
    ChiSquare,
    /// Exact binomial tail.
    ExactBinomial,
    /// Exact permutation distribution of a rank statistic.
    ExactRankDistribution,
    /// Reported by the signed-rank provider.
    RankProvider,
    /// No p-value could be computed (invalid input).
    Undefined,
}

/// Outcome of one hypothesis test.
///
/// `p_value` is always inside `[0, 1]` or `NaN`; `significant` is `p_value < alpha`
/// and therefore `false` whenever the p-value is `NaN`.
///
/// Results are serialise-only: `NaN` fields are written as `null`, which an `f64`
/// cannot be read back from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TestResult<D> {
    pub test: TestKind,
    pub p_value: f64,
    pub alpha: f64,
    pub alternative: Alternative,
    pub significant: bool,
    pub method: PValueMethod,
    /// Set when the statistic is numerically undefined (zero spread, empty margin,
    /// no usable observations) and the p-value was fixed at 1.
    pub degenerate: bool,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub details: D,
}

impl<D> TestResult<D> {
    pub(crate) fn new(
        test: TestKind,
        p_value: f64,
        config: &TestConfig,
        method: PValueMethod,
        details: D,
    ) -> Self {
        let p_value = clip_probability(p_value);
        Self {
            test,
            p_value,
            alpha: config.alpha,
            alternative: config.alternative,
            significant: p_value < config.alpha,
            method,
            degenerate: false,
            details,
        }
    }

    /// p = 1, flagged degenerate.
    pub(crate) fn degenerate(
        test: TestKind,
        config: &TestConfig,
        method: PValueMethod,
        details: D,
    ) -> Self {
        Self {
            degenerate: true,
            ..Self::new(test, 1.0, config, method, details)
        }
    }

    /// `NaN` p-value for input that could not be tested.
    pub(crate) fn insufficient(test: TestKind, config: &TestConfig, details: D) -> Self {
        Self::new(test, f64::NAN, config, PValueMethod::Undefined, details)
    }

    pub(crate) fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    /// True when the input could not be tested at all.
    pub fn is_insufficient(&self) -> bool {
        self.p_value.is_nan()
    }

    /// Renders the p-value for display: `"insufficient data"` for `NaN`, `"< 0.001"`
    /// style below the display floor for `decimals`, fixed-point otherwise.
    pub fn display_p_value(&self, decimals: usize) -> String {
        if self.p_value.is_nan() {
            return "insufficient data".to_string();
        }
        let floor = 10f64.powi(-(decimals as i32));
        if self.p_value < floor {
            format!("< {floor:.decimals$}")
        } else {
            format!("{:.decimals$}", self.p_value)
        }
    }
}

/// One- and two-sample t-test diagnostics. Two-sample fields are `None` for
/// one-sample and paired tests.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TTestDetails {
    pub n1: usize,
    pub n2: Option<usize>,
    pub mean1: f64,
    pub mean2: Option<f64>,
    pub sd1: f64,
    pub sd2: Option<f64>,
    pub mu0: f64,
    pub statistic: f64,
    pub df: f64,
    pub cohens_d: f64,
}

/// TOST diagnostics. For the two-sample variant `mean` is the difference of means
/// and `sd` is `NaN`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EquivalenceDetails {
    pub n: usize,
    pub mean: f64,
    pub sd: f64,
    pub se: f64,
    pub df: f64,
    pub lower: f64,
    pub upper: f64,
    pub t_lower: f64,
    pub t_upper: f64,
    pub p_lower: f64,
    pub p_upper: f64,
    pub equivalent: bool,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SignedRankDetails {
    /// Non-zero differences actually ranked.
    pub n: usize,
    /// Differences equal to zero, excluded before ranking.
    pub n_zero: usize,
    pub w_plus: f64,
    pub w_minus: f64,
    pub statistic: f64,
    /// Normal deviate, present when the fallback approximation produced the p-value.
    pub z: Option<f64>,
    pub mean: f64,
    pub variance: f64,
    /// Sizes of tie groups with more than one member.
    pub tie_groups: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SignTestDetails {
    pub n: usize,
    pub n_positive: usize,
    pub n_negative: usize,
    pub n_zero: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MannWhitneyDetails {
    pub n1: usize,
    pub n2: usize,
    pub rank_sum1: f64,
    pub u1: f64,
    pub u2: f64,
    /// `min(u1, u2)`.
    pub u: f64,
    /// Normal deviate, present for the asymptotic method.
    pub z: Option<f64>,
    pub mean: f64,
    /// Tie-corrected variance of U.
    pub variance: f64,
    pub tie_groups: Vec<usize>,
}

/// Mood's median test contingency table. Rows are (≤ median, > median), columns
/// are (first sample, second sample).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MoodMedianDetails {
    pub n1: usize,
    pub n2: usize,
    pub grand_median: f64,
    pub table: [[usize; 2]; 2],
    pub expected: [[f64; 2]; 2],
    pub chi2: f64,
    pub df: usize,
}
