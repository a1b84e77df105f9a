//! The hypothesis-testing service object.
//!
//! [`HypothesisEngine`] is cheap to clone and holds no per-call state: a shared
//! [`ProviderRegistry`] and an [`EngineConfig`]. The tests themselves are implemented
//! in [`crate::parametric`] and [`crate::nonparametric`].

use std::sync::Arc;

use log::{debug, trace};

use crate::config::{Alternative, EngineConfig, InputPolicy};
use crate::descriptive::first_non_finite;
use crate::distributions::{binom_cdf, chi_square_df1_sf, normal_cdf, tail_p_value};
use crate::error::{Result, StatsError};
use crate::providers::{ProviderRegistry, ProviderStatus};
use crate::result::{PValueMethod, TestKind};

#[derive(Debug, Clone)]
pub struct HypothesisEngine {
    providers: Arc<ProviderRegistry>,
    config: EngineConfig,
}

impl HypothesisEngine {
    /// Engine on the process-wide registry. Providers are resolved here, so no test
    /// call ever runs a loader.
    pub fn new() -> Self {
        let providers = ProviderRegistry::global();
        providers.resolve_all();
        Self {
            providers,
            config: EngineConfig::default(),
        }
    }

    /// Engine on an injected registry. Slots that are still unresolved are resolved
    /// lazily on first use; call [`HypothesisEngine::warm_up`] to do it up front.
    pub fn with_registry(providers: Arc<ProviderRegistry>, config: EngineConfig) -> Self {
        Self { providers, config }
    }

    /// Engine with every optional provider forced absent.
    pub fn without_providers() -> Self {
        Self::with_registry(Arc::new(ProviderRegistry::none()), EngineConfig::default())
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn warm_up(&self) -> ProviderStatus {
        self.providers.resolve_all()
    }

    /// Checks a sample against the input policy. `Ok(false)` means the caller should
    /// return an undefined (`NaN`) result.
    pub(crate) fn admit(&self, test: TestKind, sample: &[f64], required: usize) -> Result<bool> {
        if sample.len() < required {
            return self.reject(StatsError::InsufficientData {
                test: test.label(),
                required,
                actual: sample.len(),
            });
        }
        match first_non_finite(sample) {
            Some(index) => self.reject(StatsError::NonFiniteInput {
                test: test.label(),
                index,
            }),
            None => Ok(true),
        }
    }

    pub(crate) fn admit_pair(&self, test: TestKind, x: &[f64], y: &[f64]) -> Result<bool> {
        if x.len() != y.len() {
            return self.reject(StatsError::LengthMismatch {
                test: test.label(),
                left: x.len(),
                right: y.len(),
            });
        }
        Ok(true)
    }

    fn reject(&self, problem: StatsError) -> Result<bool> {
        match self.config.input_policy {
            InputPolicy::Strict => Err(problem),
            InputPolicy::Lenient => {
                debug!("{problem}; reporting undefined result");
                Ok(false)
            }
        }
    }

    /// Tail probability of a t statistic. Uses the Student-t provider when it yields a
    /// finite answer, the standard normal otherwise.
    pub(crate) fn t_tail(&self, t: f64, df: f64, alternative: Alternative) -> (f64, PValueMethod) {
        if let Some(provider) = self.providers.student_t() {
            let lower = provider.cdf(t, df);
            let upper = provider.cdf(-t, df);
            if lower.is_finite() && upper.is_finite() {
                return (
                    tail_p_value(lower, upper, alternative),
                    PValueMethod::StudentT,
                );
            }
            trace!("{} returned non-finite cdf at t={t}, df={df}", provider.name());
        }
        (normal_tail(t, alternative), PValueMethod::NormalApproximation)
    }

    /// Upper tail of a chi-square statistic with one degree of freedom.
    pub(crate) fn chi_square_sf(&self, chi2: f64) -> (f64, PValueMethod) {
        if let Some(provider) = self.providers.chi_square() {
            let sf = provider.sf(chi2, 1.0);
            if sf.is_finite() {
                return (sf, PValueMethod::ChiSquare);
            }
        }
        (chi_square_df1_sf(chi2), PValueMethod::NormalApproximation)
    }

    /// `P(X <= k)` for `X ~ Binomial(n, 1/2)`.
    pub(crate) fn fair_coin_cdf(&self, k: usize, n: usize) -> f64 {
        if let Some(provider) = self.providers.binomial() {
            let cdf = provider.cdf(k as u64, n as u64, 0.5);
            if cdf.is_finite() {
                return cdf;
            }
        }
        binom_cdf(n, k, 0.5)
    }
}

impl Default for HypothesisEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Normal tail probability for `z` under `alternative`.
pub(crate) fn normal_tail(z: f64, alternative: Alternative) -> f64 {
    tail_p_value(normal_cdf(z), normal_cdf(-z), alternative)
}

/// Standardises a discrete statistic with a 0.5 continuity correction toward its mean.
/// Two-sided shifts by the sign of the deviation, `Greater` by +0.5, `Less` by -0.5.
pub(crate) fn continuity_z(statistic: f64, mean: f64, variance: f64, alternative: Alternative) -> f64 {
    let deviation = statistic - mean;
    let correction = match alternative {
        Alternative::TwoSided if deviation > 0.0 => 0.5,
        Alternative::TwoSided if deviation < 0.0 => -0.5,
        Alternative::TwoSided => 0.0,
        Alternative::Greater => 0.5,
        Alternative::Less => -0.5,
    };
    (deviation - correction) / variance.sqrt()
}
