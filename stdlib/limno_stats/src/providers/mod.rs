//! Optional high-precision distribution providers and their registry.
//!
//! Each provider family is resolved at most once per registry: the first access runs
//! the family's loader, and the outcome (a provider or "unavailable") is cached for the
//! lifetime of the registry. A failed load is never retried. Callers never see a
//! provider failure; the engine falls back to the closed-form approximations in
//! [`crate::distributions`].

#[cfg(feature = "exact-rank")]
pub mod signed_rank;
#[cfg(feature = "pvalue")]
pub mod statrs_backend;

use std::fmt;
use std::sync::{Arc, OnceLock};

use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::Alternative;
use crate::error::ProviderError;

/// Student-t cumulative distribution function.
pub trait StudentTCdf: Send + Sync {
    fn name(&self) -> &str;
    /// `P(T ≤ x)` with `df` degrees of freedom; `df` may be fractional.
    fn cdf(&self, x: f64, df: f64) -> f64;
}

/// Chi-square cumulative distribution function.
pub trait ChiSquareCdf: Send + Sync {
    fn name(&self) -> &str;
    fn cdf(&self, x: f64, df: f64) -> f64;

    /// Upper tail `P(X > x)`. Override when the backend computes it directly, so far
    /// tails keep their precision.
    fn sf(&self, x: f64, df: f64) -> f64 {
        1.0 - self.cdf(x, df)
    }
}

/// Binomial cumulative distribution function.
pub trait BinomialCdf: Send + Sync {
    fn name(&self) -> &str;
    /// `P(X ≤ k)` for `X ~ Bin(n, p)`.
    fn cdf(&self, k: u64, n: u64, p: f64) -> f64;
}

/// Outcome reported by a [`SignedRankProvider`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignedRankOutcome {
    pub statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub rejected: bool,
}

/// One-sample Wilcoxon signed-rank implementation.
///
/// Receives the non-zero differences from the hypothesised location. Returning an
/// error routes the engine to its normal-approximation fallback.
pub trait SignedRankProvider: Send + Sync {
    fn name(&self) -> &str;
    fn signed_rank(
        &self,
        differences: &[f64],
        alpha: f64,
        alternative: Alternative,
    ) -> Result<SignedRankOutcome, ProviderError>;
}

/// Resolution state of a provider slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum ProviderState {
    Unresolved,
    Available,
    Unavailable,
}

type Loader<T> = Box<dyn Fn() -> Result<Arc<T>, ProviderError> + Send + Sync>;

/// Attempt-once cache for one provider family.
pub struct ProviderSlot<T: ?Sized> {
    family: &'static str,
    loader: Loader<T>,
    cell: OnceLock<Option<Arc<T>>>,
}

impl<T: ?Sized + 'static> ProviderSlot<T> {
    /// A slot that runs `loader` on first access.
    pub fn lazy<F>(family: &'static str, loader: F) -> Self
    where
        F: Fn() -> Result<Arc<T>, ProviderError> + Send + Sync + 'static,
    {
        Self {
            family,
            loader: Box::new(loader),
            cell: OnceLock::new(),
        }
    }

    /// A slot already resolved to `provider`.
    pub fn available(family: &'static str, provider: Arc<T>) -> Self {
        Self::resolved(family, Some(provider))
    }

    /// A slot already resolved to "unavailable".
    pub fn unavailable(family: &'static str) -> Self {
        Self::resolved(family, None)
    }

    fn resolved(family: &'static str, value: Option<Arc<T>>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(value);
        Self {
            family,
            loader: Box::new(never_loaded::<T>),
            cell,
        }
    }

    /// Resolves the slot if needed and returns the provider when available.
    pub fn get(&self) -> Option<&Arc<T>> {
        self.cell
            .get_or_init(|| match (self.loader)() {
                Ok(provider) => {
                    debug!("{} provider resolved", self.family);
                    Some(provider)
                }
                Err(err) => {
                    debug!(
                        "{} provider unavailable, using local approximation: {err}",
                        self.family
                    );
                    None
                }
            })
            .as_ref()
    }

    pub fn state(&self) -> ProviderState {
        match self.cell.get() {
            None => ProviderState::Unresolved,
            Some(Some(_)) => ProviderState::Available,
            Some(None) => ProviderState::Unavailable,
        }
    }

    pub fn family(&self) -> &'static str {
        self.family
    }
}

fn never_loaded<T: ?Sized + 'static>() -> Result<Arc<T>, ProviderError> {
    Err(ProviderError::Construction("slot was pre-resolved".into()))
}

impl<T: ?Sized + 'static> fmt::Debug for ProviderSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSlot")
            .field("family", &self.family)
            .field("state", &self.state())
            .finish()
    }
}

/// Snapshot of every slot's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProviderStatus {
    pub student_t: ProviderState,
    pub chi_square: ProviderState,
    pub binomial: ProviderState,
    pub signed_rank: ProviderState,
}

impl ProviderStatus {
    pub fn all_unavailable(&self) -> bool {
        [
            self.student_t,
            self.chi_square,
            self.binomial,
            self.signed_rank,
        ]
        .iter()
        .all(|s| *s == ProviderState::Unavailable)
    }
}

const STUDENT_T: &str = "student-t";
const CHI_SQUARE: &str = "chi-square";
const BINOMIAL: &str = "binomial";
const SIGNED_RANK: &str = "signed-rank";

/// The set of provider slots an engine consults.
#[derive(Debug)]
pub struct ProviderRegistry {
    student_t: ProviderSlot<dyn StudentTCdf>,
    chi_square: ProviderSlot<dyn ChiSquareCdf>,
    binomial: ProviderSlot<dyn BinomialCdf>,
    signed_rank: ProviderSlot<dyn SignedRankProvider>,
}

static GLOBAL: OnceLock<Arc<ProviderRegistry>> = OnceLock::new();

impl ProviderRegistry {
    /// Slots backed by the providers compiled into this build, resolved lazily.
    pub fn detect() -> Self {
        Self {
            student_t: ProviderSlot::lazy(STUDENT_T, load_student_t),
            chi_square: ProviderSlot::lazy(CHI_SQUARE, load_chi_square),
            binomial: ProviderSlot::lazy(BINOMIAL, load_binomial),
            signed_rank: ProviderSlot::lazy(SIGNED_RANK, load_signed_rank),
        }
    }

    /// Every family unavailable: the engine runs on local approximations only.
    pub fn none() -> Self {
        Self {
            student_t: ProviderSlot::unavailable(STUDENT_T),
            chi_square: ProviderSlot::unavailable(CHI_SQUARE),
            binomial: ProviderSlot::unavailable(BINOMIAL),
            signed_rank: ProviderSlot::unavailable(SIGNED_RANK),
        }
    }

    pub fn builder() -> ProviderRegistryBuilder {
        ProviderRegistryBuilder::default()
    }

    /// Process-wide registry built by [`ProviderRegistry::detect`].
    pub fn global() -> Arc<ProviderRegistry> {
        GLOBAL
            .get_or_init(|| Arc::new(ProviderRegistry::detect()))
            .clone()
    }

    /// Resolves every slot now so later test calls never run a loader.
    pub fn resolve_all(&self) -> ProviderStatus {
        self.student_t.get();
        self.chi_square.get();
        self.binomial.get();
        self.signed_rank.get();
        self.status()
    }

    pub fn status(&self) -> ProviderStatus {
        ProviderStatus {
            student_t: self.student_t.state(),
            chi_square: self.chi_square.state(),
            binomial: self.binomial.state(),
            signed_rank: self.signed_rank.state(),
        }
    }

    pub fn student_t(&self) -> Option<&dyn StudentTCdf> {
        self.student_t.get().map(|p| p.as_ref())
    }

    pub fn chi_square(&self) -> Option<&dyn ChiSquareCdf> {
        self.chi_square.get().map(|p| p.as_ref())
    }

    pub fn binomial(&self) -> Option<&dyn BinomialCdf> {
        self.binomial.get().map(|p| p.as_ref())
    }

    pub fn signed_rank(&self) -> Option<&dyn SignedRankProvider> {
        self.signed_rank.get().map(|p| p.as_ref())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::detect()
    }
}

enum Choice<T: ?Sized> {
    Detect,
    Disabled,
    Injected(Arc<T>),
}

impl<T: ?Sized> Default for Choice<T> {
    fn default() -> Self {
        Choice::Detect
    }
}

impl<T: ?Sized + 'static> Choice<T> {
    fn into_slot<F>(self, family: &'static str, loader: F) -> ProviderSlot<T>
    where
        F: Fn() -> Result<Arc<T>, ProviderError> + Send + Sync + 'static,
    {
        match self {
            Choice::Detect => ProviderSlot::lazy(family, loader),
            Choice::Disabled => ProviderSlot::unavailable(family),
            Choice::Injected(p) => ProviderSlot::available(family, p),
        }
    }
}

/// Per-family overrides on top of [`ProviderRegistry::detect`].
#[derive(Default)]
pub struct ProviderRegistryBuilder {
    student_t: Choice<dyn StudentTCdf>,
    chi_square: Choice<dyn ChiSquareCdf>,
    binomial: Choice<dyn BinomialCdf>,
    signed_rank: Choice<dyn SignedRankProvider>,
}

impl ProviderRegistryBuilder {
    pub fn student_t(mut self, provider: Arc<dyn StudentTCdf>) -> Self {
        self.student_t = Choice::Injected(provider);
        self
    }

    pub fn chi_square(mut self, provider: Arc<dyn ChiSquareCdf>) -> Self {
        self.chi_square = Choice::Injected(provider);
        self
    }

    pub fn binomial(mut self, provider: Arc<dyn BinomialCdf>) -> Self {
        self.binomial = Choice::Injected(provider);
        self
    }

    pub fn signed_rank(mut self, provider: Arc<dyn SignedRankProvider>) -> Self {
        self.signed_rank = Choice::Injected(provider);
        self
    }

    pub fn without_student_t(mut self) -> Self {
        self.student_t = Choice::Disabled;
        self
    }

    pub fn without_chi_square(mut self) -> Self {
        self.chi_square = Choice::Disabled;
        self
    }

    pub fn without_binomial(mut self) -> Self {
        self.binomial = Choice::Disabled;
        self
    }

    pub fn without_signed_rank(mut self) -> Self {
        self.signed_rank = Choice::Disabled;
        self
    }

    pub fn build(self) -> ProviderRegistry {
        ProviderRegistry {
            student_t: self.student_t.into_slot(STUDENT_T, load_student_t),
            chi_square: self.chi_square.into_slot(CHI_SQUARE, load_chi_square),
            binomial: self.binomial.into_slot(BINOMIAL, load_binomial),
            signed_rank: self.signed_rank.into_slot(SIGNED_RANK, load_signed_rank),
        }
    }
}

#[cfg(feature = "pvalue")]
fn load_student_t() -> Result<Arc<dyn StudentTCdf>, ProviderError> {
    statrs_backend::probe()?;
    Ok(Arc::new(statrs_backend::StatrsStudentT))
}

#[cfg(not(feature = "pvalue"))]
fn load_student_t() -> Result<Arc<dyn StudentTCdf>, ProviderError> {
    Err(ProviderError::NotCompiled("pvalue"))
}

#[cfg(feature = "pvalue")]
fn load_chi_square() -> Result<Arc<dyn ChiSquareCdf>, ProviderError> {
    statrs_backend::probe()?;
    Ok(Arc::new(statrs_backend::StatrsChiSquare))
}

#[cfg(not(feature = "pvalue"))]
fn load_chi_square() -> Result<Arc<dyn ChiSquareCdf>, ProviderError> {
    Err(ProviderError::NotCompiled("pvalue"))
}

#[cfg(feature = "pvalue")]
fn load_binomial() -> Result<Arc<dyn BinomialCdf>, ProviderError> {
    statrs_backend::probe()?;
    Ok(Arc::new(statrs_backend::StatrsBinomial))
}

#[cfg(not(feature = "pvalue"))]
fn load_binomial() -> Result<Arc<dyn BinomialCdf>, ProviderError> {
    Err(ProviderError::NotCompiled("pvalue"))
}

#[cfg(feature = "exact-rank")]
fn load_signed_rank() -> Result<Arc<dyn SignedRankProvider>, ProviderError> {
    Ok(Arc::new(signed_rank::ExactSignedRank::default()))
}

#[cfg(not(feature = "exact-rank"))]
fn load_signed_rank() -> Result<Arc<dyn SignedRankProvider>, ProviderError> {
    Err(ProviderError::NotCompiled("exact-rank"))
}
