//! Error types for the hypothesis-testing engine.

use thiserror::Error;

/// Errors surfaced to callers of the engine.
///
/// Data problems (`InsufficientData`, `NonFiniteInput`, `LengthMismatch`) are only
/// returned under [`InputPolicy::Strict`](crate::InputPolicy::Strict); the lenient
/// policy turns them into `NaN` results instead. Configuration problems are always
/// returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("{test}: needs at least {required} observation(s), got {actual}")]
    InsufficientData {
        test: &'static str,
        required: usize,
        actual: usize,
    },
    #[error("{test}: non-finite value at index {index}")]
    NonFiniteInput { test: &'static str, index: usize },
    #[error("{test}: paired samples differ in length ({left} vs {right})")]
    LengthMismatch {
        test: &'static str,
        left: usize,
        right: usize,
    },
    #[error("alpha must lie in (0, 1), got {0}")]
    InvalidAlpha(f64),
    #[error("equivalence bounds must be finite with lower < upper, got [{lower}, {upper}]")]
    InvalidBounds { lower: f64, upper: f64 },
    #[error("parameter `{name}` must be finite, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("unknown alternative '{0}' (expected two-sided, greater or less)")]
    UnknownAlternative(String),
}

/// Failures while resolving or consulting an optional distribution provider.
///
/// Never returned from a test method: the engine logs these and falls back to its
/// local approximations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("provider not compiled in (enable the `{0}` feature)")]
    NotCompiled(&'static str),
    #[error("provider construction failed: {0}")]
    Construction(String),
    #[error("provider cannot handle this input: {0}")]
    Unsupported(String),
}

pub type Result<T, E = StatsError> = std::result::Result<T, E>;
