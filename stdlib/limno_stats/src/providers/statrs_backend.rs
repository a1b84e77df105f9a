//! Providers backed by `statrs` (enabled by the `pvalue` feature).

use statrs::distribution::{Binomial, ChiSquared, ContinuousCDF, DiscreteCDF, StudentsT};

use super::{BinomialCdf, ChiSquareCdf, StudentTCdf};
use crate::error::ProviderError;

/// Checks that the distribution constructors work before a provider is handed out.
pub(super) fn probe() -> Result<(), ProviderError> {
    StudentsT::new(0.0, 1.0, 1.0).map_err(|e| ProviderError::Construction(e.to_string()))?;
    ChiSquared::new(1.0).map_err(|e| ProviderError::Construction(e.to_string()))?;
    Binomial::new(0.5, 1).map_err(|e| ProviderError::Construction(e.to_string()))?;
    Ok(())
}

/// Student-t CDF. Invalid degrees of freedom yield `NaN`, which the engine treats as
/// "fall back to the normal approximation for this call".
#[derive(Debug, Clone, Copy, Default)]
pub struct StatrsStudentT;

impl StudentTCdf for StatrsStudentT {
    fn name(&self) -> &str {
        "statrs::StudentsT"
    }

    fn cdf(&self, x: f64, df: f64) -> f64 {
        StudentsT::new(0.0, 1.0, df)
            .map(|dist| dist.cdf(x))
            .unwrap_or(f64::NAN)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatrsChiSquare;

impl ChiSquareCdf for StatrsChiSquare {
    fn name(&self) -> &str {
        "statrs::ChiSquared"
    }

    fn cdf(&self, x: f64, df: f64) -> f64 {
        ChiSquared::new(df)
            .map(|dist| dist.cdf(x))
            .unwrap_or(f64::NAN)
    }

    fn sf(&self, x: f64, df: f64) -> f64 {
        ChiSquared::new(df)
            .map(|dist| dist.sf(x))
            .unwrap_or(f64::NAN)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatrsBinomial;

impl BinomialCdf for StatrsBinomial {
    fn name(&self) -> &str {
        "statrs::Binomial"
    }

    fn cdf(&self, k: u64, n: u64, p: f64) -> f64 {
        Binomial::new(p, n)
            .map(|dist| dist.cdf(k))
            .unwrap_or(f64::NAN)
    }
}
