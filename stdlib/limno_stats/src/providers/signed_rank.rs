//! Exact one-sample Wilcoxon signed-rank provider (enabled by the `exact-rank` feature).

use super::{SignedRankOutcome, SignedRankProvider};
use crate::config::Alternative;
use crate::distributions::tail_p_value;
use crate::error::ProviderError;
use crate::exact::{signed_rank_frequencies, tails};
use crate::ranks::rank_with_ties;

/// Largest sample the exact distribution is enumerated for by default.
pub const DEFAULT_MAX_EXACT_N: usize = 50;

/// Exact null distribution of `W+` for tie-free samples.
///
/// Refuses tied absolute differences, zero differences and samples above `max_n`,
/// where the engine's tie-corrected normal approximation takes over.
#[derive(Debug, Clone, Copy)]
pub struct ExactSignedRank {
    pub max_n: usize,
}

impl Default for ExactSignedRank {
    fn default() -> Self {
        Self {
            max_n: DEFAULT_MAX_EXACT_N,
        }
    }
}

impl SignedRankProvider for ExactSignedRank {
    fn name(&self) -> &str {
        "exact-signed-rank"
    }

    fn signed_rank(
        &self,
        differences: &[f64],
        alpha: f64,
        alternative: Alternative,
    ) -> Result<SignedRankOutcome, ProviderError> {
        let n = differences.len();
        if n == 0 {
            return Err(ProviderError::Unsupported("no differences".into()));
        }
        if n > self.max_n {
            return Err(ProviderError::Unsupported(format!(
                "n = {n} exceeds exact limit {}",
                self.max_n
            )));
        }
        if differences.iter().any(|d| *d == 0.0 || !d.is_finite()) {
            return Err(ProviderError::Unsupported(
                "zero or non-finite difference".into(),
            ));
        }

        let abs: Vec<f64> = differences.iter().map(|d| d.abs()).collect();
        let ranking = rank_with_ties(&abs);
        if ranking.has_ties() {
            return Err(ProviderError::Unsupported(
                "tied absolute differences".into(),
            ));
        }

        let w_plus: f64 = differences
            .iter()
            .zip(&ranking.ranks)
            .filter(|(d, _)| **d > 0.0)
            .map(|(_, r)| *r)
            .sum();
        let total = (n * (n + 1) / 2) as f64;
        let w_minus = total - w_plus;

        let frequencies = signed_rank_frequencies(n);
        let (lower, upper) = tails(&frequencies, w_plus.round() as usize);
        let p_value = tail_p_value(lower, upper, alternative);
        let statistic = match alternative {
            Alternative::TwoSided => w_plus.min(w_minus),
            Alternative::Greater | Alternative::Less => w_plus,
        };

        Ok(SignedRankOutcome {
            statistic,
            p_value,
            alpha,
            rejected: p_value < alpha,
        })
    }
}
