//! Hypothesis tests for lake-monitoring time series.
//!
//! Two-sided Welch t-test comparing two stations, with providers resolved once up
//! front (example ignored in doctest):
//! ```ignore
//! use limno_stats::{HypothesisEngine, TestConfig};
//! let engine = HypothesisEngine::new();
//! let north = [7.1, 7.4, 6.9, 7.2, 7.0];
//! let south = [6.2, 6.5, 6.4, 6.1, 6.6];
//! let res = engine.t_test_welch(&north, &south, &TestConfig::default())?;
//! println!("t = {:.3}, p = {}", res.details.statistic, res.display_p_value(3));
//! ```

mod config;
mod descriptive;
pub mod distributions;
mod engine;
mod error;
pub mod exact;
mod nonparametric;
mod parametric;
pub mod providers;
pub mod ranks;
mod result;
mod stable;

pub use config::*;
pub use descriptive::{mean, median, sd, variance};
pub use distributions::{binom_cdf, binom_pmf, log_choose, normal_cdf};
pub use engine::HypothesisEngine;
pub use error::*;
pub use providers::{
    BinomialCdf, ChiSquareCdf, ProviderRegistry, ProviderRegistryBuilder, ProviderState,
    ProviderStatus, SignedRankOutcome, SignedRankProvider, StudentTCdf,
};
pub use ranks::{rank_with_ties, Ranking};
pub use result::*;
pub use stable::*;
