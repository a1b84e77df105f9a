//! Per-call test configuration and engine-wide policy knobs.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatsError};

/// Significance threshold used when none is given.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Largest smaller-group size for which the exact Mann-Whitney distribution is used
/// under [`MannWhitneyMethod::Auto`].
pub const DEFAULT_EXACT_THRESHOLD: usize = 8;

/// Direction of the alternative hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Alternative {
    #[default]
    TwoSided,
    Greater,
    Less,
}

impl Alternative {
    pub fn as_str(&self) -> &'static str {
        match self {
            Alternative::TwoSided => "two-sided",
            Alternative::Greater => "greater",
            Alternative::Less => "less",
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alternative {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "two-sided" => Ok(Alternative::TwoSided),
            "greater" => Ok(Alternative::Greater),
            "less" => Ok(Alternative::Less),
            other => Err(StatsError::UnknownAlternative(other.to_string())),
        }
    }
}

/// Per-invocation settings shared by every test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct TestConfig {
    pub alpha: f64,
    pub alternative: Alternative,
}

impl TestConfig {
    pub fn new(alpha: f64, alternative: Alternative) -> Result<Self> {
        let config = Self { alpha, alternative };
        config.validate()?;
        Ok(config)
    }

    pub fn two_sided(alpha: f64) -> Result<Self> {
        Self::new(alpha, Alternative::TwoSided)
    }

    pub fn with_alpha(self, alpha: f64) -> Result<Self> {
        Self::new(alpha, self.alternative)
    }

    pub fn with_alternative(self, alternative: Alternative) -> Self {
        Self {
            alternative,
            ..self
        }
    }

    /// `alpha` must lie strictly inside (0, 1). NaN is rejected.
    pub fn validate(&self) -> Result<()> {
        if self.alpha > 0.0 && self.alpha < 1.0 {
            Ok(())
        } else {
            Err(StatsError::InvalidAlpha(self.alpha))
        }
    }
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            alternative: Alternative::TwoSided,
        }
    }
}

/// How invalid samples (too short, non-finite, mismatched pairs) are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum InputPolicy {
    /// Return a result whose numeric fields are `NaN` and `significant == false`.
    /// Suited to dashboards that render many parameters at once.
    #[default]
    Lenient,
    /// Return a descriptive [`StatsError`].
    Strict,
}

/// Null distribution used by the Mann-Whitney U test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum MannWhitneyMethod {
    /// Exact when there are no ties and the smaller group is at most
    /// `exact_threshold` observations, normal approximation otherwise.
    #[default]
    Auto,
    /// Exact whenever there are no ties.
    Exact,
    /// Always the tie-corrected normal approximation.
    Asymptotic,
}

/// Engine-wide policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EngineConfig {
    pub input_policy: InputPolicy,
    pub mann_whitney_method: MannWhitneyMethod,
    pub exact_threshold: usize,
}

impl EngineConfig {
    pub fn strict() -> Self {
        Self {
            input_policy: InputPolicy::Strict,
            ..Self::default()
        }
    }

    pub fn with_input_policy(mut self, policy: InputPolicy) -> Self {
        self.input_policy = policy;
        self
    }

    pub fn with_mann_whitney_method(mut self, method: MannWhitneyMethod) -> Self {
        self.mann_whitney_method = method;
        self
    }

    pub fn with_exact_threshold(mut self, threshold: usize) -> Self {
        self.exact_threshold = threshold;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            input_policy: InputPolicy::Lenient,
            mann_whitney_method: MannWhitneyMethod::Auto,
            exact_threshold: DEFAULT_EXACT_THRESHOLD,
        }
    }
}
