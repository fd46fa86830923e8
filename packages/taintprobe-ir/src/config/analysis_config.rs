//! Analysis settings

use serde::{Deserialize, Serialize};

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;

/// How sinks treat operands whose taint could not be determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPolicy {
    /// Unknown counts as tainted; the diagnostic is marked `Possible`
    #[default]
    Conservative,
    /// Unknown counts as clean
    Permissive,
}

/// Precision of `cond ? a : b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TernaryNarrowing {
    /// Always join both arms
    Conservative,
    /// `v == lit ? v : ..` treats `v` as clean in the equal arm
    #[default]
    EqualityLiteral,
}

/// Taint analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Maximum interprocedural descent depth (1..=256)
    pub max_depth: usize,

    /// Maximum whole-program rounds for the global table fixpoint (1..=1000)
    pub max_rounds: usize,

    /// Maximum iterations of a loop body before giving up (1..=10000)
    pub loop_max_iterations: usize,

    /// Callee summary cache capacity (1..=1_000_000)
    pub summary_cache_size: usize,

    /// Sink behavior for Unknown operands
    #[serde(default)]
    pub unknown_policy: UnknownPolicy,

    /// Ternary precision
    #[serde(default)]
    pub ternary_narrowing: TernaryNarrowing,
}

impl AnalysisConfig {
    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Fast => Self {
                max_depth: 4,
                max_rounds: 3,
                loop_max_iterations: 16,
                summary_cache_size: 1_000,
                unknown_policy: UnknownPolicy::Conservative,
                ternary_narrowing: TernaryNarrowing::EqualityLiteral,
            },
            Preset::Balanced => Self {
                max_depth: 16,
                max_rounds: 10,
                loop_max_iterations: 64,
                summary_cache_size: 10_000,
                unknown_policy: UnknownPolicy::Conservative,
                ternary_narrowing: TernaryNarrowing::EqualityLiteral,
            },
            Preset::Thorough => Self {
                max_depth: 64,
                max_rounds: 50,
                loop_max_iterations: 512,
                summary_cache_size: 100_000,
                unknown_policy: UnknownPolicy::Conservative,
                ternary_narrowing: TernaryNarrowing::EqualityLiteral,
            },
        }
    }

    // Builder-style setters

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn loop_max_iterations(mut self, iterations: usize) -> Self {
        self.loop_max_iterations = iterations;
        self
    }

    pub fn summary_cache_size(mut self, size: usize) -> Self {
        self.summary_cache_size = size;
        self
    }

    pub fn unknown_policy(mut self, policy: UnknownPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    pub fn ternary_narrowing(mut self, narrowing: TernaryNarrowing) -> Self {
        self.ternary_narrowing = narrowing;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_depth == 0 || self.max_depth > 256 {
            return Err(ConfigError::range_with_hint(
                "max_depth",
                self.max_depth,
                1,
                256,
                "Callee descent depth must be at least 1",
            ));
        }

        if self.max_rounds == 0 || self.max_rounds > 1000 {
            return Err(ConfigError::range_with_hint(
                "max_rounds",
                self.max_rounds,
                1,
                1000,
                "The global table needs at least one round",
            ));
        }

        if self.loop_max_iterations == 0 || self.loop_max_iterations > 10000 {
            return Err(ConfigError::range_with_hint(
                "loop_max_iterations",
                self.loop_max_iterations,
                1,
                10000,
                "Loop iterations must be finite",
            ));
        }

        if self.summary_cache_size == 0 || self.summary_cache_size > 1_000_000 {
            return Err(ConfigError::range_with_hint(
                "summary_cache_size",
                self.summary_cache_size,
                1,
                1_000_000,
                "Summary cache must hold at least one entry",
            ));
        }

        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Balanced)
    }
}

/// Partial override of `AnalysisConfig` as written in catalog files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisOverrides {
    #[serde(default)]
    pub preset: Option<Preset>,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default)]
    pub max_rounds: Option<usize>,
    #[serde(default)]
    pub loop_max_iterations: Option<usize>,
    #[serde(default)]
    pub summary_cache_size: Option<usize>,
    #[serde(default)]
    pub unknown_policy: Option<UnknownPolicy>,
    #[serde(default)]
    pub ternary_narrowing: Option<TernaryNarrowing>,
}

impl AnalysisOverrides {
    /// Apply on top of `base` (or on top of the named preset) and validate
    pub fn apply(&self, base: &AnalysisConfig) -> ConfigResult<AnalysisConfig> {
        let mut config = match self.preset {
            Some(preset) => AnalysisConfig::from_preset(preset),
            None => base.clone(),
        };

        if let Some(v) = self.max_depth {
            config.max_depth = v;
        }
        if let Some(v) = self.max_rounds {
            config.max_rounds = v;
        }
        if let Some(v) = self.loop_max_iterations {
            config.loop_max_iterations = v;
        }
        if let Some(v) = self.summary_cache_size {
            config.summary_cache_size = v;
        }
        if let Some(v) = self.unknown_policy {
            config.unknown_policy = v;
        }
        if let Some(v) = self.ternary_narrowing {
            config.ternary_narrowing = v;
        }

        config.validate()?;
        Ok(config)
    }
}
