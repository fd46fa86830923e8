//! Preset configurations
//!
//! Presets provide complete default analysis settings for common use cases.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI: shallow descent, few global rounds
    ///
    /// - max_depth=4, max_rounds=3, loop_max_iterations=16
    Fast,

    /// Development default
    ///
    /// - max_depth=16, max_rounds=10, loop_max_iterations=64
    #[default]
    Balanced,

    /// Audit: deep descent, generous fixpoint limits
    ///
    /// - max_depth=64, max_rounds=50, loop_max_iterations=512
    Thorough,
}

impl Preset {
    /// Parse preset from string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
