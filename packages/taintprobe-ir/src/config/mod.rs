//! Configuration System
//!
//! Two tiers:
//! - Level 1: Preset - `AnalysisConfig::from_preset(Preset::Fast)`
//! - Level 2: YAML catalog file - user sources, propagators, filters and
//!   sinks, plus optional analysis overrides
//!
//! # Examples
//!
//! ```rust,ignore
//! use taintprobe_ir::config::{AnalysisConfig, CatalogConfig, Preset};
//!
//! // Level 1: preset with a tweak
//! let config = AnalysisConfig::from_preset(Preset::Balanced).max_depth(32);
//! config.validate()?;
//!
//! // Level 2: catalog file
//! let catalog = CatalogConfig::from_yaml_file("team-sinks.yaml")?;
//! let config = catalog.analysis_config(&config)?;
//! ```
//!
//! # Features
//!
//! - **Runtime Validation**: range checks on every setting
//! - **Versioned Schema**: YAML v1, unknown fields rejected
//! - **Fail Fast**: a malformed or conflicting entry rejects the whole file

pub mod analysis_config;
pub mod catalog_config;
pub mod error;
pub mod io;
pub mod preset;

// Re-exports
pub use analysis_config::{AnalysisConfig, AnalysisOverrides, TernaryNarrowing, UnknownPolicy};
pub use catalog_config::CatalogConfig;
pub use error::{ConfigError, ConfigResult};
pub use io::{CatalogFileV1, PositionSpec, SUPPORTED_VERSIONS};
pub use preset::Preset;
