/*
 * Taint Analysis Ports
 *
 * Boundary between the engine and its drivers (CLI, tests, embedding
 * tools). Drivers build a `TaintAnalysisRequest` and call a
 * `TaintAnalysisService`; they never touch the analysis context directly.
 *
 * Architecture:
 * ```
 *   driver (CLI, tests)
 *          |
 *          v
 *   TaintAnalysisService       <- input port
 *          |
 *          v
 *   application (catalog merge, config resolution)
 *          |
 *          v
 *   infrastructure (InterproceduralTaintAnalyzer)
 * ```
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::Diagnostic;
use super::infrastructure::{AnalysisStats, AnalysisWarning, TaintError};
use crate::config::{AnalysisConfig, ConfigError, Preset};
use crate::shared::models::Program;

// ============================================================================
// DTOs (Data Transfer Objects)
// ============================================================================

/// Request for taint analysis of one program
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaintAnalysisRequest {
    /// Program to analyze
    pub program: Program,

    /// User catalog (YAML) merged over the built-in catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_yaml: Option<String>,

    /// Preset replacing the service's base settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,

    /// Full settings; wins over `preset`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<AnalysisConfig>,
}

impl TaintAnalysisRequest {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            catalog_yaml: None,
            preset: None,
            config: None,
        }
    }

    pub fn with_catalog_yaml(mut self, yaml: impl Into<String>) -> Self {
        self.catalog_yaml = Some(yaml.into());
        self
    }

    pub fn with_preset(mut self, preset: Preset) -> Self {
        self.preset = Some(preset);
        self
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// Result of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaintAnalysisResponse {
    /// Unique id of this run
    pub run_id: Uuid,

    /// Diagnostics in emission order
    pub diagnostics: Vec<Diagnostic>,

    /// Recoverable problems (unresolved calls, cut recursion, limits)
    pub warnings: Vec<AnalysisWarning>,

    /// Analysis statistics
    pub stats: AnalysisStats,

    /// Settings the run actually used
    pub config: AnalysisConfig,
}

impl TaintAnalysisResponse {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn definite_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_definite()).count()
    }

    pub fn possible_count(&self) -> usize {
        self.diagnostics.len() - self.definite_count()
    }
}

// ============================================================================
// Input Port
// ============================================================================

/// Main input port for taint analysis
///
/// The analysis is CPU-bound and synchronous; independent programs are
/// analyzed in parallel by `analyze_batch`.
pub trait TaintAnalysisService: Send + Sync {
    /// Analyze one program
    fn analyze(
        &self,
        request: TaintAnalysisRequest,
    ) -> Result<TaintAnalysisResponse, TaintAnalysisError>;

    /// Analyze independent programs; results keep the request order
    fn analyze_batch(
        &self,
        requests: Vec<TaintAnalysisRequest>,
    ) -> Vec<Result<TaintAnalysisResponse, TaintAnalysisError>>;

    /// Qualified names of the catalog's sources
    fn supported_sources(&self) -> Vec<String>;

    /// Qualified names of the catalog's sinks
    fn supported_sinks(&self) -> Vec<String>;
}

// ============================================================================
// Error Types
// ============================================================================

/// Error type for taint analysis operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaintAnalysisError {
    pub kind: TaintErrorKind,
    pub message: String,
    pub context: Option<String>,
}

impl TaintAnalysisError {
    pub fn new(kind: TaintErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(TaintErrorKind::InvalidInput, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(TaintErrorKind::ConfigurationError, message)
    }

    pub fn analysis_failed(message: impl Into<String>) -> Self {
        Self::new(TaintErrorKind::AnalysisFailed, message)
    }
}

impl std::fmt::Display for TaintAnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, " (context: {})", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for TaintAnalysisError {}

impl From<ConfigError> for TaintAnalysisError {
    fn from(err: ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}

impl From<TaintError> for TaintAnalysisError {
    fn from(err: TaintError) -> Self {
        match err {
            TaintError::Configuration(inner) => inner.into(),
            TaintError::InvalidProgram(message) => Self::invalid_input(message),
            other => Self::analysis_failed(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaintErrorKind {
    InvalidInput,
    ConfigurationError,
    AnalysisFailed,
}
