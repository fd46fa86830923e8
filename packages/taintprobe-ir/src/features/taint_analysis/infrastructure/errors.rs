/*
 * Taint Analysis Errors
 *
 * Fatal errors stop the analysis of one program (bad catalog, malformed
 * program). Recoverable ones degrade to Unknown taint and are kept as
 * `AnalysisWarning`s next to the diagnostics.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::ConfigError;
use crate::shared::models::Span;

#[derive(Debug, Error)]
pub enum TaintError {
    /// Catalog or settings failed to load
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Program violates a structural rule (duplicate definitions)
    #[error("Invalid program: {0}")]
    InvalidProgram(String),

    /// No catalog entry and no definition for the callee
    #[error("Unresolved call to '{callee}'")]
    UnresolvedCall { callee: String },

    /// Read of an identifier with no declaration in scope
    #[error("Unknown variable '{name}'")]
    UnknownVariable { name: String },

    /// Callee already on the active call stack
    #[error("Recursive call cut: {function} -> {}", cycle.join(" -> "))]
    RecursionCut { function: String, cycle: Vec<String> },

    /// Interprocedural descent too deep
    #[error("Max depth exceeded for {function}: {depth} > {max_depth}")]
    AnalysisLimitExceeded {
        function: String,
        depth: usize,
        max_depth: usize,
    },

    /// Loop body did not stabilize
    #[error("Loop did not stabilize after {iterations} iterations")]
    LoopLimitExceeded { iterations: usize },

    /// Global table still changing after the last round
    #[error("Fixpoint did not converge after {rounds} rounds (max: {max_rounds})")]
    FixpointNotConverged { rounds: usize, max_rounds: usize },
}

impl TaintError {
    /// Whether the analysis continues past this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            TaintError::Configuration(_) | TaintError::InvalidProgram(_)
        )
    }

    fn warning_kind(&self) -> Option<WarningKind> {
        match self {
            TaintError::Configuration(_) | TaintError::InvalidProgram(_) => None,
            TaintError::UnresolvedCall { .. } => Some(WarningKind::UnresolvedCall),
            TaintError::UnknownVariable { .. } => Some(WarningKind::UnknownVariable),
            TaintError::RecursionCut { .. } => Some(WarningKind::RecursionCut),
            TaintError::AnalysisLimitExceeded { .. } => Some(WarningKind::AnalysisLimitExceeded),
            TaintError::LoopLimitExceeded { .. } => Some(WarningKind::LoopLimitExceeded),
            TaintError::FixpointNotConverged { .. } => Some(WarningKind::FixpointNotConverged),
        }
    }
}

pub type TaintResult<T> = Result<T, TaintError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    UnresolvedCall,
    UnknownVariable,
    RecursionCut,
    AnalysisLimitExceeded,
    LoopLimitExceeded,
    FixpointNotConverged,
}

/// Recoverable problem recorded during analysis
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisWarning {
    pub kind: WarningKind,
    /// Function being analyzed when the problem occurred
    pub function: String,
    pub span: Span,
    pub message: String,
}

impl AnalysisWarning {
    /// Wrap a recoverable error; fatal errors yield `None`
    pub fn from_error(function: impl Into<String>, span: Span, error: &TaintError) -> Option<Self> {
        let kind = error.warning_kind()?;
        Some(Self {
            kind,
            function: function.into(),
            span,
            message: error.to_string(),
        })
    }
}

impl fmt::Display for AnalysisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {}", self.span, self.function, self.message)
    }
}
