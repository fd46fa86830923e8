/*
 * taintprobe IR - Taint Analysis Engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : IR models (Program, Stmt, Expr, Span, QualifiedName)
 * - features/    : Vertical slices (taint_analysis)
 * - config/      : Analysis settings, presets, YAML catalog files
 *
 * Pipeline:
 * - built-in catalog + user catalog -> TaintCatalog
 * - Program -> InterproceduralTaintAnalyzer -> Diagnostics + warnings
 */

#![allow(clippy::too_many_arguments)] // Catalog application threads call context through
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules
pub mod features;

/// Configuration system
pub mod config;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{AnalysisConfig, CatalogConfig, ConfigError, Preset, UnknownPolicy};
pub use features::taint_analysis::{
    AnalysisReport, Certainty, DefaultTaintAnalysisService, Diagnostic, DiagnosticKind,
    InterproceduralTaintAnalyzer, TaintAnalysisRequest, TaintAnalysisResponse,
    TaintAnalysisService, TaintCatalog, TaintError, TaintState,
};
pub use shared::models::{FunctionBuilder, Program, QualifiedName, Span};
