// Taint analysis for C/C++ programs lowered to the IR
//
// Hexagonal Architecture:
// - domain: Lattice, catalog rules, diagnostics, call summaries
// - infrastructure: Catalog, propagation engine, checker, interprocedural driver
// - ports: Interface boundaries (Service trait, DTOs)
// - application: Use cases and orchestration

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-export application layer (primary interface)
pub use application::{AnalyzeTaintUseCase, DefaultTaintAnalysisService};

// Re-export domain types
pub use domain::{
    ArgPosition, CallSummary, Certainty, Diagnostic, DiagnosticKind, FilterRule, PropagatorRule,
    SinkRule, SourceRule, SummaryCache, TaintState,
};

pub use infrastructure::{
    AnalysisReport, AnalysisStats, AnalysisWarning, InterproceduralTaintAnalyzer, TaintCatalog,
    TaintError, TaintResult, WarningKind,
};
pub use ports::{
    TaintAnalysisError, TaintAnalysisRequest, TaintAnalysisResponse, TaintAnalysisService,
    TaintErrorKind,
};
