//! Taint Analysis infrastructure
//!
//! - Built-in and user catalogs of sources, propagators, filters and sinks
//! - Per-function propagation over the IR (`propagation`)
//! - Sink checks and diagnostic deduplication (`checker`)
//! - Interprocedural summaries and the whole-program driver

pub mod catalog;
pub mod checker;
pub mod env;
pub mod errors;
pub mod globals;
pub mod interprocedural;
pub mod propagation;

pub use catalog::{CatalogMatch, CatalogStats, TaintCatalog};
pub use checker::{DiagnosticCollector, SinkUse};
pub use env::{Binding, Slot, SlotKind, TaintEnv};
pub use errors::{AnalysisWarning, TaintError, TaintResult, WarningKind};
pub use globals::{GlobalEntry, GlobalTaintTable};
pub use interprocedural::{
    AnalysisContext, AnalysisReport, AnalysisStats, InterproceduralTaintAnalyzer,
};
pub use propagation::{Eval, FunctionAnalyzer};
