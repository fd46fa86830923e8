//! Analysis Context
//!
//! Everything one program's analysis shares: the program index, catalog,
//! settings, global table, summary cache, active call stack, collected
//! diagnostics and warnings. Passed explicitly; nothing is process-global.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::features::taint_analysis::domain::SummaryCache;
use crate::features::taint_analysis::infrastructure::catalog::TaintCatalog;
use crate::features::taint_analysis::infrastructure::checker::DiagnosticCollector;
use crate::features::taint_analysis::infrastructure::errors::{
    AnalysisWarning, TaintError, TaintResult,
};
use crate::features::taint_analysis::infrastructure::globals::GlobalTaintTable;
use crate::shared::models::{FunctionDef, Program, QualifiedName, Span};

/// Counters for one analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Function bodies analyzed (entries and on-demand callees)
    pub functions_analyzed: usize,
    pub entry_functions: usize,
    pub summary_cache_hits: usize,
    pub summary_cache_misses: usize,
    /// Whole-program rounds until the global table was stable
    pub rounds: usize,
    pub converged: bool,
    /// Deepest call stack reached
    pub max_call_depth: usize,
    pub loop_iterations: usize,
    pub diagnostics: usize,
    pub warnings: usize,
}

pub struct AnalysisContext<'p> {
    functions: FxHashMap<QualifiedName, &'p FunctionDef>,
    pub(crate) program: &'p Program,
    pub(crate) catalog: &'p TaintCatalog,
    pub(crate) config: &'p AnalysisConfig,
    pub(crate) globals: GlobalTaintTable,
    pub(crate) cache: SummaryCache,
    /// Functions being analyzed, outermost first
    pub(crate) call_stack: Vec<QualifiedName>,
    pub(crate) collector: DiagnosticCollector,
    pub(crate) stats: AnalysisStats,
    warnings: Vec<AnalysisWarning>,
    seen_warnings: FxHashSet<AnalysisWarning>,
}

impl<'p> AnalysisContext<'p> {
    /// Index `program`; duplicate function or global names are rejected
    pub fn new(
        program: &'p Program,
        catalog: &'p TaintCatalog,
        config: &'p AnalysisConfig,
    ) -> TaintResult<Self> {
        let mut functions = FxHashMap::default();
        for function in &program.functions {
            if functions.insert(function.name.clone(), function).is_some() {
                return Err(TaintError::InvalidProgram(format!(
                    "function '{}' is defined more than once",
                    function.name
                )));
            }
        }

        let mut globals = FxHashSet::default();
        for global in &program.globals {
            if !globals.insert(global.name.as_str()) {
                return Err(TaintError::InvalidProgram(format!(
                    "global '{}' is declared more than once",
                    global.name
                )));
            }
        }

        Ok(Self {
            functions,
            program,
            catalog,
            config,
            globals: GlobalTaintTable::new(),
            cache: SummaryCache::new(config.summary_cache_size),
            call_stack: Vec::new(),
            collector: DiagnosticCollector::new(),
            stats: AnalysisStats::default(),
            warnings: Vec::new(),
            seen_warnings: FxHashSet::default(),
        })
    }

    /// Definition of `name` in the analyzed program
    pub fn function(&self, name: &QualifiedName) -> Option<&'p FunctionDef> {
        self.functions.get(name).copied()
    }

    pub fn depth(&self) -> usize {
        self.call_stack.len()
    }

    /// Check if function is on the active call stack
    pub fn is_active(&self, name: &QualifiedName) -> bool {
        self.call_stack.contains(name)
    }

    /// Record a recoverable error as a warning (once per function/span/message)
    pub fn warn(&mut self, function: &QualifiedName, span: Span, error: TaintError) {
        let Some(warning) = AnalysisWarning::from_error(function.as_str(), span, &error) else {
            return;
        };
        if self.seen_warnings.insert(warning.clone()) {
            debug!(function = %function, span = %span, "{}", warning.message);
            self.warnings.push(warning);
        }
    }

    pub fn warnings(&self) -> &[AnalysisWarning] {
        &self.warnings
    }

    pub(crate) fn take_warnings(&mut self) -> Vec<AnalysisWarning> {
        self.seen_warnings.clear();
        std::mem::take(&mut self.warnings)
    }
}
