/*
 * Interprocedural Taint Analyzer
 *
 * On-demand, memoized descent into callees plus a whole-program driver.
 *
 * Algorithm:
 * 1. Seed the global table from the program's globals
 * 2. Analyze every function as an entry point (Clean parameters)
 * 3. Callees are analyzed on demand, keyed by (callee, input pattern)
 * 4. Repeat 2-3 until the global table stops changing
 *
 * Cycles are cut with the active call stack; descent is bounded by
 * `max_depth`. Both degrade to an Unknown summary and a warning.
 */

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::context::{AnalysisContext, AnalysisStats};
use crate::config::AnalysisConfig;
use crate::features::taint_analysis::domain::{
    CallSummary, Diagnostic, SummaryKey, TaintState,
};
use crate::features::taint_analysis::infrastructure::catalog::TaintCatalog;
use crate::features::taint_analysis::infrastructure::errors::{
    AnalysisWarning, TaintError, TaintResult,
};
use crate::features::taint_analysis::infrastructure::propagation::FunctionAnalyzer;
use crate::shared::models::{FunctionDef, Passing, Program, QualifiedName, Span};

/// Outcome of analyzing one program
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// In emission order
    pub diagnostics: Vec<Diagnostic>,
    pub warnings: Vec<AnalysisWarning>,
    pub stats: AnalysisStats,
}

impl AnalysisReport {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

impl<'p> AnalysisContext<'p> {
    /// Effect of `callee` under the given argument and global states.
    ///
    /// Served from the summary cache when the same input pattern was seen
    /// before; otherwise the body is analyzed now. Summaries that depend on
    /// a recursion cut or the depth limit are not memoized, since the same
    /// callee reached from a shallower stack may see further.
    pub fn summarize(
        &mut self,
        callee: &'p FunctionDef,
        args: Vec<TaintState>,
        globals: FxHashMap<String, TaintState>,
        span: Span,
    ) -> CallSummary {
        let caller = self
            .call_stack
            .last()
            .cloned()
            .unwrap_or_else(|| callee.name.clone());
        let by_ref: Vec<bool> = callee
            .params
            .iter()
            .map(|p| p.passing == Passing::ByReference)
            .collect();

        if self.is_active(&callee.name) {
            let start = self
                .call_stack
                .iter()
                .position(|f| f == &callee.name)
                .unwrap_or(0);
            let cycle = self.call_stack[start..]
                .iter()
                .chain(std::iter::once(&callee.name))
                .map(|f| f.to_string())
                .collect();
            self.warn(
                &caller,
                span,
                TaintError::RecursionCut {
                    function: callee.name.to_string(),
                    cycle,
                },
            );
            return CallSummary::unknown(callee.name.clone(), &by_ref);
        }

        if self.depth() >= self.config.max_depth {
            self.warn(
                &caller,
                span,
                TaintError::AnalysisLimitExceeded {
                    function: callee.name.to_string(),
                    depth: self.depth() + 1,
                    max_depth: self.config.max_depth,
                },
            );
            return CallSummary::unknown(callee.name.clone(), &by_ref);
        }

        let key = SummaryKey::new(
            callee.name.clone(),
            args.clone(),
            globals.iter().map(|(g, s)| (g.clone(), *s)),
        );
        if let Some(summary) = self.cache.get(&key) {
            self.stats.summary_cache_hits += 1;
            return summary.clone();
        }
        self.stats.summary_cache_misses += 1;

        debug!(
            function = %callee.name,
            depth = self.depth(),
            args = ?args,
            "Analyzing function body"
        );
        self.call_stack.push(callee.name.clone());
        self.stats.max_call_depth = self.stats.max_call_depth.max(self.call_stack.len());
        self.stats.functions_analyzed += 1;
        let summary = FunctionAnalyzer::new(self, callee.name.clone()).run(callee, &args, globals);
        self.call_stack.pop();

        if !summary.approximated {
            self.cache.put(key, summary.clone());
        }
        summary
    }

    fn seed_globals(&mut self) {
        let program = self.program;
        for global in &program.globals {
            let constant = if global.constant {
                global.init.as_ref().and_then(|e| e.as_int())
            } else {
                None
            };
            self.globals
                .declare(&global.name, global.ty.clone(), TaintState::Clean, constant);
        }

        for global in &program.globals {
            let Some(init) = &global.init else {
                continue;
            };
            let snapshot = self.globals.snapshot();
            let value = FunctionAnalyzer::new(self, QualifiedName::new("<global-init>"))
                .eval_initializer(init, snapshot);
            self.globals.record_write(&global.name, value.state);
        }
    }
}

/// Whole-program taint analyzer
pub struct InterproceduralTaintAnalyzer<'a> {
    catalog: &'a TaintCatalog,
    config: &'a AnalysisConfig,
}

impl<'a> InterproceduralTaintAnalyzer<'a> {
    pub fn new(catalog: &'a TaintCatalog, config: &'a AnalysisConfig) -> Self {
        Self { catalog, config }
    }

    /// Analyze every function of `program`
    pub fn analyze(&self, program: &Program) -> TaintResult<AnalysisReport> {
        self.config.validate()?;
        let mut ctx = AnalysisContext::new(program, self.catalog, self.config)?;
        ctx.seed_globals();

        info!(
            functions = program.functions.len(),
            globals = program.globals.len(),
            "Starting taint analysis"
        );

        for round in 1..=self.config.max_rounds {
            ctx.stats.rounds = round;
            let before = ctx.globals.version();
            for function in &program.functions {
                Self::analyze_entry(&mut ctx, function);
            }
            if ctx.globals.version() == before {
                ctx.stats.converged = true;
                break;
            }
            debug!(round, tainted = ?ctx.globals.non_clean(), "Global table changed");
        }

        if !ctx.stats.converged {
            let entry = program
                .functions
                .first()
                .map(|f| f.name.clone())
                .unwrap_or_else(|| QualifiedName::new("<program>"));
            ctx.warn(
                &entry,
                Span::zero(),
                TaintError::FixpointNotConverged {
                    rounds: ctx.stats.rounds,
                    max_rounds: self.config.max_rounds,
                },
            );
        }

        ctx.stats.entry_functions = program.functions.len();
        let warnings = ctx.take_warnings();
        let diagnostics = std::mem::take(&mut ctx.collector).into_diagnostics();
        ctx.stats.diagnostics = diagnostics.len();
        ctx.stats.warnings = warnings.len();

        info!(
            diagnostics = diagnostics.len(),
            warnings = warnings.len(),
            rounds = ctx.stats.rounds,
            cache = %ctx.cache.stats(),
            "Taint analysis finished"
        );

        Ok(AnalysisReport {
            diagnostics,
            warnings,
            stats: ctx.stats,
        })
    }

    /// Entry points take Clean parameters and the current global table
    fn analyze_entry<'p>(ctx: &mut AnalysisContext<'p>, function: &'p FunctionDef) {
        let args = vec![TaintState::Clean; function.params.len()];
        let globals = ctx.globals.snapshot();
        ctx.summarize(function, args, globals, function.span);
    }
}
