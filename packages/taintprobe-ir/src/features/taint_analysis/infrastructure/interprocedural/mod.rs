/*
 * Interprocedural Taint Analysis Module
 *
 * Tracks taint across calls to functions defined in the analyzed program.
 *
 * Algorithm: on-demand callee summaries
 * - Callees are analyzed when first called, under the caller's argument
 *   and global states, and memoized per input pattern
 * - Recursion is cut on the active call stack
 * - Descent is bounded by `max_depth`
 * - Whole-program rounds until the global taint table is stable
 *
 * Architecture:
 * - context.rs: Shared state of one analysis run
 * - analyzer.rs: Summary computation and the whole-program driver
 */

mod analyzer;
mod context;

// Re-export public API
pub use analyzer::{AnalysisReport, InterproceduralTaintAnalyzer};
pub use context::{AnalysisContext, AnalysisStats};
