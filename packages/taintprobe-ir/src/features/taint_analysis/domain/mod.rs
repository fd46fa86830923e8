// Taint analysis domain: lattice, catalog rules, diagnostics, summaries

mod catalog_entry;
mod diagnostic;
mod function_summary;
mod taint_state;

pub use catalog_entry::{
    expand_positions, ArgPosition, CallSlot, EntryOrigin, FilterRule, PropagatorRule, SinkRule,
    SourceRule,
};
pub use diagnostic::{Certainty, Diagnostic, DiagnosticKind};
pub use function_summary::{CallSummary, SummaryCache, SummaryKey};
pub use taint_state::TaintState;
