// Sink checker
//
// Turns a sink use plus the operand's taint state into at most one
// diagnostic. A sink use is identified by (kind, function, span, sink) and
// its position in the function body, so re-analysis of the same body in a
// later round or under another input pattern does not report it twice.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::UnknownPolicy;
use crate::features::taint_analysis::domain::{
    Certainty, Diagnostic, DiagnosticKind, TaintState,
};
use crate::shared::models::{QualifiedName, Span};

/// A value reaching a checked sink operand
#[derive(Debug, Clone)]
pub struct SinkUse {
    pub kind: DiagnosticKind,
    pub sink: String,
    pub span: Span,
    pub variable: Option<String>,
    pub state: TaintState,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SiteKey {
    kind: DiagnosticKind,
    function: QualifiedName,
    span: Span,
    sink: String,
    site: Vec<u32>,
}

#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    index: FxHashMap<SiteKey, usize>,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check one sink use. Returns true when a new diagnostic was recorded.
    ///
    /// A site first seen as `Possible` is upgraded in place when a later
    /// visit proves it `Definite`.
    pub fn check(
        &mut self,
        policy: UnknownPolicy,
        function: &QualifiedName,
        call_chain: &[QualifiedName],
        site: &[u32],
        sink_use: SinkUse,
    ) -> bool {
        let Some(certainty) = sink_use.state.flagged(policy) else {
            return false;
        };

        let key = SiteKey {
            kind: sink_use.kind,
            function: function.clone(),
            span: sink_use.span,
            sink: sink_use.sink.clone(),
            site: site.to_vec(),
        };

        if let Some(&idx) = self.index.get(&key) {
            let existing = &mut self.diagnostics[idx];
            if existing.certainty == Certainty::Possible && certainty == Certainty::Definite {
                existing.certainty = Certainty::Definite;
                existing.variable = sink_use.variable;
            }
            return false;
        }

        debug!(
            kind = %sink_use.kind,
            sink = %sink_use.sink,
            function = %function,
            span = %sink_use.span,
            "Sink reached by untrusted data"
        );
        self.index.insert(key, self.diagnostics.len());
        self.diagnostics.push(Diagnostic {
            kind: sink_use.kind,
            sink: sink_use.sink,
            function: function.clone(),
            span: sink_use.span,
            variable: sink_use.variable,
            certainty,
            call_chain: call_chain.to_vec(),
        });
        true
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
