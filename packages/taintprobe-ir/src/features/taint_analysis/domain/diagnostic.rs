// Diagnostics emitted at sink uses

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::models::{QualifiedName, Span};

/// Diagnostic kind, chosen by the sink entry rather than inferred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    OutOfBoundsAccess,
    UncontrolledFormatString,
    UntrustedSystemCall,
    UntrustedBufferSize,
    TaintedDivision,
    UntrustedSinkArgument,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::OutOfBoundsAccess => "out_of_bounds_access",
            DiagnosticKind::UncontrolledFormatString => "uncontrolled_format_string",
            DiagnosticKind::UntrustedSystemCall => "untrusted_system_call",
            DiagnosticKind::UntrustedBufferSize => "untrusted_buffer_size",
            DiagnosticKind::TaintedDivision => "tainted_division",
            DiagnosticKind::UntrustedSinkArgument => "untrusted_sink_argument",
        }
    }

    /// Human readable description
    pub fn description(&self) -> &'static str {
        match self {
            DiagnosticKind::OutOfBoundsAccess => "Out of bound memory access (index is tainted)",
            DiagnosticKind::UncontrolledFormatString => "Uncontrolled format string",
            DiagnosticKind::UntrustedSystemCall => "Untrusted data is passed to a system call",
            DiagnosticKind::UntrustedBufferSize => {
                "Untrusted data is used to specify the buffer size"
            }
            DiagnosticKind::TaintedDivision => "Division by a tainted value, possibly zero",
            DiagnosticKind::UntrustedSinkArgument => {
                "Untrusted data is passed to a user-defined sink"
            }
        }
    }

    /// CWE identifier
    pub fn cwe(&self) -> Option<u32> {
        match self {
            DiagnosticKind::OutOfBoundsAccess => Some(129),
            DiagnosticKind::UncontrolledFormatString => Some(134),
            DiagnosticKind::UntrustedSystemCall => Some(78),
            DiagnosticKind::UntrustedBufferSize => Some(789),
            DiagnosticKind::TaintedDivision => Some(369),
            DiagnosticKind::UntrustedSinkArgument => None,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How sure the engine is about a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Certainty {
    /// Operand was Tainted
    Definite,
    /// Operand was Unknown under the conservative policy
    Possible,
}

/// One triggered sink use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,

    /// Qualified sink name (`printf`, `operator[]`, `operator/`, ...)
    pub sink: String,

    /// Function containing the sink use
    pub function: QualifiedName,

    pub span: Span,

    /// Variable whose value reached the sink, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,

    pub certainty: Certainty,

    /// Active call stack (outermost first) when the diagnostic was first seen
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub call_chain: Vec<QualifiedName>,
}

impl Diagnostic {
    pub fn is_definite(&self) -> bool {
        self.certainty == Certainty::Definite
    }

    pub fn message(&self) -> String {
        match &self.variable {
            Some(var) => format!(
                "{} at '{}' (variable '{}')",
                self.kind.description(),
                self.sink,
                var
            ),
            None => format!("{} at '{}'", self.kind.description(), self.sink),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}: {}", self.span, self.function, self.message())?;
        if self.certainty == Certainty::Possible {
            write!(f, " [possible]")?;
        }
        Ok(())
    }
}
