//! Custom assertions for test verification
//!
//! Domain-specific assertions over analysis reports.

use taintprobe_ir::features::taint_analysis::{
    AnalysisReport, Diagnostic, DiagnosticKind, WarningKind,
};

/// Assert that the report has no diagnostics
pub fn assert_no_diagnostics(report: &AnalysisReport) {
    assert!(
        report.diagnostics.is_empty(),
        "Expected no diagnostics, got: {:#?}",
        report.diagnostics
    );
}

/// Assert exactly one diagnostic of `kind` and return it
pub fn assert_single_diagnostic(report: &AnalysisReport, kind: DiagnosticKind) -> &Diagnostic {
    assert_eq!(
        report.diagnostics.len(),
        1,
        "Expected exactly one diagnostic, got: {:#?}",
        report.diagnostics
    );
    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.kind, kind, "Unexpected kind: {}", diagnostic);
    diagnostic
}

/// Assert that a warning of `kind` was recorded
pub fn assert_has_warning(report: &AnalysisReport, kind: WarningKind) {
    assert!(
        report.warnings.iter().any(|w| w.kind == kind),
        "Expected a {:?} warning, got: {:?}",
        kind,
        report.warnings
    );
}

/// Assert that no warning of `kind` was recorded
pub fn assert_no_warning(report: &AnalysisReport, kind: WarningKind) {
    assert!(
        report.warnings.iter().all(|w| w.kind != kind),
        "Unexpected {:?} warning: {:?}",
        kind,
        report.warnings
    );
}
