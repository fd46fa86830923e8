//! Test data builders
//!
//! Shorthands for the statements the corpus snippets are made of, and for
//! running the analyzer with a given catalog and settings.

use taintprobe_ir::config::{AnalysisConfig, CatalogConfig};
use taintprobe_ir::features::taint_analysis::{
    AnalysisReport, InterproceduralTaintAnalyzer, TaintCatalog,
};
use taintprobe_ir::shared::models::{Expr, Program, Stmt, ValueType};

/// Capacity of the `Buffer` global used throughout the corpus
pub const BUFFER_CAPACITY: u64 = 10;

/// Program with the corpus' `int Buffer[10];` global
pub fn program_with_buffer() -> Program {
    Program::new().with_global("Buffer", ValueType::buffer(BUFFER_CAPACITY))
}

/// `int name;`
pub fn int_decl(name: &str) -> Stmt {
    Stmt::decl(name, ValueType::Scalar)
}

/// `scanf("%d", &name);`
pub fn scanf_into(name: &str) -> Stmt {
    Stmt::call("scanf", vec![Expr::str("%d"), Expr::addr_of(name)])
}

/// `Buffer[index] = 1;` on `line`
pub fn buffer_store(index: Expr, line: u32) -> Stmt {
    Stmt::store_index("Buffer", index, Expr::int(1)).at(line)
}

/// Analyze with the built-in catalog and default settings
pub fn analyze(program: &Program) -> AnalysisReport {
    analyze_with(program, &AnalysisConfig::default())
}

pub fn analyze_with(program: &Program, config: &AnalysisConfig) -> AnalysisReport {
    let catalog = TaintCatalog::builtin();
    InterproceduralTaintAnalyzer::new(&catalog, config)
        .analyze(program)
        .expect("analysis succeeds")
}

/// Analyze with the built-in catalog overlaid by a YAML catalog
pub fn analyze_with_catalog(program: &Program, yaml: &str) -> AnalysisReport {
    let user = CatalogConfig::from_yaml_str(yaml).expect("catalog parses");
    let config = user
        .analysis_config(&AnalysisConfig::default())
        .expect("settings validate");
    let catalog = TaintCatalog::with_user_entries(&user);
    InterproceduralTaintAnalyzer::new(&catalog, &config)
        .analyze(program)
        .expect("analysis succeeds")
}
