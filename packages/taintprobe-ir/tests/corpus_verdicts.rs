//! Verdicts on the calibration corpus
//!
//! Each test lowers one snippet to the IR and checks the exact set of
//! diagnostics the engine produces for it.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use taintprobe_ir::config::{AnalysisConfig, TernaryNarrowing, UnknownPolicy};
use taintprobe_ir::features::taint_analysis::{
    Certainty, DiagnosticKind, InterproceduralTaintAnalyzer, TaintCatalog, WarningKind,
};
use taintprobe_ir::shared::models::{
    BinOp, CompOp, Expr, FunctionBuilder, Place, Program, QualifiedName, Span, Stmt, ValueType,
};

// ═══════════════════════════════════════════════════════════════════════════
// Sources reaching sinks
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn scanf_into_index_is_out_of_bounds() {
    let report = analyze(&fixture_scanf_index());
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.function, QualifiedName::new("testSources1"));
    assert_eq!(d.span, Span::line(25));
    assert_eq!(d.variable.as_deref(), Some("x"));
    assert_eq!(d.certainty, Certainty::Definite);
    assert_eq!(d.sink, "operator[]");
}

#[test]
fn cin_extraction_into_index_is_out_of_bounds() {
    let report = analyze(&fixture_cin_index());
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.span, Span::line(40));
    assert_no_warning(&report, WarningKind::UnknownVariable);
}

#[test]
fn fgets_into_printf_is_format_string() {
    let report = analyze(&fixture_fgets_printf());
    let d = assert_single_diagnostic(&report, DiagnosticKind::UncontrolledFormatString);
    assert_eq!(d.sink, "printf");
    assert_eq!(d.span, Span::line(61));
    assert_eq!(d.variable.as_deref(), Some("buf"));
}

#[test]
fn getenv_into_system_is_untrusted_system_call() {
    let report = analyze(&fixture_getenv_system());
    let d = assert_single_diagnostic(&report, DiagnosticKind::UntrustedSystemCall);
    assert_eq!(d.sink, "system");
    assert_eq!(d.variable.as_deref(), Some("cmd"));
}

#[test]
fn tainted_malloc_size_is_untrusted_buffer_size() {
    let program = Program::new().with_function(
        FunctionBuilder::new("alloc")
            .stmt(int_decl("n"))
            .stmt(scanf_into("n"))
            .stmt(Stmt::decl_init(
                "p",
                ValueType::Pointer,
                Expr::call("malloc", vec![Expr::var("n")]),
            ))
            .build(),
    );
    let report = analyze(&program);
    assert_single_diagnostic(&report, DiagnosticKind::UntrustedBufferSize);
}

#[test]
fn scanf_format_string_is_not_tainted() {
    // scanf's format argument is an input, not an output
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("f")
            .stmt(Stmt::decl_init("fmt", ValueType::String, Expr::str("%d")))
            .stmt(int_decl("x"))
            .stmt(Stmt::call("scanf", vec![Expr::var("fmt"), Expr::addr_of("x")]))
            .stmt(Stmt::call("printf", vec![Expr::var("fmt")]))
            .build(),
    );
    assert_no_diagnostics(&analyze(&program));
}

#[test]
fn propagator_carries_taint_into_destination() {
    let program = Program::new().with_function(
        FunctionBuilder::new("copy")
            .stmt(Stmt::decl("src", ValueType::buffer(32)))
            .stmt(Stmt::decl("dst", ValueType::buffer(32)))
            .stmt(Stmt::call("gets", vec![Expr::var("src")]))
            .stmt(Stmt::call("strcpy", vec![Expr::var("dst"), Expr::var("src")]))
            .stmt(Stmt::call("printf", vec![Expr::var("dst")]))
            .build(),
    );
    let report = analyze(&program);
    let d = assert_single_diagnostic(&report, DiagnosticKind::UncontrolledFormatString);
    assert_eq!(d.variable.as_deref(), Some("dst"));
}

#[test]
fn string_getline_then_index_is_out_of_bounds() {
    let program = Program::new()
        .with_global("Text", ValueType::String)
        .with_function(
            FunctionBuilder::new("lines")
                .stmt(Stmt::decl("s", ValueType::String))
                .stmt(Stmt::call(
                    "std::getline",
                    vec![Expr::var("std::cin"), Expr::var("s")],
                ))
                .stmt(Stmt::decl_init(
                    "n",
                    ValueType::Scalar,
                    Expr::call("atoi", vec![Expr::var("s")]),
                ))
                .stmt(Stmt::decl_init(
                    "c",
                    ValueType::Scalar,
                    Expr::index("Text", Expr::var("n")),
                ))
                .build(),
        );
    let report = analyze(&program);
    assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
}

#[test]
fn socket_read_into_syslog_is_untrusted_system_call() {
    let program = Program::new().with_function(
        FunctionBuilder::new("testSources3")
            .stmt(Stmt::decl("buffer", ValueType::buffer(64)))
            .stmt(int_decl("sock"))
            .stmt(Stmt::call(
                "read",
                vec![Expr::var("sock"), Expr::var("buffer"), Expr::int(64)],
            ))
            .stmt(Stmt::call("syslog", vec![Expr::int(4), Expr::var("buffer")]).at(33))
            .build(),
    );
    let report = analyze(&program);
    let d = assert_single_diagnostic(&report, DiagnosticKind::UntrustedSystemCall);
    assert_eq!(d.sink, "syslog");
    assert_eq!(d.span, Span::line(33));
    assert_eq!(d.variable.as_deref(), Some("buffer"));
}

#[test]
fn fscanf_from_global_file_into_index_is_out_of_bounds() {
    let program = program_with_buffer()
        .with_global("fptr", ValueType::Pointer)
        .with_function(
            FunctionBuilder::new("testSources4")
                .stmt(int_decl("num"))
                .stmt(Stmt::call(
                    "fscanf",
                    vec![Expr::var("fptr"), Expr::str("%d"), Expr::addr_of("num")],
                ))
                .stmt(buffer_store(Expr::var("num"), 47))
                .build(),
        );
    let report = analyze(&program);
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.span, Span::line(47));
    assert_eq!(d.variable.as_deref(), Some("num"));
}

#[test]
fn chained_cin_extraction_taints_every_target() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("testSources5")
            .stmt(int_decl("x"))
            .stmt(int_decl("y"))
            .stmt(Stmt::extract("std::istream", Expr::var("std::cin"), &["x", "y"]))
            .stmt(buffer_store(Expr::var("y"), 53))
            .build(),
    );
    let report = analyze(&program);
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.variable.as_deref(), Some("y"));
    assert_no_warning(&report, WarningKind::UnknownVariable);
}

#[test]
fn ifstream_extraction_into_index_is_out_of_bounds() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("testSources6")
            .stmt(Stmt::decl("myfile", ValueType::object("std::ifstream")))
            .stmt(int_decl("x"))
            .stmt(int_decl("y"))
            .stmt(Stmt::extract("std::ifstream", Expr::var("myfile"), &["x", "y"]))
            .stmt(buffer_store(Expr::var("y"), 66))
            .build(),
    );
    let report = analyze(&program);
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.span, Span::line(66));
    assert_eq!(d.variable.as_deref(), Some("y"));
}

// ═══════════════════════════════════════════════════════════════════════════
// Constants and reassignment
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn constant_assignments_are_clean() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("constants")
            .stmt(Stmt::decl_init(
                "x",
                ValueType::Scalar,
                Expr::binary(BinOp::Add, Expr::int(3), Expr::int(4)),
            ))
            .stmt(Stmt::constant("K", 2))
            .stmt(Stmt::decl_init(
                "y",
                ValueType::Scalar,
                Expr::binary(BinOp::Mul, Expr::var("x"), Expr::var("K")),
            ))
            .stmt(buffer_store(Expr::var("y"), 5))
            .stmt(Stmt::assign(
                "y",
                Expr::binary(BinOp::Div, Expr::int(10), Expr::var("K")),
            ))
            .build(),
    );
    let report = analyze(&program);
    assert_no_diagnostics(&report);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn clean_reassignment_clears_taint() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("reassign")
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::assign("x", Expr::int(5)))
            .stmt(buffer_store(Expr::var("x"), 10))
            .build(),
    );
    assert_no_diagnostics(&analyze(&program));
}

#[test]
fn constant_compound_assignment_keeps_taint() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("compound")
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::compound("x", BinOp::Add, Expr::int(1)))
            .stmt(Stmt::increment("x"))
            .stmt(buffer_store(Expr::var("x"), 10))
            .build(),
    );
    assert_single_diagnostic(&analyze(&program), DiagnosticKind::OutOfBoundsAccess);
}

#[test]
fn modulo_compound_assignment_bounds() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("compound_mod")
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::compound("x", BinOp::Mod, Expr::int(10)))
            .stmt(buffer_store(Expr::var("x"), 10))
            .build(),
    );
    assert_no_diagnostics(&analyze(&program));
}

#[test]
fn branch_join_keeps_taint_from_either_arm() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("branches")
            .param("flag", ValueType::Scalar)
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::if_else(
                Expr::var("flag"),
                vec![Stmt::assign("x", Expr::int(0))],
                vec![],
            ))
            .stmt(buffer_store(Expr::var("x"), 12))
            .build(),
    );
    assert_single_diagnostic(&analyze(&program), DiagnosticKind::OutOfBoundsAccess);
}

#[test]
fn early_return_path_does_not_reach_join() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("early")
            .param("flag", ValueType::Scalar)
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::if_else(
                Expr::var("flag"),
                vec![Stmt::assign("x", Expr::int(0))],
                vec![Stmt::ret(None)],
            ))
            .stmt(buffer_store(Expr::var("x"), 12))
            .build(),
    );
    assert_no_diagnostics(&analyze(&program));
}

#[test]
fn chained_assignment_carries_taint_to_both_targets() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("chain")
            .stmt(int_decl("x"))
            .stmt(int_decl("y"))
            .stmt(int_decl("z"))
            .stmt(scanf_into("y"))
            .stmt(Stmt::assign(
                "z",
                Expr::assign(Place::var("x"), Expr::var("y")),
            ))
            .stmt(buffer_store(Expr::var("z"), 14))
            .stmt(buffer_store(Expr::var("x"), 15))
            .build(),
    );
    let report = analyze(&program);
    let mut lines: Vec<Span> = report
        .diagnostics
        .iter()
        .inspect(|d| assert_eq!(d.kind, DiagnosticKind::OutOfBoundsAccess))
        .map(|d| d.span)
        .collect();
    lines.sort();
    assert_eq!(lines, vec![Span::line(14), Span::line(15)]);
}

#[test]
fn chained_clean_assignment_clears_inner_target() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("chain_clean")
            .stmt(int_decl("x"))
            .stmt(Stmt::decl_init("y", ValueType::Scalar, Expr::int(0)))
            .stmt(int_decl("z"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::assign(
                "z",
                Expr::assign(Place::var("x"), Expr::var("y")),
            ))
            .stmt(buffer_store(Expr::var("x"), 14))
            .stmt(buffer_store(Expr::var("z"), 15))
            .build(),
    );
    assert_no_diagnostics(&analyze(&program));
}

// ═══════════════════════════════════════════════════════════════════════════
// Qualified-name matching
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn namespace_and_member_look_alikes_are_not_sources() {
    let ns_scanf = FunctionBuilder::new("Input::scanf")
        .param("fmt", ValueType::String)
        .param_by_ref("out", ValueType::Scalar)
        .stmt(Stmt::assign_to(Place::deref("out"), Expr::int(0)))
        .build();
    let member_scanf = FunctionBuilder::new("Reader::scanf")
        .param("fmt", ValueType::String)
        .param_by_ref("out", ValueType::Scalar)
        .stmt(Stmt::assign_to(Place::deref("out"), Expr::int(1)))
        .build();
    let caller = FunctionBuilder::new("testSources2")
        .stmt(Stmt::decl("reader", ValueType::object("Reader")))
        .stmt(int_decl("x"))
        .stmt(int_decl("y"))
        .stmt(Stmt::call(
            "Input::scanf",
            vec![Expr::str("%d"), Expr::addr_of("x")],
        ))
        .stmt(Stmt::expr(Expr::member_call(
            "Reader::scanf",
            Expr::var("reader"),
            vec![Expr::str("%d"), Expr::addr_of("y")],
        )))
        .stmt(buffer_store(Expr::var("x"), 20))
        .stmt(buffer_store(Expr::var("y"), 21))
        .build();
    let program = program_with_buffer()
        .with_function(ns_scanf)
        .with_function(member_scanf)
        .with_function(caller);

    let report = analyze(&program);
    assert_no_diagnostics(&report);
    assert_no_warning(&report, WarningKind::UnresolvedCall);
}

#[test]
fn global_namespace_prefix_matches_builtin() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("f")
            .stmt(int_decl("x"))
            .stmt(Stmt::call(
                "::scanf",
                vec![Expr::str("%d"), Expr::addr_of("x")],
            ))
            .stmt(buffer_store(Expr::var("x"), 3))
            .build(),
    );
    assert_single_diagnostic(&analyze(&program), DiagnosticKind::OutOfBoundsAccess);
}

// ═══════════════════════════════════════════════════════════════════════════
// Interprocedural and global flow
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn by_reference_callee_reports_at_its_own_site() {
    let report = analyze(&fixture_by_ref_callee());
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.function, QualifiedName::new("storeAt"));
    assert_eq!(d.span, Span::line(12));
    assert_eq!(
        d.call_chain,
        vec![
            QualifiedName::new("testInterproc"),
            QualifiedName::new("storeAt")
        ]
    );
}

#[test]
fn by_reference_write_flows_back_to_caller() {
    let read = FunctionBuilder::new("readInto")
        .param_by_ref("out", ValueType::Scalar)
        .stmt(scanf_into("out"))
        .build();
    let caller = FunctionBuilder::new("caller")
        .stmt(int_decl("x"))
        .stmt(Stmt::call("readInto", vec![Expr::var("x")]))
        .stmt(buffer_store(Expr::var("x"), 7))
        .build();
    let program = program_with_buffer().with_function(read).with_function(caller);
    let report = analyze(&program);
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.function, QualifiedName::new("caller"));
}

#[test]
fn return_value_carries_taint() {
    let read = FunctionBuilder::new("readInt")
        .stmt(int_decl("v"))
        .stmt(scanf_into("v"))
        .stmt(Stmt::ret(Some(Expr::var("v"))))
        .build();
    let caller = FunctionBuilder::new("caller")
        .stmt(Stmt::decl_init(
            "i",
            ValueType::Scalar,
            Expr::call("readInt", vec![]),
        ))
        .stmt(buffer_store(Expr::var("i"), 9))
        .build();
    let program = program_with_buffer().with_function(read).with_function(caller);
    assert_single_diagnostic(&analyze(&program), DiagnosticKind::OutOfBoundsAccess);
}

#[test]
fn global_read_through_getter_is_out_of_bounds() {
    let report = analyze(&fixture_global_getter());
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.function, QualifiedName::new("useGlobal"));
    assert_eq!(d.span, Span::line(30));
    assert!(report.stats.converged);
    assert!(report.stats.rounds >= 2);
}

#[test]
fn global_initializer_from_source_is_tainted() {
    let program = program_with_buffer()
        .with_global_init("seed", ValueType::Scalar, Expr::call("getchar", vec![]))
        .with_function(
            FunctionBuilder::new("useSeed")
                .stmt(buffer_store(Expr::var("seed"), 4))
                .build(),
        );
    assert_single_diagnostic(&analyze(&program), DiagnosticKind::OutOfBoundsAccess);
}

// ═══════════════════════════════════════════════════════════════════════════
// Division and bounding
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn guarded_division_is_silent() {
    assert_no_diagnostics(&analyze(&fixture_division(true)));
}

#[test]
fn unguarded_division_is_flagged() {
    let report = analyze(&fixture_division(false));
    let d = assert_single_diagnostic(&report, DiagnosticKind::TaintedDivision);
    assert_eq!(d.span, Span::line(51));
    assert_eq!(d.sink, "operator/");
}

#[test]
fn else_branch_of_zero_test_is_guarded() {
    let program = Program::new().with_function(
        FunctionBuilder::new("divide")
            .stmt(int_decl("x"))
            .stmt(int_decl("y"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::if_else(
                Expr::compare(CompOp::Eq, Expr::var("x"), Expr::int(0)),
                vec![Stmt::assign("y", Expr::int(0))],
                vec![Stmt::assign(
                    "y",
                    Expr::binary(BinOp::Mod, Expr::int(100), Expr::var("x")),
                )],
            ))
            .build(),
    );
    assert_no_diagnostics(&analyze(&program));
}

#[test]
fn modulo_by_capacity_bounds_index() {
    assert_no_diagnostics(&analyze(&fixture_modulo_bound()));
}

#[test]
fn modulo_by_const_variable_bounds_index() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("bound_const")
            .stmt(Stmt::constant("N", 10))
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::decl_init(
                "y",
                ValueType::Scalar,
                Expr::binary(BinOp::Mod, Expr::var("x"), Expr::var("N")),
            ))
            .stmt(buffer_store(Expr::var("y"), 8))
            .build(),
    );
    assert_no_diagnostics(&analyze(&program));
}

#[test]
fn modulo_larger_than_capacity_does_not_bound() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("loose_bound")
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::decl_init(
                "y",
                ValueType::Scalar,
                Expr::binary(BinOp::Mod, Expr::var("x"), Expr::int(1000)),
            ))
            .stmt(buffer_store(Expr::var("y"), 9))
            .build(),
    );
    let report = analyze(&program);
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.span, Span::line(9));
    assert_eq!(d.variable.as_deref(), Some("y"));
}

#[test]
fn modulo_bound_checks_the_indexed_container() {
    // Bounded for Buffer[10] but not for small[4]
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("two_buffers")
            .stmt(Stmt::decl("small", ValueType::buffer(4)))
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::decl_init(
                "y",
                ValueType::Scalar,
                Expr::binary(BinOp::Mod, Expr::var("x"), Expr::int(10)),
            ))
            .stmt(buffer_store(Expr::var("y"), 20))
            .stmt(Stmt::store_index("small", Expr::var("y"), Expr::int(1)).at(21))
            .build(),
    );
    let report = analyze(&program);
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.span, Span::line(21));
}

#[test]
fn increment_after_modulo_drops_the_bound() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("bump")
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::compound("x", BinOp::Mod, Expr::int(10)))
            .stmt(Stmt::increment("x"))
            .stmt(buffer_store(Expr::var("x"), 30))
            .build(),
    );
    assert_single_diagnostic(&analyze(&program), DiagnosticKind::OutOfBoundsAccess);
}

#[test]
fn non_bounding_arithmetic_stays_tainted() {
    let report = analyze(&fixture_non_bounding_arithmetic());
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.span, Span::line(90));
}

// ═══════════════════════════════════════════════════════════════════════════
// Ternary narrowing
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn equality_ternary_narrows_by_default() {
    assert_no_diagnostics(&analyze(&fixture_ternary_equality()));
}

#[test]
fn conservative_ternary_joins_both_arms() {
    let config = AnalysisConfig::default().ternary_narrowing(TernaryNarrowing::Conservative);
    let report = analyze_with(&fixture_ternary_equality(), &config);
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.span, Span::line(100));
}

// ═══════════════════════════════════════════════════════════════════════════
// Unknown taint
// ═══════════════════════════════════════════════════════════════════════════

fn unresolved_index_program() -> Program {
    program_with_buffer().with_function(
        FunctionBuilder::new("opaque")
            .stmt(Stmt::decl_init(
                "i",
                ValueType::Scalar,
                Expr::call("mystery", vec![]),
            ))
            .stmt(buffer_store(Expr::var("i"), 6))
            .build(),
    )
}

#[test]
fn unresolved_call_is_possible_under_conservative_policy() {
    let report = analyze(&unresolved_index_program());
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.certainty, Certainty::Possible);
    assert_has_warning(&report, WarningKind::UnresolvedCall);
}

#[test]
fn unresolved_call_is_silent_under_permissive_policy() {
    let config = AnalysisConfig::default().unknown_policy(UnknownPolicy::Permissive);
    let report = analyze_with(&unresolved_index_program(), &config);
    assert_no_diagnostics(&report);
    assert_has_warning(&report, WarningKind::UnresolvedCall);
}

#[test]
fn unresolved_call_may_write_through_pointer_args() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("opaque_out")
            .stmt(Stmt::decl_init("i", ValueType::Scalar, Expr::int(0)))
            .stmt(Stmt::call("fill", vec![Expr::addr_of("i")]))
            .stmt(buffer_store(Expr::var("i"), 6))
            .build(),
    );
    let report = analyze(&program);
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.certainty, Certainty::Possible);
}

#[test]
fn unknown_variable_is_warned() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("typo")
            .stmt(buffer_store(Expr::var("undeclared"), 2))
            .build(),
    );
    let report = analyze(&program);
    assert_has_warning(&report, WarningKind::UnknownVariable);
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.certainty, Certainty::Possible);
}

// ═══════════════════════════════════════════════════════════════════════════
// Loops and recursion
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn loop_carried_taint_reaches_index_once() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("loop")
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::decl_init("i", ValueType::Scalar, Expr::int(0)))
            .stmt(Stmt::while_loop(
                Expr::compare(CompOp::Lt, Expr::var("i"), Expr::int(10)),
                vec![
                    buffer_store(Expr::var("i"), 14),
                    Stmt::assign("i", Expr::var("x")),
                ],
            ))
            .build(),
    );
    let report = analyze(&program);
    let d = assert_single_diagnostic(&report, DiagnosticKind::OutOfBoundsAccess);
    assert_eq!(d.span, Span::line(14));
    assert_eq!(d.certainty, Certainty::Definite);
}

#[test]
fn counting_loop_is_clean() {
    let program = program_with_buffer().with_function(
        FunctionBuilder::new("count")
            .stmt(Stmt::decl_init("i", ValueType::Scalar, Expr::int(0)))
            .stmt(Stmt::while_loop(
                Expr::compare(CompOp::Lt, Expr::var("i"), Expr::int(10)),
                vec![buffer_store(Expr::var("i"), 3), Stmt::increment("i")],
            ))
            .build(),
    );
    let report = analyze(&program);
    assert_no_diagnostics(&report);
    assert_no_warning(&report, WarningKind::LoopLimitExceeded);
}

#[test]
fn mutual_recursion_terminates() {
    let even = FunctionBuilder::new("even")
        .param("n", ValueType::Scalar)
        .stmt(Stmt::ret(Some(Expr::call("odd", vec![Expr::var("n")]))))
        .build();
    let odd = FunctionBuilder::new("odd")
        .param("n", ValueType::Scalar)
        .stmt(Stmt::ret(Some(Expr::call("even", vec![Expr::var("n")]))))
        .build();
    let program = Program::new().with_function(even).with_function(odd);
    let report = analyze(&program);
    assert_has_warning(&report, WarningKind::RecursionCut);
    assert!(report.stats.converged);
}

#[test]
fn duplicate_function_is_rejected() {
    let program = Program::new()
        .with_function(FunctionBuilder::new("f").build())
        .with_function(FunctionBuilder::new("f").build());
    let catalog = TaintCatalog::builtin();
    let config = AnalysisConfig::default();
    let result = InterproceduralTaintAnalyzer::new(&catalog, &config).analyze(&program);
    assert!(result.is_err());
}
