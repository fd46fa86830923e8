//! Test fixture programs
//!
//! IR renditions of the C/C++ snippets the engine is calibrated against.
//! Line numbers are the ones the diagnostics are expected on.

use taintprobe_ir::shared::models::{
    BinOp, CompOp, Expr, FunctionBuilder, Program, Stmt, ValueType,
};

use super::builders::*;

/// ```c
/// void testSources1() {
///     int x;
///     scanf("%d", &x);
///     Buffer[x] = 1;          // line 25
/// }
/// ```
pub fn fixture_scanf_index() -> Program {
    program_with_buffer().with_function(
        FunctionBuilder::new("testSources1")
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(buffer_store(Expr::var("x"), 25))
            .build(),
    )
}

/// ```cpp
/// void testSources3() {
///     int x;
///     std::cin >> x;
///     Buffer[x] = 1;          // line 40
/// }
/// ```
pub fn fixture_cin_index() -> Program {
    program_with_buffer().with_function(
        FunctionBuilder::new("testSources3")
            .stmt(int_decl("x"))
            .stmt(Stmt::extract("std::istream", Expr::var("std::cin"), &["x"]))
            .stmt(buffer_store(Expr::var("x"), 40))
            .build(),
    )
}

/// ```c
/// void testSources6() {
///     char buf[64];
///     fgets(buf, 64, stdin);
///     printf(buf);            // line 61
/// }
/// ```
pub fn fixture_fgets_printf() -> Program {
    Program::new()
        .with_global("stdin", ValueType::Pointer)
        .with_function(
            FunctionBuilder::new("testSources6")
                .stmt(Stmt::decl("buf", ValueType::buffer(64)))
                .stmt(Stmt::call(
                    "fgets",
                    vec![Expr::var("buf"), Expr::int(64), Expr::var("stdin")],
                ))
                .stmt(Stmt::call("printf", vec![Expr::var("buf")]).at(61))
                .build(),
        )
}

/// ```c
/// void testSources7() {
///     char *cmd = getenv("CMD");
///     system(cmd);            // line 72
/// }
/// ```
pub fn fixture_getenv_system() -> Program {
    Program::new().with_function(
        FunctionBuilder::new("testSources7")
            .stmt(Stmt::decl_init(
                "cmd",
                ValueType::Pointer,
                Expr::call("getenv", vec![Expr::str("CMD")]),
            ))
            .stmt(Stmt::call("system", vec![Expr::var("cmd")]).at(72))
            .build(),
    )
}

/// ```cpp
/// void storeAt(int &x) { Buffer[x] = 1; } // line 12
/// void testInterproc() {
///     int x;
///     scanf("%d", &x);
///     storeAt(x);
/// }
/// ```
pub fn fixture_by_ref_callee() -> Program {
    program_with_buffer()
        .with_function(
            FunctionBuilder::new("storeAt")
                .param_by_ref("x", ValueType::Scalar)
                .stmt(buffer_store(Expr::var("x"), 12))
                .build(),
        )
        .with_function(
            FunctionBuilder::new("testInterproc")
                .stmt(int_decl("x"))
                .stmt(scanf_into("x"))
                .stmt(Stmt::call("storeAt", vec![Expr::var("x")]))
                .build(),
        )
}

/// ```c
/// int g;
/// void useGlobal() { int i = getGlobal(); Buffer[i] = 1; }   // line 30
/// int getGlobal() { return g; }
/// void readGlobal() { scanf("%d", &g); }
/// ```
pub fn fixture_global_getter() -> Program {
    program_with_buffer()
        .with_global("g", ValueType::Scalar)
        .with_function(
            FunctionBuilder::new("useGlobal")
                .stmt(Stmt::decl_init(
                    "i",
                    ValueType::Scalar,
                    Expr::call("getGlobal", vec![]),
                ))
                .stmt(buffer_store(Expr::var("i"), 30))
                .build(),
        )
        .with_function(
            FunctionBuilder::new("getGlobal")
                .stmt(Stmt::ret(Some(Expr::var("g"))))
                .build(),
        )
        .with_function(
            FunctionBuilder::new("readGlobal")
                .stmt(scanf_into("g"))
                .build(),
        )
}

/// ```c
/// void divide() {
///     int x, y;
///     scanf("%d", &x);
///     if (x != 0) y = 1 / x;  // line 50, guarded
///     y = 1 / x;              // line 51, unguarded
/// }
/// ```
pub fn fixture_division(guarded_only: bool) -> Program {
    let division = || Expr::binary(BinOp::Div, Expr::int(1), Expr::var("x"));
    let mut f = FunctionBuilder::new("divide")
        .stmt(int_decl("x"))
        .stmt(int_decl("y"))
        .stmt(scanf_into("x"))
        .stmt(
            Stmt::if_then(
                Expr::compare(CompOp::NotEq, Expr::var("x"), Expr::int(0)),
                vec![Stmt::assign("y", division()).at(50)],
            )
            .at(50),
        );
    if !guarded_only {
        f = f.stmt(Stmt::assign("y", division()).at(51));
    }
    program_with_buffer().with_function(f.build())
}

/// ```c
/// void bound() {
///     int x;
///     scanf("%d", &x);
///     int y = x % 10;
///     Buffer[y] = 1;          // line 80
/// }
/// ```
pub fn fixture_modulo_bound() -> Program {
    program_with_buffer().with_function(
        FunctionBuilder::new("bound")
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::decl_init(
                "y",
                ValueType::Scalar,
                Expr::binary(
                    BinOp::Mod,
                    Expr::var("x"),
                    Expr::int(BUFFER_CAPACITY as i64),
                ),
            ))
            .stmt(buffer_store(Expr::var("y"), 80))
            .build(),
    )
}

/// ```c
/// void arith() {
///     int x, a = 1, b = 2, c = 3, d = 4;
///     scanf("%d", &x);
///     int y = ((x + a - b) / c) * d;
///     Buffer[y] = 1;          // line 90
/// }
/// ```
pub fn fixture_non_bounding_arithmetic() -> Program {
    let expr = Expr::binary(
        BinOp::Mul,
        Expr::binary(
            BinOp::Div,
            Expr::binary(
                BinOp::Sub,
                Expr::binary(BinOp::Add, Expr::var("x"), Expr::var("a")),
                Expr::var("b"),
            ),
            Expr::var("c"),
        ),
        Expr::var("d"),
    );
    program_with_buffer().with_function(
        FunctionBuilder::new("arith")
            .stmt(int_decl("x"))
            .stmt(Stmt::decl_init("a", ValueType::Scalar, Expr::int(1)))
            .stmt(Stmt::decl_init("b", ValueType::Scalar, Expr::int(2)))
            .stmt(Stmt::decl_init("c", ValueType::Scalar, Expr::int(3)))
            .stmt(Stmt::decl_init("d", ValueType::Scalar, Expr::int(4)))
            .stmt(scanf_into("x"))
            .stmt(Stmt::decl_init("y", ValueType::Scalar, expr))
            .stmt(buffer_store(Expr::var("y"), 90))
            .build(),
    )
}

/// ```c
/// void narrow() {
///     int x;
///     scanf("%d", &x);
///     int y = (x == 1) ? x : 0;
///     Buffer[y] = 1;          // line 100
/// }
/// ```
pub fn fixture_ternary_equality() -> Program {
    program_with_buffer().with_function(
        FunctionBuilder::new("narrow")
            .stmt(int_decl("x"))
            .stmt(scanf_into("x"))
            .stmt(Stmt::decl_init(
                "y",
                ValueType::Scalar,
                Expr::ternary(
                    Expr::compare(CompOp::Eq, Expr::var("x"), Expr::int(1)),
                    Expr::var("x"),
                    Expr::int(0),
                ),
            ))
            .stmt(buffer_store(Expr::var("y"), 100))
            .build(),
    )
}
