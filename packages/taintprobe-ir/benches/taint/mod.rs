//! Benchmark program generators
//!
//! Synthetic IR programs shaped like the workloads the engine sees:
//! - call chains passing a tainted value down to an index sink
//! - straight-line functions with many branches
//! - loops carrying taint around a back edge
//! - globals written and read through many small functions

use taintprobe_ir::shared::models::{
    BinOp, CompOp, Expr, FunctionBuilder, Program, Stmt, ValueType,
};

fn buffer_program() -> Program {
    Program::new().with_global("Buffer", ValueType::buffer(10))
}

fn read_x() -> [Stmt; 2] {
    [
        Stmt::decl("x", ValueType::Scalar),
        Stmt::call("scanf", vec![Expr::str("%d"), Expr::addr_of("x")]),
    ]
}

/// Call chain
///
/// Structure: main → f0(x) → f1(v) → ... → fN(v) → Buffer[v]
pub fn call_chain(depth: usize) -> Program {
    let mut program = buffer_program();
    for i in 0..depth {
        let body = if i + 1 == depth {
            Stmt::store_index("Buffer", Expr::var("v"), Expr::int(1))
        } else {
            Stmt::call(format!("f{}", i + 1).as_str(), vec![Expr::var("v")])
        };
        program = program.with_function(
            FunctionBuilder::new(format!("f{}", i).as_str())
                .param("v", ValueType::Scalar)
                .stmt(body)
                .build(),
        );
    }
    program.with_function(
        FunctionBuilder::new("main")
            .stmts(read_x())
            .stmt(Stmt::call("f0", vec![Expr::var("x")]))
            .build(),
    )
}

/// One function with `count` sequential if/else blocks, each assigning
/// `y` from `x` or a constant, followed by an index
pub fn branchy(count: usize) -> Program {
    let mut f = FunctionBuilder::new("branchy")
        .stmts(read_x())
        .stmt(Stmt::decl_init("y", ValueType::Scalar, Expr::int(0)));
    for i in 0..count {
        let cond = Expr::compare(CompOp::Gt, Expr::var("x"), Expr::int(i as i64));
        let assign_tainted = if i % 2 == 0 {
            Expr::binary(BinOp::Add, Expr::var("x"), Expr::int(1))
        } else {
            Expr::binary(BinOp::Mod, Expr::var("x"), Expr::int(10))
        };
        f = f.stmt(Stmt::if_else(
            cond,
            vec![Stmt::assign("y", assign_tainted)],
            vec![Stmt::assign("y", Expr::int(i as i64))],
        ));
    }
    buffer_program().with_function(
        f.stmt(Stmt::store_index("Buffer", Expr::var("y"), Expr::int(1)))
            .build(),
    )
}

/// Loop whose body shifts taint through `width` variables, one per
/// iteration, so the fixpoint needs about `width` iterations
pub fn shifting_loop(width: usize) -> Program {
    let mut f = FunctionBuilder::new("shift").stmts(read_x());
    for i in 0..width {
        f = f.stmt(Stmt::decl_init(
            format!("v{}", i),
            ValueType::Scalar,
            Expr::int(0),
        ));
    }
    let mut body = Vec::with_capacity(width + 1);
    for i in (1..width).rev() {
        body.push(Stmt::assign(
            format!("v{}", i),
            Expr::var(format!("v{}", i - 1)),
        ));
    }
    body.push(Stmt::assign("v0", Expr::var("x")));
    let last = format!("v{}", width.saturating_sub(1));
    body.push(Stmt::store_index("Buffer", Expr::var(last), Expr::int(1)));

    buffer_program().with_function(
        f.stmt(Stmt::while_loop(
            Expr::compare(CompOp::Gt, Expr::var("x"), Expr::int(0)),
            body,
        ))
        .build(),
    )
}

/// `count` globals; each `set_i` reads input into `g_i`, each `use_i`
/// indexes with `g_{i-1}`
pub fn global_web(count: usize) -> Program {
    let mut program = buffer_program();
    for i in 0..count {
        let g = format!("g{}", i);
        let prev = format!("g{}", (i + count - 1) % count);
        program = program
            .with_global(g.clone(), ValueType::Scalar)
            .with_function(
                FunctionBuilder::new(format!("set{}", i).as_str())
                    .stmt(Stmt::call(
                        "scanf",
                        vec![Expr::str("%d"), Expr::addr_of(g)],
                    ))
                    .build(),
            )
            .with_function(
                FunctionBuilder::new(format!("use{}", i).as_str())
                    .stmt(Stmt::store_index(
                        "Buffer",
                        Expr::var(prev),
                        Expr::int(1),
                    ))
                    .build(),
            );
    }
    program
}
