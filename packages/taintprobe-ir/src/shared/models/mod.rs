//! Shared models

mod builder;
pub mod ir;
mod qualified_name;
mod span;

pub use builder::FunctionBuilder;
pub use ir::{
    BinOp, Call, Callee, CompOp, Expr, FunctionDef, GlobalDecl, Param, Passing, Place, Program,
    StepOp, Stmt, UnaryOp, ValueType,
};
pub use qualified_name::QualifiedName;
pub use span::Span;
