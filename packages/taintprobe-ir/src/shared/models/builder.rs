//! Construction helpers for the IR
//!
//! Front-ends and tests build programs through these instead of spelling
//! out nested boxes.
//!
//! ```rust,ignore
//! let f = FunctionBuilder::new("testSources1")
//!     .stmt(Stmt::decl("x", ValueType::Scalar))
//!     .stmt(Stmt::call("scanf", vec![Expr::str("%d"), Expr::addr_of("x")]))
//!     .stmt(Stmt::store_index("Buffer", Expr::var("x"), Expr::int(1)).at(25))
//!     .build();
//! ```

use super::ir::*;
use super::{QualifiedName, Span};

impl Expr {
    pub fn int(value: i64) -> Self {
        Expr::Int(value)
    }

    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(name.into())
    }

    pub fn addr_of(name: impl Into<String>) -> Self {
        Expr::AddrOf(Box::new(Place::Var(name.into())))
    }

    pub fn deref(name: impl Into<String>) -> Self {
        Expr::Deref(name.into())
    }

    pub fn index(base: impl Into<String>, index: Expr) -> Self {
        Expr::Index {
            base: base.into(),
            index: Box::new(index),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn compare(op: CompOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Compare {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn ternary(cond: Expr, then_expr: Expr, else_expr: Expr) -> Self {
        Expr::Ternary {
            cond: Box::new(cond),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
        }
    }

    pub fn assign(target: Place, value: Expr) -> Self {
        Expr::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    /// Free or namespaced function call
    pub fn call(callee: impl Into<QualifiedName>, args: Vec<Expr>) -> Self {
        Expr::Call(Call {
            callee: Callee::Direct(callee.into()),
            receiver: None,
            args,
            span: Span::zero(),
        })
    }

    /// Member call `receiver.method(args)`; `callee` is `Type::method`
    pub fn member_call(callee: impl Into<QualifiedName>, receiver: Expr, args: Vec<Expr>) -> Self {
        Expr::Call(Call {
            callee: Callee::Direct(callee.into()),
            receiver: Some(Box::new(receiver)),
            args,
            span: Span::zero(),
        })
    }

    /// Call through a function pointer
    pub fn indirect_call(target: Expr, args: Vec<Expr>) -> Self {
        Expr::Call(Call {
            callee: Callee::Indirect(Box::new(target)),
            receiver: None,
            args,
            span: Span::zero(),
        })
    }
}

impl Place {
    pub fn var(name: impl Into<String>) -> Self {
        Place::Var(name.into())
    }

    pub fn index(base: impl Into<String>, index: Expr) -> Self {
        Place::Index {
            base: base.into(),
            index: Box::new(index),
        }
    }

    pub fn deref(name: impl Into<String>) -> Self {
        Place::Deref(name.into())
    }
}

impl Stmt {
    /// Uninitialized local
    pub fn decl(name: impl Into<String>, ty: ValueType) -> Self {
        Stmt::Decl {
            name: name.into(),
            ty,
            init: None,
            constant: false,
            span: Span::zero(),
        }
    }

    /// Initialized local
    pub fn decl_init(name: impl Into<String>, ty: ValueType, init: Expr) -> Self {
        Stmt::Decl {
            name: name.into(),
            ty,
            init: Some(init),
            constant: false,
            span: Span::zero(),
        }
    }

    /// `constexpr` / `const` scalar
    pub fn constant(name: impl Into<String>, value: i64) -> Self {
        Stmt::Decl {
            name: name.into(),
            ty: ValueType::Scalar,
            init: Some(Expr::Int(value)),
            constant: true,
            span: Span::zero(),
        }
    }

    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Stmt::Assign {
            target: Place::Var(name.into()),
            value,
            span: Span::zero(),
        }
    }

    pub fn assign_to(target: Place, value: Expr) -> Self {
        Stmt::Assign {
            target,
            value,
            span: Span::zero(),
        }
    }

    /// `base[index] = value`
    pub fn store_index(base: impl Into<String>, index: Expr, value: Expr) -> Self {
        Stmt::Assign {
            target: Place::index(base, index),
            value,
            span: Span::zero(),
        }
    }

    pub fn compound(name: impl Into<String>, op: BinOp, value: Expr) -> Self {
        Stmt::CompoundAssign {
            target: Place::Var(name.into()),
            op,
            value,
            span: Span::zero(),
        }
    }

    pub fn increment(name: impl Into<String>) -> Self {
        Stmt::Step {
            target: Place::Var(name.into()),
            op: StepOp::Increment,
            span: Span::zero(),
        }
    }

    pub fn decrement(name: impl Into<String>) -> Self {
        Stmt::Step {
            target: Place::Var(name.into()),
            op: StepOp::Decrement,
            span: Span::zero(),
        }
    }

    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr {
            expr,
            span: Span::zero(),
        }
    }

    pub fn call(callee: impl Into<QualifiedName>, args: Vec<Expr>) -> Self {
        Stmt::expr(Expr::call(callee, args))
    }

    /// `stream >> t0 >> t1 ...` lowered to one `StreamType::operator>>` call
    pub fn extract(stream_type: &str, stream: Expr, targets: &[&str]) -> Self {
        let callee = QualifiedName::new(format!("{}::operator>>", stream_type));
        Stmt::expr(Expr::member_call(
            callee,
            stream,
            targets.iter().map(|t| Expr::var(*t)).collect(),
        ))
    }

    pub fn if_then(cond: Expr, then_branch: Vec<Stmt>) -> Self {
        Stmt::If {
            cond,
            then_branch,
            else_branch: Vec::new(),
            span: Span::zero(),
        }
    }

    pub fn if_else(cond: Expr, then_branch: Vec<Stmt>, else_branch: Vec<Stmt>) -> Self {
        Stmt::If {
            cond,
            then_branch,
            else_branch,
            span: Span::zero(),
        }
    }

    pub fn while_loop(cond: Expr, body: Vec<Stmt>) -> Self {
        Stmt::While {
            cond,
            body,
            span: Span::zero(),
        }
    }

    pub fn block(body: Vec<Stmt>) -> Self {
        Stmt::Block { body }
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Stmt::Return {
            value,
            span: Span::zero(),
        }
    }

    /// Attach a single-line span
    pub fn at(self, line: u32) -> Self {
        self.with_span(Span::line(line))
    }

    pub fn with_span(mut self, new_span: Span) -> Self {
        match &mut self {
            Stmt::Decl { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::CompoundAssign { span, .. }
            | Stmt::Step { span, .. }
            | Stmt::Expr { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::Return { span, .. } => *span = new_span,
            Stmt::Block { .. } => {}
        }
        self
    }
}

/// Builder for function definitions
#[derive(Debug, Clone)]
pub struct FunctionBuilder {
    name: QualifiedName,
    params: Vec<Param>,
    body: Vec<Stmt>,
    span: Span,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<QualifiedName>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            body: Vec::new(),
            span: Span::zero(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
            passing: Passing::ByValue,
        });
        self
    }

    /// Reference or pointer parameter
    pub fn param_by_ref(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.params.push(Param {
            name: name.into(),
            ty,
            passing: Passing::ByReference,
        });
        self
    }

    pub fn stmt(mut self, stmt: Stmt) -> Self {
        self.body.push(stmt);
        self
    }

    pub fn stmts(mut self, stmts: impl IntoIterator<Item = Stmt>) -> Self {
        self.body.extend(stmts);
        self
    }

    pub fn at(mut self, line: u32) -> Self {
        self.span = Span::line(line);
        self
    }

    pub fn build(self) -> FunctionDef {
        FunctionDef {
            name: self.name,
            params: self.params,
            body: self.body,
            span: self.span,
        }
    }
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_global(mut self, name: impl Into<String>, ty: ValueType) -> Self {
        self.globals.push(GlobalDecl {
            name: name.into(),
            ty,
            init: None,
            constant: false,
        });
        self
    }

    pub fn with_global_init(mut self, name: impl Into<String>, ty: ValueType, init: Expr) -> Self {
        self.globals.push(GlobalDecl {
            name: name.into(),
            ty,
            init: Some(init),
            constant: false,
        });
        self
    }

    pub fn with_function(mut self, function: FunctionDef) -> Self {
        self.functions.push(function);
        self
    }
}
