//! Procedural IR analyzed by the taint engine
//!
//! A small imperative language: declarations, assignments (plain, compound,
//! increment/decrement), calls, branches, loops and returns over scalar,
//! buffer, string and object-typed variables. Front-ends lower C/C++ into
//! this form; the engine never sees source text.
//!
//! All types serialize to externally tagged JSON so programs can be stored
//! next to the snippets they were lowered from.

use serde::{Deserialize, Serialize};

use super::{QualifiedName, Span};

/// Binary arithmetic / bitwise / logical operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,

    // Logical (short-circuit)
    And,
    Or,
}

impl BinOp {
    /// Operators whose right operand is a divisor
    pub fn is_division(&self) -> bool {
        matches!(self, BinOp::Div | BinOp::Mod)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::LShift => "<<",
            BinOp::RShift => ">>",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Comparison operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
}

/// Unary operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    Invert,
}

/// Increment / decrement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepOp {
    Increment,
    Decrement,
}

/// Declared type of a storage location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// int, size_t, char, ...
    Scalar,
    /// Fixed-size array or raw buffer
    Buffer { capacity: Option<u64> },
    /// Pointer to scalar or buffer
    Pointer,
    /// std::string and friends
    String,
    /// Any other class type (streams, handles)
    Object { type_name: String },
}

impl ValueType {
    pub fn buffer(capacity: u64) -> Self {
        ValueType::Buffer {
            capacity: Some(capacity),
        }
    }

    pub fn object(type_name: impl Into<String>) -> Self {
        ValueType::Object {
            type_name: type_name.into(),
        }
    }

    /// Whether a bare mention of the variable as a call argument lets the
    /// callee write through it (arrays decay to pointers, objects are passed
    /// by reference in the member/stream APIs the catalog models).
    pub fn is_addressable(&self) -> bool {
        !matches!(self, ValueType::Scalar)
    }

    pub fn capacity(&self) -> Option<u64> {
        match self {
            ValueType::Buffer { capacity } => *capacity,
            _ => None,
        }
    }
}

/// Parameter passing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Passing {
    #[default]
    ByValue,
    /// C++ reference or pointer parameter; stores are visible to the caller
    ByReference,
}

/// Formal parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub ty: ValueType,
    #[serde(default)]
    pub passing: Passing,
}

/// Assignable location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Place {
    /// `x`
    Var(String),
    /// `a[i]`
    Index { base: String, index: Box<Expr> },
    /// `*p`
    Deref(String),
}

impl Place {
    /// Variable whose storage this place lives in
    pub fn root(&self) -> &str {
        match self {
            Place::Var(name) | Place::Deref(name) => name,
            Place::Index { base, .. } => base,
        }
    }
}

/// Call target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Callee {
    /// Free, namespaced or member function named by its qualified name
    Direct(QualifiedName),
    /// Function pointer / virtual dispatch without a single resolved target
    Indirect(Box<Expr>),
}

/// Call site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub callee: Callee,
    /// Object for member calls (`obj.f(..)`, `stream >> x`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Box<Expr>>,
    #[serde(default)]
    pub args: Vec<Expr>,
    #[serde(default, skip_serializing_if = "Span::is_zero")]
    pub span: Span,
}

impl Call {
    pub fn callee_name(&self) -> Option<&QualifiedName> {
        match &self.callee {
            Callee::Direct(name) => Some(name),
            Callee::Indirect(_) => None,
        }
    }
}

/// Expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// Integer literal
    Int(i64),
    /// String literal
    Str(String),
    /// Variable read
    Var(String),
    /// `&place`
    AddrOf(Box<Place>),
    /// `*p`
    Deref(String),
    /// `a[i]`
    Index { base: String, index: Box<Expr> },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Compare {
        op: CompOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `cond ? then_expr : else_expr`
    Ternary {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    /// Assignment used as a value: `z = (x = y)`
    Assign { target: Box<Place>, value: Box<Expr> },
    Call(Call),
}

impl Expr {
    /// Literal integer value, if this is one
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Expr::Int(v) => Some(*v),
            Expr::Unary {
                op: UnaryOp::Neg,
                operand,
            } => operand.as_int().map(|v| -v),
            _ => None,
        }
    }

    /// Whether the expression consists of literals only
    pub fn is_literal(&self) -> bool {
        matches!(self, Expr::Int(_) | Expr::Str(_)) || self.as_int().is_some()
    }
}

/// Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    /// Local declaration, optionally initialized
    Decl {
        name: String,
        ty: ValueType,
        #[serde(default)]
        init: Option<Expr>,
        /// `const` / `constexpr`
        #[serde(default)]
        constant: bool,
        #[serde(default)]
        span: Span,
    },
    Assign {
        target: Place,
        value: Expr,
        #[serde(default)]
        span: Span,
    },
    /// `x op= value`
    CompoundAssign {
        target: Place,
        op: BinOp,
        value: Expr,
        #[serde(default)]
        span: Span,
    },
    /// `x++`, `--x`
    Step {
        target: Place,
        op: StepOp,
        #[serde(default)]
        span: Span,
    },
    /// Expression statement (usually a call)
    Expr {
        expr: Expr,
        #[serde(default)]
        span: Span,
    },
    If {
        cond: Expr,
        then_branch: Vec<Stmt>,
        #[serde(default)]
        else_branch: Vec<Stmt>,
        #[serde(default)]
        span: Span,
    },
    While {
        cond: Expr,
        body: Vec<Stmt>,
        #[serde(default)]
        span: Span,
    },
    /// Nested scope
    Block { body: Vec<Stmt> },
    Return {
        #[serde(default)]
        value: Option<Expr>,
        #[serde(default)]
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Decl { span, .. }
            | Stmt::Assign { span, .. }
            | Stmt::CompoundAssign { span, .. }
            | Stmt::Step { span, .. }
            | Stmt::Expr { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::Return { span, .. } => *span,
            Stmt::Block { .. } => Span::zero(),
        }
    }
}

/// Function definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: QualifiedName,
    #[serde(default)]
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub span: Span,
}

/// Global (namespace-scope) variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalDecl {
    pub name: String,
    pub ty: ValueType,
    #[serde(default)]
    pub init: Option<Expr>,
    #[serde(default)]
    pub constant: bool,
}

/// Translation unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub globals: Vec<GlobalDecl>,
    #[serde(default)]
    pub functions: Vec<FunctionDef>,
}

impl Program {
    pub fn function(&self, name: &QualifiedName) -> Option<&FunctionDef> {
        self.functions.iter().find(|f| &f.name == name)
    }

    pub fn global(&self, name: &str) -> Option<&GlobalDecl> {
        self.globals.iter().find(|g| g.name == name)
    }
}
