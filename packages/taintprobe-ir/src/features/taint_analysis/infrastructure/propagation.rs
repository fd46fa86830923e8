// Intraprocedural propagation engine
//
// Walks one function body statement by statement, threading a `TaintEnv`
// through assignments, arithmetic, calls, branches and loops. Sink checks
// happen inline as operands are evaluated. Calls to functions defined in
// the program descend through `AnalysisContext::summarize`.
//
// Transfer rules:
// - `y = x` is a strong update; a clean value clears taint
// - `x op= c`, `x++`, `x--` with constant `c` leave the state unchanged
// - `x % N` with a positive constant `N` keeps its state but is bounded by
//   `N`; indexing a container whose capacity is at least `N` is not a sink
// - other operators join their operands
// - `a[i] = v` weakly updates `a`
// - `if`/`?:` join both arms; `while` iterates to a fixpoint

use rustc_hash::FxHashMap;
use tracing::trace;

use super::catalog::CatalogMatch;
use super::checker::SinkUse;
use super::env::{join_bound, Binding, Slot, SlotKind, TaintEnv};
use super::errors::TaintError;
use super::interprocedural::AnalysisContext;
use crate::config::TernaryNarrowing;
use crate::features::taint_analysis::domain::{
    expand_positions, CallSlot, CallSummary, DiagnosticKind, TaintState,
};
use crate::shared::models::{
    BinOp, Call, Callee, CompOp, Expr, FunctionDef, Passing, Place, QualifiedName, Span, Stmt,
    UnaryOp,
};

/// Abstract value of an evaluated expression
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Eval {
    pub state: TaintState,
    /// First non-clean variable that contributed
    pub origin: Option<String>,
    /// Compile-time value, when known
    pub constant: Option<i64>,
    /// Exclusive magnitude bound from `% N`
    pub bound: Option<i64>,
}

impl Eval {
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn of(state: TaintState) -> Self {
        Self {
            state,
            origin: None,
            constant: None,
            bound: None,
        }
    }

    fn literal(value: i64) -> Self {
        Self {
            state: TaintState::Clean,
            origin: None,
            constant: Some(value),
            bound: None,
        }
    }

    /// Join keeping the origin of the dirtier side
    pub fn join(self, other: Eval) -> Eval {
        let origin = if other.state > self.state {
            other.origin
        } else {
            self.origin.or(other.origin)
        };
        let origin = if self.state.join(other.state).is_clean() {
            None
        } else {
            origin
        };
        Eval {
            state: self.state.join(other.state),
            origin,
            constant: None,
            bound: join_bound(self.state, self.bound, other.state, other.bound),
        }
    }
}

fn var_vs_zero<'a>(lhs: &'a Expr, rhs: &'a Expr) -> Option<&'a str> {
    match (lhs, rhs) {
        (Expr::Var(v), other) | (other, Expr::Var(v)) if other.as_int() == Some(0) => {
            Some(v.as_str())
        }
        _ => None,
    }
}

/// Non-zero facts a condition establishes on its true and false edges
fn guard_facts(cond: &Expr) -> (Option<&str>, Option<&str>) {
    match cond {
        Expr::Var(v) => (Some(v.as_str()), None),
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => match operand.as_ref() {
            Expr::Var(v) => (None, Some(v.as_str())),
            _ => (None, None),
        },
        Expr::Compare { op, lhs, rhs } => match (op, var_vs_zero(lhs, rhs)) {
            (CompOp::NotEq, Some(v)) => (Some(v), None),
            (CompOp::Eq, Some(v)) => (None, Some(v)),
            (CompOp::Gt | CompOp::Lt, Some(v)) => (Some(v), None),
            _ => (None, None),
        },
        _ => (None, None),
    }
}

/// `v == lit` / `lit == v` / `v != lit`: the variable and whether equality
/// holds on the true edge
fn equality_with_literal(cond: &Expr) -> Option<(&str, bool)> {
    let Expr::Compare { op, lhs, rhs } = cond else {
        return None;
    };
    let var = match (lhs.as_ref(), rhs.as_ref()) {
        (Expr::Var(v), other) | (other, Expr::Var(v)) if other.is_literal() => v.as_str(),
        _ => return None,
    };
    match op {
        CompOp::Eq => Some((var, true)),
        CompOp::NotEq => Some((var, false)),
        _ => None,
    }
}

fn fold(op: BinOp, lhs: i64, rhs: i64) -> Option<i64> {
    match op {
        BinOp::Add => lhs.checked_add(rhs),
        BinOp::Sub => lhs.checked_sub(rhs),
        BinOp::Mul => lhs.checked_mul(rhs),
        BinOp::Div => lhs.checked_div(rhs),
        BinOp::Mod => lhs.checked_rem(rhs),
        BinOp::BitAnd => Some(lhs & rhs),
        BinOp::BitOr => Some(lhs | rhs),
        BinOp::BitXor => Some(lhs ^ rhs),
        _ => None,
    }
}

fn value_at(slot: CallSlot, args: &[Eval], receiver: &Option<Eval>) -> Eval {
    match slot {
        CallSlot::Arg(i) => args.get(i).cloned().unwrap_or_default(),
        CallSlot::Receiver => receiver.clone().unwrap_or_default(),
        CallSlot::Return => Eval::clean(),
    }
}

/// Analyzer for one function body under one input pattern
pub struct FunctionAnalyzer<'c, 'p> {
    ctx: &'c mut AnalysisContext<'p>,
    function: QualifiedName,
    return_state: TaintState,
    exit_env: Option<TaintEnv>,
    /// Statement path of the statement being analyzed
    site: Vec<u32>,
    /// Sink checks so far within that statement
    ordinal: u32,
    /// A callee summary on this path was cut short
    approximated: bool,
}

impl<'c, 'p> FunctionAnalyzer<'c, 'p> {
    pub fn new(ctx: &'c mut AnalysisContext<'p>, function: QualifiedName) -> Self {
        Self {
            ctx,
            function,
            return_state: TaintState::Clean,
            exit_env: None,
            site: Vec::new(),
            ordinal: 0,
            approximated: false,
        }
    }

    /// Analyze `def` with the given parameter and global states
    pub fn run(
        mut self,
        def: &FunctionDef,
        args: &[TaintState],
        globals: FxHashMap<String, TaintState>,
    ) -> CallSummary {
        let mut env = TaintEnv::new(globals);
        for (index, param) in def.params.iter().enumerate() {
            let state = args.get(index).copied().unwrap_or(TaintState::Unknown);
            env.declare(
                &param.name,
                Slot {
                    state,
                    ty: param.ty.clone(),
                    constant: None,
                    bound: None,
                    kind: SlotKind::Param {
                        index,
                        passing: param.passing,
                    },
                },
            );
        }

        self.exec_block(&mut env, &def.body);
        self.record_exit(&env);

        let exit = self.exit_env.take().unwrap_or(env);
        let param_out = def
            .params
            .iter()
            .map(|param| match param.passing {
                Passing::ByReference => exit.local(&param.name).map(|slot| slot.state),
                Passing::ByValue => None,
            })
            .collect();
        let mut globals_out: Vec<(String, TaintState)> = exit
            .globals()
            .iter()
            .map(|(name, state)| (name.clone(), *state))
            .collect();
        globals_out.sort();

        trace!(
            function = %self.function,
            return_state = %self.return_state,
            "Function body analyzed"
        );

        CallSummary {
            callee: def.name.clone(),
            param_out,
            return_state: self.return_state,
            globals_out,
            approximated: self.approximated,
        }
    }

    /// State of a global initializer
    pub fn eval_initializer(
        mut self,
        expr: &Expr,
        globals: FxHashMap<String, TaintState>,
    ) -> Eval {
        let mut env = TaintEnv::new(globals);
        self.eval(&mut env, expr, Span::zero())
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn exec_block(&mut self, env: &mut TaintEnv, stmts: &[Stmt]) {
        for (index, stmt) in stmts.iter().enumerate() {
            if !env.is_reachable() {
                break;
            }
            self.site.push(index as u32);
            let saved = std::mem::replace(&mut self.ordinal, 0);
            self.exec_stmt(env, stmt);
            self.ordinal = saved;
            self.site.pop();
        }
    }

    /// Nested block in its own scope; `arm` tells branches apart
    fn exec_scoped(&mut self, env: &mut TaintEnv, stmts: &[Stmt], arm: u32) {
        self.site.push(arm);
        env.push_scope();
        self.exec_block(env, stmts);
        env.pop_scope();
        self.site.pop();
    }

    fn exec_stmt(&mut self, env: &mut TaintEnv, stmt: &Stmt) {
        let span = stmt.span();
        match stmt {
            Stmt::Decl {
                name,
                ty,
                init,
                constant,
                ..
            } => {
                let value = match init {
                    Some(expr) => self.eval(env, expr, span),
                    None => Eval::clean(),
                };
                env.declare(
                    name,
                    Slot {
                        state: value.state,
                        ty: ty.clone(),
                        constant: if *constant { value.constant } else { None },
                        bound: value.bound,
                        kind: SlotKind::Local,
                    },
                );
            }
            Stmt::Assign { target, value, .. } => {
                let value = self.eval(env, value, span);
                self.assign(env, target, value, span);
            }
            Stmt::CompoundAssign {
                target, op, value, ..
            } => self.compound_assign(env, target, *op, value, span),
            Stmt::Step { target, .. } => match target {
                Place::Index { base, index } => {
                    let idx = self.eval(env, index, span);
                    self.check_index(env, base, &idx, span);
                }
                Place::Var(name) | Place::Deref(name) => {
                    env.forget_nonzero(name);
                    env.forget_bound(name);
                }
            },
            Stmt::Expr { expr, .. } => {
                self.eval(env, expr, span);
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => {
                self.eval(env, cond, span);
                let (on_true, on_false) = guard_facts(cond);

                let mut then_env = env.clone();
                if let Some(var) = on_true {
                    then_env.mark_nonzero(var);
                }
                self.exec_scoped(&mut then_env, then_branch, 0);

                let mut else_env = env.clone();
                if let Some(var) = on_false {
                    else_env.mark_nonzero(var);
                }
                self.exec_scoped(&mut else_env, else_branch, 1);

                *env = then_env.join(&else_env);
            }
            Stmt::While { cond, body, .. } => self.exec_while(env, cond, body, span),
            Stmt::Block { body } => self.exec_scoped(env, body, 0),
            Stmt::Return { value, .. } => {
                if let Some(expr) = value {
                    let v = self.eval(env, expr, span);
                    self.return_state = self.return_state.join(v.state);
                }
                self.record_exit(env);
                env.mark_unreachable();
            }
        }
    }

    fn exec_while(&mut self, env: &mut TaintEnv, cond: &Expr, body: &[Stmt], span: Span) {
        let (on_true, on_false) = guard_facts(cond);
        let limit = self.ctx.config.loop_max_iterations;
        let entry = env.clone();
        let mut head = env.clone();
        let mut stable = false;

        for _ in 0..limit {
            self.ctx.stats.loop_iterations += 1;
            self.ordinal = 0;
            let mut body_env = head.clone();
            self.eval(&mut body_env, cond, span);
            if let Some(var) = on_true {
                body_env.mark_nonzero(var);
            }
            self.exec_scoped(&mut body_env, body, 0);

            let next = entry.join(&body_env);
            if next == head {
                stable = true;
                break;
            }
            head = next;
        }

        if !stable {
            self.ctx.warn(
                &self.function,
                span,
                TaintError::LoopLimitExceeded { iterations: limit },
            );
        }

        self.ordinal = 0;
        self.eval(&mut head, cond, span);
        if let Some(var) = on_false {
            head.mark_nonzero(var);
        }
        *env = head;
    }

    fn record_exit(&mut self, env: &TaintEnv) {
        if !env.is_reachable() {
            return;
        }
        self.exit_env = Some(match self.exit_env.take() {
            Some(exit) => exit.join(env),
            None => env.clone(),
        });
    }

    // ------------------------------------------------------------------
    // Stores
    // ------------------------------------------------------------------

    fn assign(&mut self, env: &mut TaintEnv, target: &Place, value: Eval, span: Span) {
        match target {
            Place::Var(name) | Place::Deref(name) => {
                self.write_bounded(env, name, value.state, value.bound, span)
            }
            Place::Index { base, index } => {
                let idx = self.eval(env, index, span);
                self.check_index(env, base, &idx, span);
                self.write_weak(env, base, value.state, span);
            }
        }
    }

    fn compound_assign(
        &mut self,
        env: &mut TaintEnv,
        target: &Place,
        op: BinOp,
        value: &Expr,
        span: Span,
    ) {
        let rhs = self.eval(env, value, span);
        if op.is_division() {
            let divisor_var = match value {
                Expr::Var(v) => Some(v.as_str()),
                _ => None,
            };
            self.check_divisor(env, op, &rhs, divisor_var, span);
        }

        let updated = |current: TaintState| -> TaintState {
            match rhs.constant {
                Some(_) => current,
                None => current.join(rhs.state),
            }
        };
        let bound = rhs.constant.filter(|n| op == BinOp::Mod && *n > 0);

        match target {
            Place::Var(name) | Place::Deref(name) => {
                let current = self.read_var(env, name, span).state;
                self.write_bounded(env, name, updated(current), bound, span);
            }
            Place::Index { base, index } => {
                let idx = self.eval(env, index, span);
                self.check_index(env, base, &idx, span);
                let current = self.read_var(env, base, span).state;
                self.write_weak(env, base, updated(current), span);
            }
        }
    }

    /// Strong update
    fn write_var(&mut self, env: &mut TaintEnv, name: &str, state: TaintState, span: Span) {
        self.write_bounded(env, name, state, None, span);
    }

    /// Strong update remembering a modulo bound; globals keep only the state
    fn write_bounded(
        &mut self,
        env: &mut TaintEnv,
        name: &str,
        state: TaintState,
        bound: Option<i64>,
        span: Span,
    ) {
        env.forget_nonzero(name);
        if env.set_local_bounded(name, state, bound) {
            return;
        }
        if env.is_global(name) {
            env.set_global(name, state);
            self.ctx.globals.record_write(name, state);
            return;
        }
        self.unknown_variable(name, span);
    }

    /// Weak update: element stores join into the whole object
    fn write_weak(&mut self, env: &mut TaintEnv, name: &str, state: TaintState, span: Span) {
        let joined = match env.lookup(name) {
            Binding::Local(slot) => slot.state.join(state),
            Binding::Global(current) => current.join(state),
            Binding::Missing => {
                self.unknown_variable(name, span);
                return;
            }
        };
        if env.set_local(name, joined) {
            return;
        }
        env.set_global(name, joined);
        self.ctx.globals.record_write(name, joined);
    }

    /// Store a call's effect into the storage an argument expression names.
    /// Temporaries have no storage and are skipped.
    fn write_output(&mut self, env: &mut TaintEnv, arg: &Expr, state: TaintState, span: Span) {
        match arg {
            Expr::AddrOf(place) => match place.as_ref() {
                Place::Var(name) | Place::Deref(name) => self.write_var(env, name, state, span),
                Place::Index { base, .. } => self.write_weak(env, base, state, span),
            },
            Expr::Var(name) | Expr::Deref(name) => self.write_var(env, name, state, span),
            Expr::Index { base, .. } => self.write_weak(env, base, state, span),
            _ => {}
        }
    }

    /// Whether an unknown callee could write through `arg`
    fn is_writable_arg(&self, env: &TaintEnv, arg: &Expr) -> bool {
        match arg {
            Expr::AddrOf(_) | Expr::Deref(_) => true,
            Expr::Var(name) => match env.lookup(name) {
                Binding::Local(slot) => slot.ty.is_addressable(),
                Binding::Global(_) => self
                    .ctx
                    .globals
                    .get(name)
                    .is_some_and(|g| g.ty.is_addressable()),
                Binding::Missing => false,
            },
            _ => false,
        }
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------

    fn read_var(&mut self, env: &TaintEnv, name: &str, span: Span) -> Eval {
        match env.lookup(name) {
            Binding::Local(slot) => Eval {
                state: slot.state,
                origin: (!slot.state.is_clean()).then(|| name.to_string()),
                constant: slot.constant,
                bound: slot.bound,
            },
            Binding::Global(state) => Eval {
                state,
                origin: (!state.is_clean()).then(|| name.to_string()),
                constant: self.ctx.globals.constant(name),
                bound: None,
            },
            // Namespace-scope objects outside the program (`std::cin`)
            Binding::Missing if name.contains("::") => Eval::clean(),
            Binding::Missing => {
                self.unknown_variable(name, span);
                Eval {
                    state: TaintState::Unknown,
                    origin: Some(name.to_string()),
                    constant: None,
                    bound: None,
                }
            }
        }
    }

    pub(crate) fn eval(&mut self, env: &mut TaintEnv, expr: &Expr, span: Span) -> Eval {
        match expr {
            Expr::Int(v) => Eval::literal(*v),
            Expr::Str(_) => Eval::clean(),
            Expr::Var(name) | Expr::Deref(name) => self.read_var(env, name, span),
            Expr::AddrOf(place) => match place.as_ref() {
                Place::Var(name) | Place::Deref(name) => {
                    let mut v = self.read_var(env, name, span);
                    v.constant = None;
                    v.bound = None;
                    v
                }
                Place::Index { base, index } => self.eval_index(env, base, index, span),
            },
            Expr::Index { base, index } => self.eval_index(env, base, index, span),
            Expr::Unary { op, operand } => {
                let v = self.eval(env, operand, span);
                let constant = match op {
                    UnaryOp::Neg => v.constant.and_then(i64::checked_neg),
                    UnaryOp::Pos => v.constant,
                    UnaryOp::Not => v.constant.map(|c| (c == 0) as i64),
                    UnaryOp::Invert => v.constant.map(|c| !c),
                };
                let bound = match op {
                    UnaryOp::Pos => v.bound,
                    _ => None,
                };
                Eval {
                    constant,
                    bound,
                    ..v
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                let l = self.eval(env, lhs, span);
                let r = self.eval(env, rhs, span);
                if op.is_division() {
                    let divisor_var = match rhs.as_ref() {
                        Expr::Var(v) => Some(v.as_str()),
                        _ => None,
                    };
                    self.check_divisor(env, *op, &r, divisor_var, span);
                }

                let constant = match (l.constant, r.constant) {
                    (Some(a), Some(b)) => fold(*op, a, b),
                    _ => None,
                };
                let bound = r.constant.filter(|n| *op == BinOp::Mod && *n > 0);
                Eval {
                    constant,
                    bound,
                    ..l.join(r)
                }
            }
            Expr::Compare { lhs, rhs, .. } => {
                let l = self.eval(env, lhs, span);
                let r = self.eval(env, rhs, span);
                Eval {
                    bound: None,
                    ..l.join(r)
                }
            }
            Expr::Ternary {
                cond,
                then_expr,
                else_expr,
            } => self.eval_ternary(env, cond, then_expr, else_expr, span),
            Expr::Assign { target, value } => {
                let v = self.eval(env, value, span);
                self.assign(env, target, v.clone(), span);
                v
            }
            Expr::Call(call) => self.eval_call(env, call, span),
        }
    }

    fn eval_index(&mut self, env: &mut TaintEnv, base: &str, index: &Expr, span: Span) -> Eval {
        let idx = self.eval(env, index, span);
        self.check_index(env, base, &idx, span);
        let container = self.read_var(env, base, span);
        Eval {
            bound: None,
            ..container.join(idx)
        }
    }

    fn eval_ternary(
        &mut self,
        env: &mut TaintEnv,
        cond: &Expr,
        then_expr: &Expr,
        else_expr: &Expr,
        span: Span,
    ) -> Eval {
        self.eval(env, cond, span);

        let narrowed = match self.ctx.config.ternary_narrowing {
            TernaryNarrowing::EqualityLiteral => equality_with_literal(cond),
            TernaryNarrowing::Conservative => None,
        };

        let mut then_env = env.clone();
        let mut else_env = env.clone();
        if let Some((var, equal_on_true)) = narrowed {
            let arm = if equal_on_true {
                &mut then_env
            } else {
                &mut else_env
            };
            if !arm.set_local(var, TaintState::Clean) && arm.is_global(var) {
                arm.set_global(var, TaintState::Clean);
            }
        }

        let a = self.eval(&mut then_env, then_expr, span);
        let b = self.eval(&mut else_env, else_expr, span);
        *env = then_env.join(&else_env);
        a.join(b)
    }

    // ------------------------------------------------------------------
    // Calls
    // ------------------------------------------------------------------

    fn eval_call(&mut self, env: &mut TaintEnv, call: &Call, span: Span) -> Eval {
        let span = if call.span.is_zero() { span } else { call.span };
        let receiver = call
            .receiver
            .as_ref()
            .map(|r| self.eval(env, r, span));
        let args: Vec<Eval> = call.args.iter().map(|a| self.eval(env, a, span)).collect();

        match &call.callee {
            Callee::Direct(name) => {
                let catalog = self.ctx.catalog;
                if let Some(found) = catalog.lookup(name) {
                    return self.apply_catalog(env, call, name, found, &receiver, &args, span);
                }
                if let Some(def) = self.ctx.function(name) {
                    return self.apply_callee(env, call, def, &args, span);
                }
                self.apply_unresolved(env, call, name.as_str(), span)
            }
            Callee::Indirect(target) => {
                self.eval(env, target, span);
                self.apply_unresolved(env, call, "<indirect>", span)
            }
        }
    }

    /// Sink check on pre-call states, then propagator and source. The filter
    /// runs last so its cleaning wins over any other role of the same name.
    #[allow(clippy::too_many_arguments)]
    fn apply_catalog(
        &mut self,
        env: &mut TaintEnv,
        call: &Call,
        name: &QualifiedName,
        found: CatalogMatch<'_>,
        receiver: &Option<Eval>,
        args: &[Eval],
        span: Span,
    ) -> Eval {
        let arity = call.args.len();
        let mut ret = Eval::clean();

        if let Some(rule) = found.sink {
            for slot in expand_positions(&rule.checks, arity) {
                let value = value_at(slot, args, receiver);
                self.report(rule.kind, name.as_str(), span, &value, false);
            }
        }

        if let Some(rule) = found.propagator {
            let input = expand_positions(&rule.from, arity)
                .into_iter()
                .map(|slot| value_at(slot, args, receiver))
                .fold(Eval::clean(), Eval::join);
            let input = Eval {
                bound: None,
                ..input
            };
            for slot in expand_positions(&rule.to, arity) {
                if slot == CallSlot::Return {
                    ret = ret.join(input.clone());
                } else {
                    self.store_slot(env, call, slot, input.state, &mut ret, span);
                }
            }
        }

        if let Some(rule) = found.source {
            for slot in expand_positions(&rule.taints, arity) {
                self.store_slot(env, call, slot, TaintState::Tainted, &mut ret, span);
            }
        }

        if let Some(rule) = found.filter {
            for slot in expand_positions(&rule.cleans, arity) {
                self.store_slot(env, call, slot, TaintState::Clean, &mut ret, span);
            }
        }

        ret
    }

    fn store_slot(
        &mut self,
        env: &mut TaintEnv,
        call: &Call,
        slot: CallSlot,
        state: TaintState,
        ret: &mut Eval,
        span: Span,
    ) {
        match slot {
            CallSlot::Return => *ret = Eval::of(state),
            CallSlot::Arg(i) => {
                if let Some(arg) = call.args.get(i) {
                    self.write_output(env, arg, state, span);
                }
            }
            CallSlot::Receiver => {
                if let Some(receiver) = &call.receiver {
                    self.write_output(env, receiver, state, span);
                }
            }
        }
    }

    fn apply_callee(
        &mut self,
        env: &mut TaintEnv,
        call: &Call,
        def: &'p FunctionDef,
        args: &[Eval],
        span: Span,
    ) -> Eval {
        let arg_states: Vec<TaintState> = (0..def.params.len())
            .map(|i| args.get(i).map_or(TaintState::Unknown, |a| a.state))
            .collect();
        let summary = self
            .ctx
            .summarize(def, arg_states, env.globals().clone(), span);
        self.approximated |= summary.approximated;

        for (i, out) in summary.param_out.iter().enumerate() {
            if let (Some(state), Some(arg)) = (out, call.args.get(i)) {
                self.write_output(env, arg, *state, span);
            }
        }
        for (name, state) in &summary.globals_out {
            if env.is_global(name) {
                env.set_global(name, *state);
            }
        }

        Eval::of(summary.return_state)
    }

    /// Unknown for the result and for everything the callee could write
    fn apply_unresolved(
        &mut self,
        env: &mut TaintEnv,
        call: &Call,
        callee: &str,
        span: Span,
    ) -> Eval {
        self.ctx.warn(
            &self.function,
            span,
            TaintError::UnresolvedCall {
                callee: callee.to_string(),
            },
        );

        let outputs = call.args.iter().chain(call.receiver.as_deref());
        for arg in outputs {
            if !self.is_writable_arg(env, arg) {
                continue;
            }
            let root = match arg {
                Expr::AddrOf(place) => place.root().to_string(),
                Expr::Var(name) | Expr::Deref(name) => name.clone(),
                _ => continue,
            };
            let current = self.read_var(env, &root, span).state;
            self.write_output(env, arg, current.join(TaintState::Unknown), span);
        }

        Eval::of(TaintState::Unknown)
    }

    // ------------------------------------------------------------------
    // Sinks
    // ------------------------------------------------------------------

    /// Index into `base`; a `% N` bound no larger than the container's
    /// declared capacity keeps the access in range
    fn check_index(&mut self, env: &TaintEnv, base: &str, index: &Eval, span: Span) {
        let capacity = match env.lookup(base) {
            Binding::Local(slot) => slot.ty.capacity(),
            Binding::Global(_) => self.ctx.globals.get(base).and_then(|g| g.ty.capacity()),
            Binding::Missing => None,
        };
        let in_range = match (index.bound, capacity) {
            (Some(n), Some(capacity)) => n > 0 && n as u64 <= capacity,
            _ => false,
        };
        self.report(DiagnosticKind::OutOfBoundsAccess, "operator[]", span, index, in_range);
    }

    fn check_divisor(
        &mut self,
        env: &TaintEnv,
        op: BinOp,
        divisor: &Eval,
        divisor_var: Option<&str>,
        span: Span,
    ) {
        let proven_nonzero = divisor.constant.is_some_and(|c| c != 0)
            || divisor_var.is_some_and(|v| env.is_nonzero(v));
        let sink = match op {
            BinOp::Mod => "operator%",
            _ => "operator/",
        };
        self.report(DiagnosticKind::TaintedDivision, sink, span, divisor, proven_nonzero);
    }

    /// Allocate the next sink site of the current statement and check it.
    /// The site is allocated even when the check is suppressed so that
    /// later sinks in the statement keep their identity across visits.
    fn report(
        &mut self,
        kind: DiagnosticKind,
        sink: &str,
        span: Span,
        value: &Eval,
        suppressed: bool,
    ) {
        let mut site = self.site.clone();
        site.push(self.ordinal);
        self.ordinal += 1;
        if suppressed {
            return;
        }

        let ctx = &mut *self.ctx;
        ctx.collector.check(
            ctx.config.unknown_policy,
            &self.function,
            &ctx.call_stack,
            &site,
            SinkUse {
                kind,
                sink: sink.to_string(),
                span,
                variable: value.origin.clone(),
                state: value.state,
            },
        );
    }

    fn unknown_variable(&mut self, name: &str, span: Span) {
        self.ctx.warn(
            &self.function,
            span,
            TaintError::UnknownVariable {
                name: name.to_string(),
            },
        );
    }
}
