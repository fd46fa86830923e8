// Per-program-point taint environment
//
// Locals live in block scopes: a declaration records what it shadows and
// scope exit restores it. Globals are tracked flow-sensitively inside one
// function body through an overlay seeded from the global table. Non-zero
// facts come from guards such as `if (x != 0)` and die on reassignment.
// A bound `N` records that the value came out of `% N`; it is what lets an
// index into a container of capacity `N` or more go unreported.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::features::taint_analysis::domain::TaintState;
use crate::shared::models::{Passing, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Local,
    Param { index: usize, passing: Passing },
}

/// A local variable or parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    pub state: TaintState,
    pub ty: ValueType,
    /// Value of a `const` declaration with a literal initializer
    pub constant: Option<i64>,
    /// Modulus of the bounding idiom that produced the value
    pub bound: Option<i64>,
    pub kind: SlotKind,
}

impl Slot {
    pub fn local(ty: ValueType, state: TaintState) -> Self {
        Self {
            state,
            ty,
            constant: None,
            bound: None,
            kind: SlotKind::Local,
        }
    }
}

/// Bound of a merged value. A clean side needs no bound, so the other
/// side's bound carries; two non-clean sides keep the looser one.
pub fn join_bound(
    a: TaintState,
    a_bound: Option<i64>,
    b: TaintState,
    b_bound: Option<i64>,
) -> Option<i64> {
    if a.is_clean() {
        return b_bound;
    }
    if b.is_clean() {
        return a_bound;
    }
    match (a_bound, b_bound) {
        (Some(x), Some(y)) => Some(x.max(y)),
        _ => None,
    }
}

/// Result of resolving a name
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding<'a> {
    Local(&'a Slot),
    Global(TaintState),
    Missing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaintEnv {
    locals: FxHashMap<String, Slot>,
    globals: FxHashMap<String, TaintState>,
    nonzero: FxHashSet<String>,
    /// Per scope: declared names with the slot they shadowed
    scopes: Vec<Vec<(String, Option<Slot>)>>,
    reachable: bool,
}

impl TaintEnv {
    pub fn new(globals: FxHashMap<String, TaintState>) -> Self {
        Self {
            locals: FxHashMap::default(),
            globals,
            nonzero: FxHashSet::default(),
            scopes: vec![Vec::new()],
            reachable: true,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Vec::new());
    }

    /// Drop the innermost scope's locals and restore what they shadowed
    pub fn pop_scope(&mut self) {
        let Some(scope) = self.scopes.pop() else {
            return;
        };
        for (name, shadowed) in scope.into_iter().rev() {
            self.nonzero.remove(&name);
            match shadowed {
                Some(slot) => {
                    self.locals.insert(name, slot);
                }
                None => {
                    self.locals.remove(&name);
                }
            }
        }
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn declare(&mut self, name: &str, slot: Slot) {
        let shadowed = self.locals.insert(name.to_string(), slot);
        self.nonzero.remove(name);
        if let Some(scope) = self.scopes.last_mut() {
            scope.push((name.to_string(), shadowed));
        }
    }

    pub fn lookup(&self, name: &str) -> Binding<'_> {
        if let Some(slot) = self.locals.get(name) {
            return Binding::Local(slot);
        }
        match self.globals.get(name) {
            Some(state) => Binding::Global(*state),
            None => Binding::Missing,
        }
    }

    pub fn local(&self, name: &str) -> Option<&Slot> {
        self.locals.get(name)
    }

    pub fn is_local(&self, name: &str) -> bool {
        self.locals.contains_key(name)
    }

    pub fn is_global(&self, name: &str) -> bool {
        !self.is_local(name) && self.globals.contains_key(name)
    }

    /// Strong update of a local; returns false when `name` is not a local
    pub fn set_local(&mut self, name: &str, state: TaintState) -> bool {
        self.set_local_bounded(name, state, None)
    }

    /// Strong update of a local carrying the bound of the stored value
    pub fn set_local_bounded(&mut self, name: &str, state: TaintState, bound: Option<i64>) -> bool {
        match self.locals.get_mut(name) {
            Some(slot) => {
                slot.state = state;
                slot.constant = None;
                slot.bound = bound;
                true
            }
            None => false,
        }
    }

    /// Strong update of the global overlay
    pub fn set_global(&mut self, name: &str, state: TaintState) {
        self.globals.insert(name.to_string(), state);
    }

    pub fn globals(&self) -> &FxHashMap<String, TaintState> {
        &self.globals
    }

    pub fn locals(&self) -> impl Iterator<Item = (&String, &Slot)> {
        self.locals.iter()
    }

    pub fn mark_nonzero(&mut self, name: &str) {
        self.nonzero.insert(name.to_string());
    }

    pub fn forget_nonzero(&mut self, name: &str) {
        self.nonzero.remove(name);
    }

    pub fn forget_bound(&mut self, name: &str) {
        if let Some(slot) = self.locals.get_mut(name) {
            slot.bound = None;
        }
    }

    pub fn is_nonzero(&self, name: &str) -> bool {
        self.nonzero.contains(name)
    }

    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    pub fn mark_unreachable(&mut self) {
        self.reachable = false;
    }

    /// Merge point: states join, facts intersect, constants survive only
    /// when equal. An unreachable side contributes nothing.
    pub fn join(&self, other: &TaintEnv) -> TaintEnv {
        if !self.reachable {
            return other.clone();
        }
        if !other.reachable {
            return self.clone();
        }

        let mut merged = self.clone();
        for (name, slot) in merged.locals.iter_mut() {
            if let Some(theirs) = other.locals.get(name) {
                slot.bound = join_bound(slot.state, slot.bound, theirs.state, theirs.bound);
                slot.state = slot.state.join(theirs.state);
                if slot.constant != theirs.constant {
                    slot.constant = None;
                }
            }
        }
        for (name, state) in &other.globals {
            let entry = merged.globals.entry(name.clone()).or_default();
            *entry = entry.join(*state);
        }
        merged.nonzero.retain(|name| other.nonzero.contains(name));
        merged
    }
}
