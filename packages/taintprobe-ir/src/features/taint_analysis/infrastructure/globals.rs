// Process-wide global taint table
//
// One state per global, Clean at init (or the state of its initializer).
// Writes from any function join into the table, so a later read anywhere
// sees every write the analysis has observed. The whole-program driver
// re-runs until the table version stops moving.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::features::taint_analysis::domain::TaintState;
use crate::shared::models::ValueType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalEntry {
    pub state: TaintState,
    pub ty: ValueType,
    pub constant: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct GlobalTaintTable {
    entries: FxHashMap<String, GlobalEntry>,
    version: u64,
}

impl GlobalTaintTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, ty: ValueType, state: TaintState, constant: Option<i64>) {
        self.entries.insert(
            name.to_string(),
            GlobalEntry {
                state,
                ty,
                constant,
            },
        );
        self.version += 1;
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&GlobalEntry> {
        self.entries.get(name)
    }

    pub fn state(&self, name: &str) -> Option<TaintState> {
        self.entries.get(name).map(|e| e.state)
    }

    /// Value of a `const` global with a literal initializer
    pub fn constant(&self, name: &str) -> Option<i64> {
        self.entries.get(name).and_then(|e| e.constant)
    }

    /// Join `state` into the table; returns whether the table changed
    pub fn record_write(&mut self, name: &str, state: TaintState) -> bool {
        let Some(entry) = self.entries.get_mut(name) else {
            return false;
        };
        let joined = entry.state.join(state);
        if joined == entry.state {
            return false;
        }
        entry.state = joined;
        entry.constant = None;
        self.version += 1;
        true
    }

    /// Bumped on every change
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Current state of every global
    pub fn snapshot(&self) -> FxHashMap<String, TaintState> {
        self.entries
            .iter()
            .map(|(name, e)| (name.clone(), e.state))
            .collect()
    }

    /// Non-clean globals, sorted by name
    pub fn non_clean(&self) -> Vec<(String, TaintState)> {
        let mut out: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, e)| !e.state.is_clean())
            .map(|(name, e)| (name.clone(), e.state))
            .collect();
        out.sort();
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
