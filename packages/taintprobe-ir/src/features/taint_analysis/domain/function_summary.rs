// Callee summaries for on-demand interprocedural analysis
//
// A summary is the effect of one callee body under one abstract input
// pattern: the per-argument taint states plus the non-clean globals visible
// at the call. Summaries are memoized in an LRU cache so a callee reached
// again with the same pattern is not re-analyzed.

use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

use super::taint_state::TaintState;
use crate::shared::models::QualifiedName;

/// Abstract input pattern of a call
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummaryKey {
    pub callee: QualifiedName,

    /// State of each formal parameter on entry
    pub args: Vec<TaintState>,

    /// Non-clean globals on entry, sorted by name
    pub globals: Vec<(String, TaintState)>,
}

impl SummaryKey {
    pub fn new(
        callee: QualifiedName,
        args: Vec<TaintState>,
        globals: impl IntoIterator<Item = (String, TaintState)>,
    ) -> Self {
        let mut globals: Vec<(String, TaintState)> = globals
            .into_iter()
            .filter(|(_, state)| !state.is_clean())
            .collect();
        globals.sort();
        Self {
            callee,
            args,
            globals,
        }
    }
}

/// Effect of a callee under one input pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallSummary {
    pub callee: QualifiedName,

    /// Exit state of each formal; `Some` only for by-reference formals
    pub param_out: Vec<Option<TaintState>>,

    /// Join over every `return`
    pub return_state: TaintState,

    /// Exit state of every global the callee can observe
    pub globals_out: Vec<(String, TaintState)>,

    /// Produced by, or depends on, a recursion cut or the depth limit
    pub approximated: bool,
}

impl CallSummary {
    /// Summary used when the body is not analyzed (recursion cut, depth
    /// limit): everything the callee could write becomes Unknown.
    pub fn unknown(callee: QualifiedName, by_ref: &[bool]) -> Self {
        Self {
            callee,
            param_out: by_ref
                .iter()
                .map(|&r| r.then_some(TaintState::Unknown))
                .collect(),
            return_state: TaintState::Unknown,
            globals_out: Vec::new(),
            approximated: true,
        }
    }

    pub fn returns_taint(&self) -> bool {
        !self.return_state.is_clean()
    }
}

/// LRU cache for callee summaries
pub struct SummaryCache {
    cache: LruCache<SummaryKey, CallSummary>,
    hits: usize,
    misses: usize,
}

impl SummaryCache {
    /// Create a cache holding at most `max_size` summaries (at least one)
    pub fn new(max_size: usize) -> Self {
        let capacity = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a summary, updating hit/miss statistics
    pub fn get(&mut self, key: &SummaryKey) -> Option<&CallSummary> {
        match self.cache.get(key) {
            Some(summary) => {
                self.hits += 1;
                Some(summary)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, key: SummaryKey, summary: CallSummary) {
        self.cache.put(key, summary);
    }

    pub fn contains(&self, key: &SummaryKey) -> bool {
        self.cache.contains(key)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Cache hit rate (0.0-1.0)
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f32 / total as f32
        }
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn stats(&self) -> String {
        format!(
            "Cache: {} entries, {} hits, {} misses, {:.2}% hit rate",
            self.len(),
            self.hits,
            self.misses,
            self.hit_rate() * 100.0
        )
    }
}

impl Default for SummaryCache {
    fn default() -> Self {
        Self::new(10_000)
    }
}
