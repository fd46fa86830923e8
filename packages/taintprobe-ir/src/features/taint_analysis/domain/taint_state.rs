// Taint lattice
//
// Three-point lattice ordered Clean < Unknown < Tainted. Unknown is what the
// engine produces when it cannot see a definition (unresolved call, cut
// recursion, depth limit); sinks decide what to do with it via
// `UnknownPolicy`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::diagnostic::Certainty;
use crate::config::UnknownPolicy;

/// Taint state of a value
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum TaintState {
    #[default]
    Clean,
    Unknown,
    Tainted,
}

impl TaintState {
    /// Least upper bound
    #[inline]
    pub fn join(self, other: TaintState) -> TaintState {
        self.max(other)
    }

    /// Join of every state in `states` (Clean when empty)
    pub fn join_all(states: impl IntoIterator<Item = TaintState>) -> TaintState {
        states.into_iter().fold(TaintState::Clean, TaintState::join)
    }

    #[inline]
    pub fn is_clean(self) -> bool {
        self == TaintState::Clean
    }

    #[inline]
    pub fn is_tainted(self) -> bool {
        self == TaintState::Tainted
    }

    /// Whether a sink fed with this state reports, and how sure it is
    pub fn flagged(self, policy: UnknownPolicy) -> Option<Certainty> {
        match (self, policy) {
            (TaintState::Tainted, _) => Some(Certainty::Definite),
            (TaintState::Unknown, UnknownPolicy::Conservative) => Some(Certainty::Possible),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaintState::Clean => "clean",
            TaintState::Unknown => "unknown",
            TaintState::Tainted => "tainted",
        }
    }
}

impl fmt::Display for TaintState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
