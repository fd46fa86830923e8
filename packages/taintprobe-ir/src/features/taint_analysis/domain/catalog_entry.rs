// Catalog entries: argument taint-flow rules keyed by qualified name

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::diagnostic::DiagnosticKind;
use crate::shared::models::QualifiedName;

/// Position of a value at a call site, as written in a rule
///
/// Textual forms: `N` (0-based argument), `N..` (argument N and every later
/// variadic argument), `return`, `receiver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArgPosition {
    Arg(usize),
    ArgsFrom(usize),
    Return,
    Receiver,
}

/// Concrete slot of one call site after expanding `N..` against its arity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CallSlot {
    Arg(usize),
    Return,
    Receiver,
}

impl ArgPosition {
    /// Slots this position denotes at a call with `arg_count` arguments.
    /// Argument positions past the end denote nothing.
    pub fn expand(&self, arg_count: usize) -> Vec<CallSlot> {
        match *self {
            ArgPosition::Arg(i) if i < arg_count => vec![CallSlot::Arg(i)],
            ArgPosition::Arg(_) => Vec::new(),
            ArgPosition::ArgsFrom(i) => (i..arg_count).map(CallSlot::Arg).collect(),
            ArgPosition::Return => vec![CallSlot::Return],
            ArgPosition::Receiver => vec![CallSlot::Receiver],
        }
    }

    pub fn is_return(&self) -> bool {
        matches!(self, ArgPosition::Return)
    }
}

/// Expand and deduplicate a list of positions
pub fn expand_positions(positions: &[ArgPosition], arg_count: usize) -> Vec<CallSlot> {
    let mut slots: Vec<CallSlot> = positions
        .iter()
        .flat_map(|p| p.expand(arg_count))
        .collect();
    slots.sort();
    slots.dedup();
    slots
}

impl FromStr for ArgPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "return" | "ret" => return Ok(ArgPosition::Return),
            "receiver" | "this" => return Ok(ArgPosition::Receiver),
            _ => {}
        }
        if let Some(start) = s.strip_suffix("..") {
            return start
                .parse::<usize>()
                .map(ArgPosition::ArgsFrom)
                .map_err(|_| format!("'{}' is not a valid argument range", s));
        }
        s.parse::<usize>()
            .map(ArgPosition::Arg)
            .map_err(|_| format!("'{}' is not a valid argument position", s))
    }
}

impl fmt::Display for ArgPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgPosition::Arg(i) => write!(f, "{}", i),
            ArgPosition::ArgsFrom(i) => write!(f, "{}..", i),
            ArgPosition::Return => f.write_str("return"),
            ArgPosition::Receiver => f.write_str("receiver"),
        }
    }
}

impl Serialize for ArgPosition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ArgPosition {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Index(usize),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Index(i) => Ok(ArgPosition::Arg(i)),
            Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Where a catalog entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EntryOrigin {
    #[default]
    Builtin,
    User,
}

/// Source: the listed outputs become Tainted after the call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRule {
    pub name: QualifiedName,
    pub taints: Vec<ArgPosition>,
    #[serde(default)]
    pub origin: EntryOrigin,
}

/// Propagator: the join of `from` flows into every `to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagatorRule {
    pub name: QualifiedName,
    pub from: Vec<ArgPosition>,
    pub to: Vec<ArgPosition>,
    #[serde(default)]
    pub origin: EntryOrigin,
}

/// Filter: the listed outputs become Clean after the call, unconditionally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    pub name: QualifiedName,
    pub cleans: Vec<ArgPosition>,
    #[serde(default)]
    pub origin: EntryOrigin,
}

/// Sink: a non-clean value at any listed argument triggers `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkRule {
    pub name: QualifiedName,
    pub checks: Vec<ArgPosition>,
    pub kind: DiagnosticKind,
    #[serde(default)]
    pub origin: EntryOrigin,
}

impl SourceRule {
    pub fn new(name: &str, taints: &[ArgPosition]) -> Self {
        Self {
            name: QualifiedName::new(name),
            taints: taints.to_vec(),
            origin: EntryOrigin::Builtin,
        }
    }
}

impl PropagatorRule {
    pub fn new(name: &str, from: &[ArgPosition], to: &[ArgPosition]) -> Self {
        Self {
            name: QualifiedName::new(name),
            from: from.to_vec(),
            to: to.to_vec(),
            origin: EntryOrigin::Builtin,
        }
    }
}

impl FilterRule {
    pub fn new(name: &str, cleans: &[ArgPosition]) -> Self {
        Self {
            name: QualifiedName::new(name),
            cleans: cleans.to_vec(),
            origin: EntryOrigin::Builtin,
        }
    }
}

impl SinkRule {
    pub fn new(name: &str, checks: &[ArgPosition], kind: DiagnosticKind) -> Self {
        Self {
            name: QualifiedName::new(name),
            checks: checks.to_vec(),
            kind,
            origin: EntryOrigin::Builtin,
        }
    }
}
