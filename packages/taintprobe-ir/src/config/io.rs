//! Catalog file I/O (YAML)
//!
//! Defines the on-disk schema. Entries are kept as raw strings here and
//! validated into catalog rules by `CatalogConfig`.

use serde::{Deserialize, Serialize};

use super::analysis_config::AnalysisOverrides;
use crate::features::taint_analysis::domain::DiagnosticKind;

/// Catalog schema versions this build reads
pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// YAML Schema v1
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogFileV1 {
    /// Schema version (always 1 for v1)
    #[serde(default)]
    pub version: Option<u32>,

    /// Analysis setting overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisOverrides>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub propagators: Vec<PropagatorSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sinks: Vec<SinkSpec>,
}

/// Argument position as written: `0`, `"0"`, `"1.."`, `return`, `receiver`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionSpec {
    Index(usize),
    Text(String),
}

impl PositionSpec {
    pub fn as_text(&self) -> String {
        match self {
            PositionSpec::Index(i) => i.to_string(),
            PositionSpec::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    pub name: String,
    #[serde(default)]
    pub taints: Vec<PositionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropagatorSpec {
    pub name: String,
    #[serde(default)]
    pub from: Vec<PositionSpec>,
    #[serde(default)]
    pub to: Vec<PositionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSpec {
    pub name: String,
    #[serde(default)]
    pub args: Vec<PositionSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SinkSpec {
    pub name: String,
    #[serde(default)]
    pub args: Vec<PositionSpec>,
    /// Defaults to `untrusted_sink_argument`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<DiagnosticKind>,
}
