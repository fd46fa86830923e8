//! Validated user catalog
//!
//! Loads a YAML catalog file, checks its version, and turns every entry
//! into a catalog rule. Any malformed or conflicting entry fails the whole
//! load.

use std::path::Path;

use rustc_hash::FxHashSet;
use tracing::info;

use super::analysis_config::{AnalysisConfig, AnalysisOverrides};
use super::error::{ConfigError, ConfigResult};
use super::io::{
    CatalogFileV1, FilterSpec, PositionSpec, PropagatorSpec, SinkSpec, SourceSpec,
    SUPPORTED_VERSIONS,
};
use crate::features::taint_analysis::domain::{
    ArgPosition, DiagnosticKind, EntryOrigin, FilterRule, PropagatorRule, SinkRule, SourceRule,
};
use crate::shared::models::QualifiedName;

/// User-declared catalog entries and analysis overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogConfig {
    pub analysis: Option<AnalysisOverrides>,
    pub sources: Vec<SourceRule>,
    pub propagators: Vec<PropagatorRule>,
    pub filters: Vec<FilterRule>,
    pub sinks: Vec<SinkRule>,
}

impl CatalogConfig {
    /// Load from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        info!(
            path = %path.display(),
            entries = config.len(),
            "Loaded catalog file"
        );
        Ok(config)
    }

    /// Parse YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: CatalogFileV1 = serde_yaml::from_str(content)?;
        Self::from_file(file)
    }

    /// Validate a parsed catalog file
    pub fn from_file(file: CatalogFileV1) -> ConfigResult<Self> {
        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        if let Some(overrides) = &file.analysis {
            overrides.apply(&AnalysisConfig::default())?;
        }

        let config = Self {
            analysis: file.analysis,
            sources: convert_all(&file.sources, source_rule)?,
            propagators: convert_all(&file.propagators, propagator_rule)?,
            filters: convert_all(&file.filters, filter_rule)?,
            sinks: convert_all(&file.sinks, sink_rule)?,
        };
        config.check_duplicates()?;
        Ok(config)
    }

    /// Serialize back to schema v1
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let positions = |ps: &[ArgPosition]| -> Vec<PositionSpec> {
            ps.iter().map(|p| PositionSpec::Text(p.to_string())).collect()
        };
        let file = CatalogFileV1 {
            version: Some(1),
            analysis: self.analysis.clone(),
            sources: self
                .sources
                .iter()
                .map(|r| SourceSpec {
                    name: r.name.to_string(),
                    taints: positions(&r.taints),
                })
                .collect(),
            propagators: self
                .propagators
                .iter()
                .map(|r| PropagatorSpec {
                    name: r.name.to_string(),
                    from: positions(&r.from),
                    to: positions(&r.to),
                })
                .collect(),
            filters: self
                .filters
                .iter()
                .map(|r| FilterSpec {
                    name: r.name.to_string(),
                    args: positions(&r.cleans),
                })
                .collect(),
            sinks: self
                .sinks
                .iter()
                .map(|r| SinkSpec {
                    name: r.name.to_string(),
                    args: positions(&r.checks),
                    kind: Some(r.kind),
                })
                .collect(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    /// Analysis settings with this file's overrides applied to `base`
    pub fn analysis_config(&self, base: &AnalysisConfig) -> ConfigResult<AnalysisConfig> {
        match &self.analysis {
            Some(overrides) => overrides.apply(base),
            None => Ok(base.clone()),
        }
    }

    /// Number of catalog entries
    pub fn len(&self) -> usize {
        self.sources.len() + self.propagators.len() + self.filters.len() + self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_duplicates(&self) -> ConfigResult<()> {
        unique("source", self.sources.iter().map(|r| &r.name))?;
        unique("propagator", self.propagators.iter().map(|r| &r.name))?;
        unique("filter", self.filters.iter().map(|r| &r.name))?;
        unique("sink", self.sinks.iter().map(|r| &r.name))?;

        let sources: FxHashSet<&QualifiedName> = self.sources.iter().map(|r| &r.name).collect();
        if let Some(rule) = self.filters.iter().find(|r| sources.contains(&r.name)) {
            return Err(ConfigError::ConflictingEntry {
                name: rule.name.to_string(),
                first: "source".to_string(),
                second: "filter".to_string(),
            });
        }
        Ok(())
    }
}

fn unique<'a>(role: &str, names: impl Iterator<Item = &'a QualifiedName>) -> ConfigResult<()> {
    let mut seen = FxHashSet::default();
    for name in names {
        if !seen.insert(name) {
            return Err(ConfigError::DuplicateEntry {
                role: role.to_string(),
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

fn convert_all<S, R>(specs: &[S], convert: fn(&S) -> ConfigResult<R>) -> ConfigResult<Vec<R>> {
    specs.iter().map(convert).collect()
}

fn parse_name(role: &str, raw: &str) -> ConfigResult<QualifiedName> {
    QualifiedName::parse(raw).map_err(|reason| ConfigError::InvalidName {
        role: role.to_string(),
        reason,
    })
}

/// Parse a non-empty position list. `allow_return` is false for lists that
/// name call inputs.
fn parse_positions(
    role: &str,
    name: &QualifiedName,
    field: &str,
    specs: &[PositionSpec],
    allow_return: bool,
) -> ConfigResult<Vec<ArgPosition>> {
    if specs.is_empty() {
        return Err(ConfigError::EmptyRule {
            role: role.to_string(),
            name: name.to_string(),
            field: field.to_string(),
        });
    }
    specs
        .iter()
        .map(|spec| {
            let invalid = || ConfigError::InvalidPosition {
                role: role.to_string(),
                name: name.to_string(),
                value: spec.as_text(),
            };
            let position = match spec {
                PositionSpec::Index(i) => ArgPosition::Arg(*i),
                PositionSpec::Text(text) => text.parse().map_err(|_| invalid())?,
            };
            if position.is_return() && !allow_return {
                return Err(invalid());
            }
            Ok(position)
        })
        .collect()
}

fn source_rule(spec: &SourceSpec) -> ConfigResult<SourceRule> {
    let name = parse_name("source", &spec.name)?;
    let taints = parse_positions("source", &name, "taints", &spec.taints, true)?;
    Ok(SourceRule {
        name,
        taints,
        origin: EntryOrigin::User,
    })
}

fn propagator_rule(spec: &PropagatorSpec) -> ConfigResult<PropagatorRule> {
    let name = parse_name("propagator", &spec.name)?;
    let from = parse_positions("propagator", &name, "from", &spec.from, false)?;
    let to = parse_positions("propagator", &name, "to", &spec.to, true)?;
    Ok(PropagatorRule {
        name,
        from,
        to,
        origin: EntryOrigin::User,
    })
}

fn filter_rule(spec: &FilterSpec) -> ConfigResult<FilterRule> {
    let name = parse_name("filter", &spec.name)?;
    let cleans = parse_positions("filter", &name, "args", &spec.args, true)?;
    Ok(FilterRule {
        name,
        cleans,
        origin: EntryOrigin::User,
    })
}

fn sink_rule(spec: &SinkSpec) -> ConfigResult<SinkRule> {
    let name = parse_name("sink", &spec.name)?;
    let checks = parse_positions("sink", &name, "args", &spec.args, false)?;
    Ok(SinkRule {
        name,
        checks,
        kind: spec.kind.unwrap_or(DiagnosticKind::UntrustedSinkArgument),
        origin: EntryOrigin::User,
    })
}
