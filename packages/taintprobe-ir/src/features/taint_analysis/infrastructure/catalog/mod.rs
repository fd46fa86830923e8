// Taint catalog: sources, propagators, filters and sinks by qualified name
//
// Lookup is exact on the normalized qualified name. `Reader::scanf` and
// `ns::scanf` are not `scanf`; the trailing identifier is never matched on
// its own.

pub mod builtin;

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CatalogConfig;
use crate::features::taint_analysis::domain::{
    expand_positions, CallSlot, EntryOrigin, FilterRule, PropagatorRule, SinkRule, SourceRule,
};
use crate::shared::models::{Call, QualifiedName};

/// Every rule registered for one name
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogMatch<'a> {
    pub source: Option<&'a SourceRule>,
    pub propagator: Option<&'a PropagatorRule>,
    pub filter: Option<&'a FilterRule>,
    pub sink: Option<&'a SinkRule>,
}

impl CatalogMatch<'_> {
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.propagator.is_none()
            && self.filter.is_none()
            && self.sink.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogStats {
    pub sources: usize,
    pub propagators: usize,
    pub filters: usize,
    pub sinks: usize,
    pub user_entries: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TaintCatalog {
    sources: AHashMap<QualifiedName, SourceRule>,
    propagators: AHashMap<QualifiedName, PropagatorRule>,
    filters: AHashMap<QualifiedName, FilterRule>,
    sinks: AHashMap<QualifiedName, SinkRule>,
}

impl TaintCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog with the built-in C/POSIX/iostream entries
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        builtin::sources().into_iter().for_each(|r| {
            catalog.add_source(r);
        });
        builtin::propagators().into_iter().for_each(|r| {
            catalog.add_propagator(r);
        });
        builtin::sinks().into_iter().for_each(|r| {
            catalog.add_sink(r);
        });
        catalog
    }

    /// Built-ins overlaid with user entries
    pub fn with_user_entries(config: &CatalogConfig) -> Self {
        let mut catalog = Self::builtin();
        catalog.merge(config);
        catalog
    }

    /// Overlay user entries. A user entry replaces every built-in entry of
    /// the same name, whatever its role, so a name a user lists as a filter
    /// is no longer a built-in source.
    pub fn merge(&mut self, config: &CatalogConfig) {
        let names: AHashSet<&QualifiedName> = config
            .sources
            .iter()
            .map(|r| &r.name)
            .chain(config.propagators.iter().map(|r| &r.name))
            .chain(config.filters.iter().map(|r| &r.name))
            .chain(config.sinks.iter().map(|r| &r.name))
            .collect();
        let shadowed = |name: &QualifiedName, origin: EntryOrigin| {
            origin == EntryOrigin::Builtin && names.contains(name)
        };
        self.sources.retain(|name, r| !shadowed(name, r.origin));
        self.propagators.retain(|name, r| !shadowed(name, r.origin));
        self.filters.retain(|name, r| !shadowed(name, r.origin));
        self.sinks.retain(|name, r| !shadowed(name, r.origin));

        for rule in &config.sources {
            self.add_source(rule.clone());
        }
        for rule in &config.propagators {
            self.add_propagator(rule.clone());
        }
        for rule in &config.filters {
            self.add_filter(rule.clone());
        }
        for rule in &config.sinks {
            self.add_sink(rule.clone());
        }
        debug!(stats = ?self.stats(), "Merged user catalog entries");
    }

    pub fn add_source(&mut self, rule: SourceRule) -> Option<SourceRule> {
        self.sources.insert(rule.name.clone(), rule)
    }

    pub fn add_propagator(&mut self, rule: PropagatorRule) -> Option<PropagatorRule> {
        self.propagators.insert(rule.name.clone(), rule)
    }

    pub fn add_filter(&mut self, rule: FilterRule) -> Option<FilterRule> {
        self.filters.insert(rule.name.clone(), rule)
    }

    pub fn add_sink(&mut self, rule: SinkRule) -> Option<SinkRule> {
        self.sinks.insert(rule.name.clone(), rule)
    }

    /// All rules for `name`, or `None` when the catalog does not know it
    pub fn lookup(&self, name: &QualifiedName) -> Option<CatalogMatch<'_>> {
        let found = CatalogMatch {
            source: self.sources.get(name),
            propagator: self.propagators.get(name),
            filter: self.filters.get(name),
            sink: self.sinks.get(name),
        };
        (!found.is_empty()).then_some(found)
    }

    pub fn source(&self, name: &QualifiedName) -> Option<&SourceRule> {
        self.sources.get(name)
    }

    pub fn sink(&self, name: &QualifiedName) -> Option<&SinkRule> {
        self.sinks.get(name)
    }

    pub fn filter(&self, name: &QualifiedName) -> Option<&FilterRule> {
        self.filters.get(name)
    }

    pub fn propagator(&self, name: &QualifiedName) -> Option<&PropagatorRule> {
        self.propagators.get(name)
    }

    /// Outputs of `call` that become Tainted; empty when it is not a source
    pub fn tainted_outputs(&self, call: &Call) -> Vec<CallSlot> {
        call.callee_name()
            .and_then(|name| self.sources.get(name))
            .map(|rule| expand_positions(&rule.taints, call.args.len()))
            .unwrap_or_default()
    }

    /// Sink rule of `call` with the slots it checks
    pub fn checked_slots(&self, call: &Call) -> Option<(&SinkRule, Vec<CallSlot>)> {
        let rule = call.callee_name().and_then(|name| self.sinks.get(name))?;
        Some((rule, expand_positions(&rule.checks, call.args.len())))
    }

    pub fn stats(&self) -> CatalogStats {
        let user = self
            .sources
            .values()
            .map(|r| r.origin)
            .chain(self.propagators.values().map(|r| r.origin))
            .chain(self.filters.values().map(|r| r.origin))
            .chain(self.sinks.values().map(|r| r.origin))
            .filter(|o| *o == EntryOrigin::User)
            .count();
        CatalogStats {
            sources: self.sources.len(),
            propagators: self.propagators.len(),
            filters: self.filters.len(),
            sinks: self.sinks.len(),
            user_entries: user,
        }
    }

    /// Names of every source, sorted
    pub fn source_names(&self) -> Vec<&QualifiedName> {
        let mut names: Vec<_> = self.sources.keys().collect();
        names.sort();
        names
    }

    /// Names of every sink, sorted
    pub fn sink_names(&self) -> Vec<&QualifiedName> {
        let mut names: Vec<_> = self.sinks.keys().collect();
        names.sort();
        names
    }
}
