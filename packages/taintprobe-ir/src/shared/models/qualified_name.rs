//! Qualified names for callees and catalog entries
//!
//! Names are `::`-separated paths: `scanf`, `std::getline`,
//! `std::istream::operator>>`. Matching is always on the full path. A leading
//! `::` (explicit global namespace) is stripped so `::scanf` and `scanf` name
//! the same function.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static QUALIFIED_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z_~][A-Za-z0-9_]*(::([A-Za-z_~][A-Za-z0-9_]*|operator(\(\)|\[\]|[-+*/%^&|!=<>]{1,3})))*$",
    )
    .expect("qualified name pattern is valid")
});

/// Fully qualified function name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName(String);

impl QualifiedName {
    /// Parse and validate a qualified name
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        let normalized = trimmed.strip_prefix("::").unwrap_or(trimmed);
        if QUALIFIED_NAME.is_match(normalized) {
            Ok(Self(normalized.to_string()))
        } else {
            Err(format!("'{}' is not a valid qualified name", raw))
        }
    }

    /// Build a name without validation.
    ///
    /// Used by the IR builder and built-in catalog where names are literals.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix("::") {
            Some(stripped) => Self(stripped.to_string()),
            None => Self(name),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments (`std::getline` -> `["std", "getline"]`)
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split("::")
    }

    /// Last path segment. Informational only; never used for catalog lookup.
    pub fn unqualified(&self) -> &str {
        self.0.rsplit("::").next().unwrap_or(&self.0)
    }

    /// Whether the name carries a namespace or type qualifier
    pub fn is_qualified(&self) -> bool {
        self.0.contains("::")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.0
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
