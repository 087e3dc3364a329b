//! Markers attached to annotatable nodes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::span::Span;

/// Identifier of a user-declared marker type, such as `Logged`.
///
/// # Example
///
/// ```
/// use graft_core::MarkerType;
///
/// let logged = MarkerType::new("Logged");
/// assert_eq!(logged.as_str(), "Logged");
/// assert!(!logged.is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerType(String);

impl MarkerType {
    /// Creates a marker type identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` when the identifier is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for MarkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarkerType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MarkerType {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// A marker instance placed on a node, analogous to an annotation.
///
/// Members are the named values supplied at the use site, for example
/// `@Logged(level: "debug")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    marker_type: MarkerType,
    members: BTreeMap<String, Expr>,
    span: Option<Span>,
}

impl Marker {
    /// Creates a marker of the given type with no members.
    #[must_use]
    pub fn new(marker_type: impl Into<MarkerType>) -> Self {
        Self {
            marker_type: marker_type.into(),
            members: BTreeMap::new(),
            span: None,
        }
    }

    /// Adds a named member value.
    #[must_use]
    pub fn with_member(mut self, name: impl Into<String>, value: Expr) -> Self {
        self.members.insert(name.into(), value);
        self
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Returns the declared marker type.
    #[must_use]
    pub const fn marker_type(&self) -> &MarkerType {
        &self.marker_type
    }

    /// Looks up a member value by name.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&Expr> {
        self.members.get(name)
    }

    /// Returns all member values keyed by name.
    #[must_use]
    pub const fn members(&self) -> &BTreeMap<String, Expr> {
        &self.members
    }

    /// Returns the source location, if known.
    #[must_use]
    pub const fn span(&self) -> Option<&Span> {
        self.span.as_ref()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.marker_type)
    }
}
