//! Errors raised while building a marker catalog.

use thiserror::Error;

use crate::marker::MarkerType;

/// Errors from marker catalog construction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    /// A marker type name was empty or whitespace only.
    #[error("marker type names must not be blank")]
    BlankName,

    /// The same marker type was declared twice.
    #[error("marker type `{marker}` is already declared")]
    Duplicate {
        /// The repeated marker type.
        marker: MarkerType,
    },

    /// A refinement named a parent that is not declared.
    #[error("marker type `{marker}` refines undeclared marker type `{parent}`")]
    UnknownParent {
        /// The refining marker type.
        marker: MarkerType,
        /// The missing parent.
        parent: MarkerType,
    },

    /// Refinement declarations form a cycle.
    #[error("marker type `{marker}` is part of a refinement cycle")]
    Cycle {
        /// A marker type on the cycle.
        marker: MarkerType,
    },

    /// A catalog document could not be parsed.
    #[error("malformed marker catalog: {0}")]
    Parse(#[source] serde_json::Error),
}

impl CatalogError {
    /// Creates a duplicate declaration error.
    #[must_use]
    pub const fn duplicate(marker: MarkerType) -> Self {
        Self::Duplicate { marker }
    }

    /// Creates an unknown parent error.
    #[must_use]
    pub const fn unknown_parent(marker: MarkerType, parent: MarkerType) -> Self {
        Self::UnknownParent { marker, parent }
    }

    /// Creates a refinement cycle error.
    #[must_use]
    pub const fn cycle(marker: MarkerType) -> Self {
        Self::Cycle { marker }
    }
}
