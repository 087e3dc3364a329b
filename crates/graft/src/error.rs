//! Errors raised by rule construction and by user transformation logic.

use graft_core::{MarkerType, NodeKind, Span};
use thiserror::Error;

/// Errors from building a [`DispatchRule`](crate::DispatchRule).
///
/// These are configuration mistakes and surface at construction time, never
/// during dispatch.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuleError {
    /// The rule was given a blank marker type.
    #[error("dispatch rule requires a marker type")]
    MissingMarkerType,

    /// The rule's marker type is not declared in the catalog.
    #[error("marker type `{marker}` is not declared in the catalog")]
    UndeclaredMarker {
        /// The undeclared marker type.
        marker: MarkerType,
    },
}

impl RuleError {
    /// Creates an undeclared marker error.
    #[must_use]
    pub const fn undeclared_marker(marker: MarkerType) -> Self {
        Self::UndeclaredMarker { marker }
    }
}

/// Failures raised by marker handlers and rewrite transforms.
///
/// The engines never catch these: they propagate to the host, which should
/// fail compilation of the unit being processed.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TransformError {
    /// The transformation logic rejected its input.
    #[error("{message}")]
    Failed {
        /// Description of the failure.
        message: String,
        /// Location of the offending node, if known.
        span: Option<Span>,
    },

    /// A marker handler failed; identifies the node being processed.
    #[error("@{marker} on {node_kind} `{node_name}` failed: {source}")]
    Handler {
        /// Marker type of the dispatched marker.
        marker: MarkerType,
        /// Kind of the annotated node.
        node_kind: NodeKind,
        /// Declared name of the annotated node.
        node_name: String,
        /// Location of the annotated node, if known.
        span: Option<Span>,
        /// The handler's own error.
        #[source]
        source: Box<TransformError>,
    },

    /// An error from foreign code called by a handler or transform.
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl TransformError {
    /// Creates a failure without a location.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
            span: None,
        }
    }

    /// Creates a failure located at `span`.
    #[must_use]
    pub fn failed_at(message: impl Into<String>, span: Option<Span>) -> Self {
        Self::Failed {
            message: message.into(),
            span,
        }
    }

    /// Returns the most specific known location of the failure.
    #[must_use]
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::Failed { span, .. } => span.as_ref(),
            Self::Handler { span, source, .. } => source.span().or(span.as_ref()),
            Self::Other(_) => None,
        }
    }
}
