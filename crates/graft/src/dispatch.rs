//! Marker-driven dispatch of node pairs to user handlers.
//!
//! The host hands every (marker, node) pair it finds to each registered
//! rule. One rule only cares about one marker type on one node kind, so
//! anything else it receives is skipped silently: malformed pairs,
//! unrelated markers and other node kinds are all expected traffic. Rule
//! construction is the opposite: a rule without a usable marker type is a
//! configuration mistake and fails immediately.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use graft_core::{Annotated, AstElement, Marker, MarkerCatalog, MarkerType, NodeKind};
use tracing::{debug, trace};

use crate::error::{RuleError, TransformError};

/// Tracing target for dispatch operations.
pub const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Behaviour attached to a marker type on nodes of type `N`.
///
/// `C` is the host's reporting context, forwarded untouched. Closures of
/// type `FnMut(&Marker, &mut N, &mut C) -> Result<(), TransformError>`
/// are handlers.
pub trait MarkerHandler<N, C: ?Sized> {
    /// Runs the handler for one matching pair.
    ///
    /// # Errors
    ///
    /// Any error aborts processing of the node and is propagated to the host.
    fn on_match(
        &mut self,
        marker: &Marker,
        node: &mut N,
        context: &mut C,
    ) -> Result<(), TransformError>;
}

impl<N, C, F> MarkerHandler<N, C> for F
where
    C: ?Sized,
    F: FnMut(&Marker, &mut N, &mut C) -> Result<(), TransformError>,
{
    fn on_match(
        &mut self,
        marker: &Marker,
        node: &mut N,
        context: &mut C,
    ) -> Result<(), TransformError> {
        self(marker, node, context)
    }
}

/// The marker type and node kind a rule is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBinding {
    marker_type: MarkerType,
    node_kind: NodeKind,
}

impl RuleBinding {
    /// Returns the bound marker type.
    #[must_use]
    pub const fn marker_type(&self) -> &MarkerType {
        &self.marker_type
    }

    /// Returns the bound node kind.
    #[must_use]
    pub const fn node_kind(&self) -> NodeKind {
        self.node_kind
    }
}

impl fmt::Display for RuleBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{} on {}", self.marker_type, self.node_kind)
    }
}

/// Why a pair was not handed to the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No elements were supplied.
    Empty,
    /// The pair did not hold exactly two elements.
    WrongArity {
        /// Number of elements supplied.
        len: usize,
    },
    /// The first element was not a marker.
    FirstNotMarker,
    /// The last element was not an annotatable node.
    LastNotAnnotated,
    /// The marker is neither the bound type nor a refinement of it.
    MarkerMismatch {
        /// The marker type found on the pair.
        found: MarkerType,
    },
    /// The node is annotatable but of another kind.
    NodeKindMismatch {
        /// The node kind found on the pair.
        found: NodeKind,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("no elements"),
            Self::WrongArity { len } => write!(f, "expected 2 elements, found {len}"),
            Self::FirstNotMarker => f.write_str("first element is not a marker"),
            Self::LastNotAnnotated => f.write_str("last element is not an annotatable node"),
            Self::MarkerMismatch { found } => write!(f, "unrelated marker @{found}"),
            Self::NodeKindMismatch { found } => write!(f, "unexpected node kind {found}"),
        }
    }
}

/// Result of a dispatch call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The handler ran once.
    Applied,
    /// The pair was ignored.
    Skipped(SkipReason),
}

impl Dispatch {
    /// Returns `true` when the handler ran.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// Returns the skip reason, if the pair was ignored.
    #[must_use]
    pub const fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Applied => None,
            Self::Skipped(reason) => Some(reason),
        }
    }
}

/// Binds one marker type to one node type and runs a handler for matching
/// pairs.
///
/// The node type is the `N` type parameter; its [`NodeKind`] is
/// [`Annotated::KIND`]. Markers match when their type equals the bound
/// marker type or is declared in the catalog as a refinement of it.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use graft::{
///     AstElement, Block, DispatchRule, Diagnostics, Marker, MarkerCatalog, MethodNode,
///     TransformError,
/// };
///
/// let mut catalog = MarkerCatalog::new();
/// catalog.declare("Logged")?;
///
/// let mut rule = DispatchRule::<MethodNode, _>::new(
///     Arc::new(catalog),
///     "Logged",
///     |_: &Marker, method: &mut MethodNode, _: &mut Diagnostics| -> Result<(), TransformError> {
///         method.return_type = String::from("Object");
///         Ok(())
///     },
/// )?;
///
/// let marker = Marker::new("Logged");
/// let mut method = MethodNode::new("greet", Block::default());
/// let mut diagnostics = Diagnostics::new();
/// let outcome = rule.dispatch(
///     &mut [AstElement::Marker(&marker), AstElement::Method(&mut method)],
///     &mut diagnostics,
/// )?;
///
/// assert!(outcome.is_applied());
/// assert_eq!(method.return_type, "Object");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DispatchRule<N, H> {
    binding: RuleBinding,
    catalog: Arc<MarkerCatalog>,
    handler: H,
    node: PhantomData<fn(&mut N)>,
}

impl<N, H> fmt::Debug for DispatchRule<N, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchRule")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

impl<N: Annotated, H> DispatchRule<N, H> {
    /// Creates a rule binding `marker_type` to nodes of type `N`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::MissingMarkerType`] for a blank marker type and
    /// [`RuleError::UndeclaredMarker`] when the catalog does not declare it.
    pub fn new(
        catalog: Arc<MarkerCatalog>,
        marker_type: impl Into<MarkerType>,
        handler: H,
    ) -> Result<Self, RuleError> {
        let bound = marker_type.into();
        if bound.is_blank() {
            return Err(RuleError::MissingMarkerType);
        }
        if !catalog.contains(&bound) {
            return Err(RuleError::undeclared_marker(bound));
        }
        Ok(Self {
            binding: RuleBinding {
                marker_type: bound,
                node_kind: N::KIND,
            },
            catalog,
            handler,
            node: PhantomData,
        })
    }

    /// Returns the rule's binding.
    #[must_use]
    pub const fn binding(&self) -> &RuleBinding {
        &self.binding
    }

    /// Offers a node pair to the rule.
    ///
    /// The handler runs at most once, and only for a two-element pair of a
    /// marker matching the bound type followed by a node of the bound kind.
    /// Every other input is skipped without error.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Handler`] wrapping the handler's error,
    /// identifying the marker and node that were being processed.
    pub fn dispatch<C>(
        &mut self,
        nodes: &mut [AstElement<'_>],
        context: &mut C,
    ) -> Result<Dispatch, TransformError>
    where
        C: ?Sized,
        H: MarkerHandler<N, C>,
    {
        let len = nodes.len();
        let [first, last] = nodes else {
            return Ok(self.skip(if len == 0 {
                SkipReason::Empty
            } else {
                SkipReason::WrongArity { len }
            }));
        };

        let &mut AstElement::Marker(marker) = first else {
            return Ok(self.skip(SkipReason::FirstNotMarker));
        };

        let Some(found_kind) = last.annotated_kind() else {
            return Ok(self.skip(SkipReason::LastNotAnnotated));
        };

        if !self
            .catalog
            .is_refinement_of(marker.marker_type(), &self.binding.marker_type)
        {
            return Ok(self.skip(SkipReason::MarkerMismatch {
                found: marker.marker_type().clone(),
            }));
        }

        let Some(node) = N::narrow(last) else {
            return Ok(self.skip(SkipReason::NodeKindMismatch { found: found_kind }));
        };

        trace!(
            target: DISPATCH_TARGET,
            rule = %self.binding,
            marker = %marker,
            node = node.name(),
            "applying marker handler"
        );

        let node_name = node.name().to_owned();
        let span = node.span().copied();
        self.handler
            .on_match(marker, node, context)
            .map_err(|source| TransformError::Handler {
                marker: marker.marker_type().clone(),
                node_kind: N::KIND,
                node_name,
                span,
                source: Box::new(source),
            })?;
        Ok(Dispatch::Applied)
    }

    fn skip(&self, reason: SkipReason) -> Dispatch {
        debug!(
            target: DISPATCH_TARGET,
            rule = %self.binding,
            reason = %reason,
            "skipping node pair"
        );
        Dispatch::Skipped(reason)
    }
}
