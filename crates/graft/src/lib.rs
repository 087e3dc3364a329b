//! Graft: marker dispatch and predicate rewriting for compiler plug-ins.
//!
//! Graft gives third-party compiler extensions two hooks into a host's
//! syntax tree:
//!
//! - [`DispatchRule`] binds one marker type to one node type and runs a
//!   [`MarkerHandler`] for each matching (marker, node) pair the host offers,
//!   silently ignoring everything else.
//! - [`ExpressionRewriter`] walks an expression tree in pre-order and replaces
//!   the outermost expressions selected by a [`Criteria`] with the output of
//!   a [`Transform`].
//!
//! The [`criteria`] module provides the stock criteria. Tree types are
//! re-exported from [`graft_core`].
//!
//! # Example
//!
//! A handler for `@Logged` methods that routes `println` calls to a logger:
//!
//! ```
//! use std::sync::Arc;
//!
//! use graft::criteria::by_call_name;
//! use graft::{
//!     AstElement, Block, Diagnostics, DispatchRule, Expr, ExpressionRewriter, Marker,
//!     MarkerCatalog, MethodCall, MethodNode, Stmt, TransformError,
//! };
//!
//! let mut catalog = MarkerCatalog::new();
//! catalog.declare("Logged")?;
//!
//! let mut rule = DispatchRule::<MethodNode, _>::new(
//!     Arc::new(catalog),
//!     "Logged",
//!     |_: &Marker, method: &mut MethodNode, diagnostics: &mut Diagnostics| {
//!         let mut rewriter = ExpressionRewriter::new(
//!             diagnostics,
//!             by_call_name("println"),
//!             |call: MethodCall, _: &mut Diagnostics| -> Result<Expr, TransformError> {
//!                 Ok(Expr::method_call(Expr::variable("log"), "info", call.arguments))
//!             },
//!         );
//!         rewriter.rewrite_method(method)
//!     },
//! )?;
//!
//! let marker = Marker::new("Logged");
//! let mut method = MethodNode::new(
//!     "greet",
//!     Block::new(vec![Stmt::Expr(Expr::call("println", vec![Expr::string("hi")]))]),
//! );
//! let mut diagnostics = Diagnostics::new();
//! rule.dispatch(
//!     &mut [AstElement::Marker(&marker), AstElement::Method(&mut method)],
//!     &mut diagnostics,
//! )?;
//!
//! assert_eq!(
//!     method.body.statements,
//!     vec![Stmt::Expr(Expr::method_call(
//!         Expr::variable("log"),
//!         "info",
//!         vec![Expr::string("hi")],
//!     ))]
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod criteria;
mod dispatch;
mod error;
mod rewrite;

pub use graft_core::{
    Annotated, AstElement, Binary, BinaryOp, Block, CatalogDocument, CatalogError, Cast,
    ClassNode, Constant, Diagnostic, Diagnostics, Expr, ExprKind, FieldNode, LineCol, Lineage,
    ListExpr, Literal, MapEntry, MapExpr, Marker, MarkerCatalog, MarkerDecl, MarkerType, MethodCall,
    MethodNode, NodeKind, Not, Parameter, PropertyAccess, Severity, Span, Stmt, Ternary,
    Variable,
};

pub use criteria::{Criteria, Selection};
pub use dispatch::{
    DISPATCH_TARGET, Dispatch, DispatchRule, MarkerHandler, RuleBinding, SkipReason,
};
pub use error::{RuleError, TransformError};
pub use rewrite::{ExpressionRewriter, REWRITE_TARGET, Transform};

#[cfg(test)]
mod tests;
