//! Tree data model shared by the `graft` dispatch and rewrite engines.
//!
//! This crate defines what a host compiler hands to `graft`: declaration
//! nodes that can carry markers, statements, expression trees, and the
//! catalog of marker types with their declared refinements. It is
//! re-exported by the `graft` crate.
//!
//! # Core types
//!
//! - [`Expr`] and its variant structs: the closed set of expression nodes
//! - [`ClassNode`], [`MethodNode`], [`FieldNode`], [`Parameter`]: annotatable
//!   declarations, unified by the [`Annotated`] trait
//! - [`Marker`] and [`MarkerType`]: marker instances and their identifiers
//! - [`MarkerCatalog`]: declared marker types and refinements
//! - [`AstElement`]: one element of the node pair given to a dispatch rule
//! - [`Diagnostics`]: a ready-made reporting context
//!
//! # Example
//!
//! ```
//! use graft_core::{Block, Expr, MethodNode, Stmt};
//!
//! let body = Block::new(vec![Stmt::Expr(Expr::call("println", vec![Expr::string("hi")]))]);
//! let method = MethodNode::new("greet", body);
//! assert_eq!(method.return_type, "void");
//! ```

mod catalog;
mod diagnostic;
mod error;
mod expr;
mod marker;
mod node;
mod span;

pub use catalog::{CatalogDocument, Lineage, MarkerCatalog, MarkerDecl};
pub use diagnostic::{Diagnostic, Diagnostics, Severity};
pub use error::CatalogError;
pub use expr::{
    Binary, BinaryOp, Cast, Constant, Expr, ExprKind, ListExpr, Literal, MapEntry, MapExpr,
    MethodCall, Not, PropertyAccess, Ternary, Variable,
};
pub use marker::{Marker, MarkerType};
pub use node::{
    Annotated, AstElement, Block, ClassNode, FieldNode, MethodNode, NodeKind, Parameter, Stmt,
};
pub use span::{LineCol, Span};

#[cfg(test)]
mod tests;
