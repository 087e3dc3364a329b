//! Declaration nodes, statements and the elements handed to dispatch rules.
//!
//! Only declarations can carry markers. They implement [`Annotated`], which
//! lets a dispatch rule narrow an untyped [`AstElement`] to the concrete node
//! type it was bound to.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::expr::Expr;
use crate::marker::{Marker, MarkerType};
use crate::span::Span;

/// Kinds of node a marker can be applied to.
///
/// # Example
///
/// ```
/// use std::str::FromStr;
/// use graft_core::NodeKind;
///
/// assert_eq!(NodeKind::from_str("Method").ok(), Some(NodeKind::Method));
/// assert_eq!(NodeKind::Field.to_string(), "field");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NodeKind {
    /// A class declaration.
    Class,
    /// A method declaration.
    Method,
    /// A field declaration.
    Field,
    /// A method parameter.
    Parameter,
}

/// A sequence of statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    /// Statements in source order.
    pub statements: Vec<Stmt>,
}

impl Block {
    /// Creates a block from statements.
    #[must_use]
    pub const fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }

    /// Returns `true` when the block holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Calls `f` on every top-level expression slot of every statement, in
    /// source order, descending into nested blocks.
    ///
    /// Expressions are not descended into; callers that need the inner
    /// structure walk it themselves.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error produced by `f`.
    pub fn try_for_each_expr_mut<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Expr) -> Result<(), E>,
    {
        for stmt in &mut self.statements {
            stmt.try_for_each_expr_mut(f)?;
        }
        Ok(())
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// An expression evaluated for its effect.
    Expr(Expr),
    /// A local variable declaration.
    Declare {
        /// The variable name.
        name: String,
        /// The initial value, if any.
        initialiser: Option<Expr>,
    },
    /// A return, with an optional value.
    Return(Option<Expr>),
    /// A conditional statement.
    If {
        /// The condition.
        condition: Expr,
        /// Statements run when the condition holds.
        then_branch: Block,
        /// Statements run otherwise.
        else_branch: Option<Block>,
    },
    /// A nested block.
    Block(Block),
}

impl Stmt {
    /// Calls `f` on each expression slot owned by this statement, in source
    /// order.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error produced by `f`.
    pub fn try_for_each_expr_mut<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Expr) -> Result<(), E>,
    {
        match self {
            Self::Expr(expr) => f(expr),
            Self::Declare { initialiser, .. } | Self::Return(initialiser) => {
                initialiser.as_mut().map_or(Ok(()), f)
            }
            Self::If {
                condition,
                then_branch,
                else_branch,
            } => {
                f(condition)?;
                then_branch.try_for_each_expr_mut(f)?;
                else_branch
                    .as_mut()
                    .map_or(Ok(()), |block| block.try_for_each_expr_mut(f))
            }
            Self::Block(block) => block.try_for_each_expr_mut(f),
        }
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Declared type name.
    pub type_name: String,
    /// Default value, if any.
    pub default_value: Option<Expr>,
    /// Markers placed on the parameter.
    pub markers: Vec<Marker>,
    /// Source location, if known.
    pub span: Option<Span>,
}

impl Parameter {
    /// Creates a parameter without a default value or markers.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            default_value: None,
            markers: Vec::new(),
            span: None,
        }
    }
}

/// A method declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodNode {
    /// Method name.
    pub name: String,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Declared return type name.
    pub return_type: String,
    /// The method body.
    pub body: Block,
    /// Markers placed on the method.
    pub markers: Vec<Marker>,
    /// Source location, if known.
    pub span: Option<Span>,
}

impl MethodNode {
    /// Creates a method returning `void` with the given body.
    #[must_use]
    pub fn new(name: impl Into<String>, body: Block) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: String::from("void"),
            body,
            markers: Vec::new(),
            span: None,
        }
    }
}

/// A field declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    /// Field name.
    pub name: String,
    /// Declared type name.
    pub type_name: String,
    /// Initial value, if any.
    pub initial_value: Option<Expr>,
    /// Markers placed on the field.
    pub markers: Vec<Marker>,
    /// Source location, if known.
    pub span: Option<Span>,
}

impl FieldNode {
    /// Creates a field without an initial value or markers.
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            initial_value: None,
            markers: Vec::new(),
            span: None,
        }
    }
}

/// A class declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassNode {
    /// Class name.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldNode>,
    /// Methods in declaration order.
    pub methods: Vec<MethodNode>,
    /// Markers placed on the class.
    pub markers: Vec<Marker>,
    /// Source location, if known.
    pub span: Option<Span>,
}

impl ClassNode {
    /// Creates an empty class.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
            markers: Vec::new(),
            span: None,
        }
    }
}

/// A node that can carry markers.
///
/// `narrow` recovers the concrete node from an [`AstElement`]; it returns
/// `None` for elements of any other kind.
pub trait Annotated {
    /// The kind tag shared by every node of this type.
    const KIND: NodeKind;

    /// Returns the declared name of the node.
    fn name(&self) -> &str;

    /// Returns the markers placed on the node.
    fn markers(&self) -> &[Marker];

    /// Returns the source location, if known.
    fn span(&self) -> Option<&Span>;

    /// Narrows an element to this node type.
    fn narrow<'e>(element: &'e mut AstElement<'_>) -> Option<&'e mut Self>;

    /// Returns `true` when a marker of exactly `marker_type` is present.
    fn has_marker(&self, marker_type: &MarkerType) -> bool {
        self.markers()
            .iter()
            .any(|marker| marker.marker_type() == marker_type)
    }
}

macro_rules! impl_annotated {
    ($node:ty, $kind:ident) => {
        impl Annotated for $node {
            const KIND: NodeKind = NodeKind::$kind;

            fn name(&self) -> &str {
                &self.name
            }

            fn markers(&self) -> &[Marker] {
                &self.markers
            }

            fn span(&self) -> Option<&Span> {
                self.span.as_ref()
            }

            fn narrow<'e>(element: &'e mut AstElement<'_>) -> Option<&'e mut Self> {
                match element {
                    AstElement::$kind(node) => Some(&mut **node),
                    _ => None,
                }
            }
        }

        impl<'a> From<&'a mut $node> for AstElement<'a> {
            fn from(node: &'a mut $node) -> Self {
                Self::$kind(node)
            }
        }
    };
}

impl_annotated!(ClassNode, Class);
impl_annotated!(MethodNode, Method);
impl_annotated!(FieldNode, Field);
impl_annotated!(Parameter, Parameter);

/// One element of a node pair handed to a dispatch rule.
///
/// The host borrows nodes mutably for the duration of a dispatch call. The
/// marker is borrowed shared; hosts usually clone it out of the node's
/// marker list so both can be borrowed at once.
#[derive(Debug)]
pub enum AstElement<'a> {
    /// A marker.
    Marker(&'a Marker),
    /// A class declaration.
    Class(&'a mut ClassNode),
    /// A method declaration.
    Method(&'a mut MethodNode),
    /// A field declaration.
    Field(&'a mut FieldNode),
    /// A method parameter.
    Parameter(&'a mut Parameter),
    /// A statement.
    Stmt(&'a mut Stmt),
    /// An expression.
    Expr(&'a mut Expr),
}

impl AstElement<'_> {
    /// Returns the node kind for annotatable elements, `None` otherwise.
    #[must_use]
    pub const fn annotated_kind(&self) -> Option<NodeKind> {
        match self {
            Self::Class(_) => Some(NodeKind::Class),
            Self::Method(_) => Some(NodeKind::Method),
            Self::Field(_) => Some(NodeKind::Field),
            Self::Parameter(_) => Some(NodeKind::Parameter),
            Self::Marker(_) | Self::Stmt(_) | Self::Expr(_) => None,
        }
    }

    /// Returns the marker if this element is one.
    #[must_use]
    pub const fn as_marker(&self) -> Option<&Marker> {
        match self {
            Self::Marker(marker) => Some(*marker),
            _ => None,
        }
    }
}

impl<'a> From<&'a Marker> for AstElement<'a> {
    fn from(marker: &'a Marker) -> Self {
        Self::Marker(marker)
    }
}
