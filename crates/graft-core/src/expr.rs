//! Expression trees.
//!
//! [`Expr`] is a closed set of expression variants. Rewriting engines work on
//! owned expressions: [`Expr::map_children`] rebuilds a node from its direct
//! children in source order, which is the only structural operation a
//! rewrite pass needs.

use strum::Display;

use crate::span::Span;

/// Literal values held by [`Constant`] expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// The null literal.
    Null,
    /// A boolean literal.
    Bool(bool),
    /// An integer literal.
    Int(i64),
    /// A string literal.
    Str(String),
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    /// The literal value.
    pub value: Literal,
    /// Source location, if known.
    pub span: Option<Span>,
}

/// A reference to a variable by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// The variable name.
    pub name: String,
    /// Source location, if known.
    pub span: Option<Span>,
}

/// A method invocation such as `logger.info(message)`.
///
/// A missing receiver denotes an implicit `this` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    /// The object the method is invoked on.
    pub receiver: Option<Box<Expr>>,
    /// The invoked method name.
    pub method: String,
    /// Call arguments in source order.
    pub arguments: Vec<Expr>,
    /// Source location, if known.
    pub span: Option<Span>,
}

impl MethodCall {
    /// Returns the invoked method name.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method
    }

    /// Returns the receiver, or `None` for an implicit `this` call.
    #[must_use]
    pub fn receiver(&self) -> Option<&Expr> {
        self.receiver.as_deref()
    }

    /// Returns the call arguments.
    #[must_use]
    pub fn arguments(&self) -> &[Expr] {
        &self.arguments
    }
}

/// Property access such as `person.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAccess {
    /// The object being accessed.
    pub object: Box<Expr>,
    /// The property name.
    pub property: String,
    /// Source location, if known.
    pub span: Option<Span>,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BinaryOp {
    /// `+`
    #[strum(serialize = "+")]
    Add,
    /// `-`
    #[strum(serialize = "-")]
    Sub,
    /// `*`
    #[strum(serialize = "*")]
    Mul,
    /// `==`
    #[strum(serialize = "==")]
    Eq,
    /// `!=`
    #[strum(serialize = "!=")]
    Ne,
    /// `<`
    #[strum(serialize = "<")]
    Lt,
    /// `&&`
    #[strum(serialize = "&&")]
    And,
    /// `||`
    #[strum(serialize = "||")]
    Or,
}

/// A binary operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    /// The operator.
    pub op: BinaryOp,
    /// Left operand.
    pub left: Box<Expr>,
    /// Right operand.
    pub right: Box<Expr>,
    /// Source location, if known.
    pub span: Option<Span>,
}

/// Logical negation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Not {
    /// The negated operand.
    pub operand: Box<Expr>,
    /// Source location, if known.
    pub span: Option<Span>,
}

/// A conditional expression `condition ? then : otherwise`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ternary {
    /// The condition.
    pub condition: Box<Expr>,
    /// Value when the condition holds.
    pub then_value: Box<Expr>,
    /// Value when the condition does not hold.
    pub else_value: Box<Expr>,
    /// Source location, if known.
    pub span: Option<Span>,
}

/// A list literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListExpr {
    /// Elements in source order.
    pub elements: Vec<Expr>,
    /// Source location, if known.
    pub span: Option<Span>,
}

/// One `key: value` entry of a map literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapEntry {
    /// The entry key.
    pub key: Expr,
    /// The entry value.
    pub value: Expr,
}

/// A map literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapExpr {
    /// Entries in source order.
    pub entries: Vec<MapEntry>,
    /// Source location, if known.
    pub span: Option<Span>,
}

/// A cast `(Type) operand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cast {
    /// Name of the target type.
    pub type_name: String,
    /// The cast operand.
    pub operand: Box<Expr>,
    /// Source location, if known.
    pub span: Option<Span>,
}

/// Runtime tag of an [`Expr`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ExprKind {
    /// [`Expr::Constant`]
    Constant,
    /// [`Expr::Variable`]
    Variable,
    /// [`Expr::MethodCall`]
    MethodCall,
    /// [`Expr::Property`]
    Property,
    /// [`Expr::Binary`]
    Binary,
    /// [`Expr::Not`]
    Not,
    /// [`Expr::Ternary`]
    Ternary,
    /// [`Expr::List`]
    List,
    /// [`Expr::Map`]
    Map,
    /// [`Expr::Cast`]
    Cast,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// A literal value.
    Constant(Constant),
    /// A variable reference.
    Variable(Variable),
    /// A method invocation.
    MethodCall(MethodCall),
    /// A property access.
    Property(PropertyAccess),
    /// A binary operation.
    Binary(Binary),
    /// Logical negation.
    Not(Not),
    /// A conditional expression.
    Ternary(Ternary),
    /// A list literal.
    List(ListExpr),
    /// A map literal.
    Map(MapExpr),
    /// A cast.
    Cast(Cast),
}

impl Expr {
    /// Creates a literal expression.
    #[must_use]
    pub const fn constant(value: Literal) -> Self {
        Self::Constant(Constant { value, span: None })
    }

    /// Creates the `null` literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::constant(Literal::Null)
    }

    /// Creates an integer literal.
    #[must_use]
    pub const fn int(value: i64) -> Self {
        Self::constant(Literal::Int(value))
    }

    /// Creates a boolean literal.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::constant(Literal::Bool(value))
    }

    /// Creates a string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::constant(Literal::Str(value.into()))
    }

    /// Creates a variable reference.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(Variable {
            name: name.into(),
            span: None,
        })
    }

    /// Creates a call with an implicit `this` receiver.
    #[must_use]
    pub fn call(method: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self::MethodCall(MethodCall {
            receiver: None,
            method: method.into(),
            arguments,
            span: None,
        })
    }

    /// Creates a call on an explicit receiver.
    #[must_use]
    pub fn method_call(receiver: Self, method: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self::MethodCall(MethodCall {
            receiver: Some(Box::new(receiver)),
            method: method.into(),
            arguments,
            span: None,
        })
    }

    /// Creates a property access.
    #[must_use]
    pub fn property(object: Self, property: impl Into<String>) -> Self {
        Self::Property(PropertyAccess {
            object: Box::new(object),
            property: property.into(),
            span: None,
        })
    }

    /// Creates a binary operation.
    #[must_use]
    pub fn binary(op: BinaryOp, left: Self, right: Self) -> Self {
        Self::Binary(Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span: None,
        })
    }

    /// Creates a logical negation.
    #[must_use]
    pub fn not(operand: Self) -> Self {
        Self::Not(Not {
            operand: Box::new(operand),
            span: None,
        })
    }

    /// Creates a conditional expression.
    #[must_use]
    pub fn ternary(condition: Self, then_value: Self, else_value: Self) -> Self {
        Self::Ternary(Ternary {
            condition: Box::new(condition),
            then_value: Box::new(then_value),
            else_value: Box::new(else_value),
            span: None,
        })
    }

    /// Creates a list literal.
    #[must_use]
    pub const fn list(elements: Vec<Self>) -> Self {
        Self::List(ListExpr {
            elements,
            span: None,
        })
    }

    /// Creates a map literal from key/value pairs.
    #[must_use]
    pub fn map(entries: Vec<(Self, Self)>) -> Self {
        Self::Map(MapExpr {
            entries: entries
                .into_iter()
                .map(|(key, value)| MapEntry { key, value })
                .collect(),
            span: None,
        })
    }

    /// Creates a cast.
    #[must_use]
    pub fn cast(type_name: impl Into<String>, operand: Self) -> Self {
        Self::Cast(Cast {
            type_name: type_name.into(),
            operand: Box::new(operand),
            span: None,
        })
    }

    /// Returns the runtime tag of this expression.
    #[must_use]
    pub const fn kind(&self) -> ExprKind {
        match self {
            Self::Constant(_) => ExprKind::Constant,
            Self::Variable(_) => ExprKind::Variable,
            Self::MethodCall(_) => ExprKind::MethodCall,
            Self::Property(_) => ExprKind::Property,
            Self::Binary(_) => ExprKind::Binary,
            Self::Not(_) => ExprKind::Not,
            Self::Ternary(_) => ExprKind::Ternary,
            Self::List(_) => ExprKind::List,
            Self::Map(_) => ExprKind::Map,
            Self::Cast(_) => ExprKind::Cast,
        }
    }

    /// Returns the source location, if known.
    #[must_use]
    pub const fn span(&self) -> Option<&Span> {
        match self {
            Self::Constant(e) => e.span.as_ref(),
            Self::Variable(e) => e.span.as_ref(),
            Self::MethodCall(e) => e.span.as_ref(),
            Self::Property(e) => e.span.as_ref(),
            Self::Binary(e) => e.span.as_ref(),
            Self::Not(e) => e.span.as_ref(),
            Self::Ternary(e) => e.span.as_ref(),
            Self::List(e) => e.span.as_ref(),
            Self::Map(e) => e.span.as_ref(),
            Self::Cast(e) => e.span.as_ref(),
        }
    }

    /// Returns this expression with its source location replaced.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        let slot = match &mut self {
            Self::Constant(e) => &mut e.span,
            Self::Variable(e) => &mut e.span,
            Self::MethodCall(e) => &mut e.span,
            Self::Property(e) => &mut e.span,
            Self::Binary(e) => &mut e.span,
            Self::Not(e) => &mut e.span,
            Self::Ternary(e) => &mut e.span,
            Self::List(e) => &mut e.span,
            Self::Map(e) => &mut e.span,
            Self::Cast(e) => &mut e.span,
        };
        *slot = Some(span);
        self
    }

    /// Returns the method call if this expression is one.
    #[must_use]
    pub const fn as_method_call(&self) -> Option<&MethodCall> {
        match self {
            Self::MethodCall(call) => Some(call),
            _ => None,
        }
    }

    /// Returns `true` when this is a call to `method`.
    #[must_use]
    pub fn is_call_to(&self, method: &str) -> bool {
        self.as_method_call()
            .is_some_and(|call| call.method == method)
    }

    /// Returns the direct child expressions in source order.
    ///
    /// An absent call receiver contributes no child.
    #[must_use]
    pub fn children(&self) -> Vec<&Self> {
        match self {
            Self::Constant(_) | Self::Variable(_) => Vec::new(),
            Self::MethodCall(call) => call
                .receiver
                .as_deref()
                .into_iter()
                .chain(call.arguments.iter())
                .collect(),
            Self::Property(access) => vec![&*access.object],
            Self::Binary(binary) => vec![&*binary.left, &*binary.right],
            Self::Not(not) => vec![&*not.operand],
            Self::Ternary(ternary) => vec![
                &*ternary.condition,
                &*ternary.then_value,
                &*ternary.else_value,
            ],
            Self::List(list) => list.elements.iter().collect(),
            Self::Map(map) => map
                .entries
                .iter()
                .flat_map(|entry| [&entry.key, &entry.value])
                .collect(),
            Self::Cast(cast) => vec![&*cast.operand],
        }
    }

    /// Visits this expression and its descendants in pre-order.
    pub fn walk(&self, visit: &mut impl FnMut(&Self)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Rebuilds this expression with every direct child replaced by
    /// `f(child)`.
    ///
    /// Children are visited in source order, so siblings are processed left
    /// to right. Leaf expressions are returned unchanged without calling
    /// `f`. The first error aborts the rebuild.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn map_children<E, F>(self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(Self) -> Result<Self, E>,
    {
        let rebuilt = match self {
            leaf @ (Self::Constant(_) | Self::Variable(_)) => leaf,
            Self::MethodCall(call) => Self::MethodCall(MethodCall {
                receiver: call
                    .receiver
                    .map(|receiver| map_boxed(receiver, &mut f))
                    .transpose()?,
                method: call.method,
                arguments: map_all(call.arguments, &mut f)?,
                span: call.span,
            }),
            Self::Property(access) => Self::Property(PropertyAccess {
                object: map_boxed(access.object, &mut f)?,
                property: access.property,
                span: access.span,
            }),
            Self::Binary(binary) => {
                let left = map_boxed(binary.left, &mut f)?;
                let right = map_boxed(binary.right, &mut f)?;
                Self::Binary(Binary {
                    op: binary.op,
                    left,
                    right,
                    span: binary.span,
                })
            }
            Self::Not(not) => Self::Not(Not {
                operand: map_boxed(not.operand, &mut f)?,
                span: not.span,
            }),
            Self::Ternary(ternary) => {
                let condition = map_boxed(ternary.condition, &mut f)?;
                let then_value = map_boxed(ternary.then_value, &mut f)?;
                let else_value = map_boxed(ternary.else_value, &mut f)?;
                Self::Ternary(Ternary {
                    condition,
                    then_value,
                    else_value,
                    span: ternary.span,
                })
            }
            Self::List(list) => Self::List(ListExpr {
                elements: map_all(list.elements, &mut f)?,
                span: list.span,
            }),
            Self::Map(map) => {
                let mut entries = Vec::with_capacity(map.entries.len());
                for entry in map.entries {
                    let key = f(entry.key)?;
                    let value = f(entry.value)?;
                    entries.push(MapEntry { key, value });
                }
                Self::Map(MapExpr {
                    entries,
                    span: map.span,
                })
            }
            Self::Cast(cast) => Self::Cast(Cast {
                type_name: cast.type_name,
                operand: map_boxed(cast.operand, &mut f)?,
                span: cast.span,
            }),
        };
        Ok(rebuilt)
    }
}

impl From<MethodCall> for Expr {
    fn from(call: MethodCall) -> Self {
        Self::MethodCall(call)
    }
}

fn map_boxed<E, F>(expr: Box<Expr>, f: &mut F) -> Result<Box<Expr>, E>
where
    F: FnMut(Expr) -> Result<Expr, E>,
{
    f(*expr).map(Box::new)
}

fn map_all<E, F>(exprs: Vec<Expr>, f: &mut F) -> Result<Vec<Expr>, E>
where
    F: FnMut(Expr) -> Result<Expr, E>,
{
    exprs.into_iter().map(f).collect()
}
