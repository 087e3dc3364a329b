//! Selection criteria for [`ExpressionRewriter`](crate::ExpressionRewriter).
//!
//! A criteria decides whether an expression is a rewrite target. Instead of
//! answering yes or no, it takes the expression by value and either hands it
//! back or returns the narrowed value the transform expects, so a criteria
//! and its transform can never disagree about the target type.

use graft_core::{Expr, MethodCall};

/// Outcome of applying a [`Criteria`] to an expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    /// The expression is a target, narrowed to the criteria's target type.
    Matched(T),
    /// The expression is not a target and is handed back unchanged.
    Rejected(Expr),
}

impl<T> Selection<T> {
    /// Returns `true` for [`Selection::Matched`].
    #[must_use]
    pub const fn is_match(&self) -> bool {
        matches!(self, Self::Matched(_))
    }
}

/// A pure predicate over expressions that narrows its matches.
///
/// Implementations must be deterministic and free of side effects; the
/// rewriter calls [`Criteria::select`] once per visited expression.
///
/// Closures of type `Fn(Expr) -> Selection<T>` are criteria.
pub trait Criteria {
    /// The value handed to the transform on a match.
    type Target;

    /// Selects `expr` as a target or hands it back.
    fn select(&self, expr: Expr) -> Selection<Self::Target>;
}

impl<T, F> Criteria for F
where
    F: Fn(Expr) -> Selection<T>,
{
    type Target = T;

    fn select(&self, expr: Expr) -> Selection<T> {
        self(expr)
    }
}

/// Matches method calls by exact, case-sensitive method name.
///
/// Built by [`by_call_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByCallName {
    name: String,
}

impl ByCallName {
    /// Returns the method name this criteria matches.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Criteria for ByCallName {
    type Target = MethodCall;

    fn select(&self, expr: Expr) -> Selection<MethodCall> {
        match expr {
            Expr::MethodCall(call) if call.method == self.name => Selection::Matched(call),
            other => Selection::Rejected(other),
        }
    }
}

/// Matches every expression.
///
/// Built by [`everything`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Everything;

impl Criteria for Everything {
    type Target = Expr;

    fn select(&self, expr: Expr) -> Selection<Expr> {
        Selection::Matched(expr)
    }
}

/// Lifts a boolean predicate into a criteria targeting whole expressions.
///
/// Built by [`predicate`].
#[derive(Debug, Clone, Copy)]
pub struct Predicate<F> {
    test: F,
}

impl<F> Criteria for Predicate<F>
where
    F: Fn(&Expr) -> bool,
{
    type Target = Expr;

    fn select(&self, expr: Expr) -> Selection<Expr> {
        if (self.test)(&expr) {
            Selection::Matched(expr)
        } else {
            Selection::Rejected(expr)
        }
    }
}

/// Matches calls whose invoked method is named exactly `name`.
///
/// Every other expression, including calls to other names, is rejected and
/// therefore recursed into by the rewriter.
///
/// # Example
///
/// ```
/// use graft::criteria::{by_call_name, Criteria};
/// use graft::Expr;
///
/// let criteria = by_call_name("println");
/// assert!(criteria.select(Expr::call("println", vec![])).is_match());
/// assert!(!criteria.select(Expr::call("print", vec![])).is_match());
/// ```
#[must_use]
pub fn by_call_name(name: impl Into<String>) -> ByCallName {
    ByCallName { name: name.into() }
}

/// Matches every expression, so a rewrite transforms only the root and never
/// recurses.
#[must_use]
pub const fn everything() -> Everything {
    Everything
}

/// Builds a criteria from a plain predicate over `&Expr`.
#[must_use]
pub const fn predicate<F>(test: F) -> Predicate<F>
where
    F: Fn(&Expr) -> bool,
{
    Predicate { test }
}
