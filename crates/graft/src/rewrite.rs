//! Single-pass, pre-order rewriting of expression trees.
//!
//! The rewriter tests each expression against its criteria before looking at
//! the children. A match is replaced by the transform's output and the
//! output is not visited again; a non-match is rebuilt from its rewritten
//! children. Each branch is therefore rewritten at most once, at its
//! outermost match.

use graft_core::{Block, Expr, MethodNode};
use tracing::{debug, trace};

use crate::criteria::{Criteria, Selection};
use crate::error::TransformError;

/// Tracing target for rewrite operations.
pub const REWRITE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::rewrite");

/// Produces the replacement for a selected target.
///
/// `C` is the reporting context the rewriter was built with. Closures of
/// type `FnMut(T, &mut C) -> Result<Expr, TransformError>` are transforms.
pub trait Transform<T, C: ?Sized> {
    /// Builds the replacement expression for `target`.
    ///
    /// # Errors
    ///
    /// Any error aborts the rewrite and is propagated to the caller.
    fn transform(&mut self, target: T, context: &mut C) -> Result<Expr, TransformError>;
}

impl<T, C, F> Transform<T, C> for F
where
    C: ?Sized,
    F: FnMut(T, &mut C) -> Result<Expr, TransformError>,
{
    fn transform(&mut self, target: T, context: &mut C) -> Result<Expr, TransformError> {
        self(target, context)
    }
}

/// Rewrites expression trees with a criteria and a transform.
///
/// The rewriter borrows the reporting context for its whole lifetime, so it
/// is built for one rewrite operation and dropped afterwards.
///
/// # Example
///
/// ```
/// use graft::criteria::by_call_name;
/// use graft::{Diagnostics, Expr, ExpressionRewriter, MethodCall, TransformError};
///
/// let mut diagnostics = Diagnostics::new();
/// let mut rewriter = ExpressionRewriter::new(
///     &mut diagnostics,
///     by_call_name("println"),
///     |call: MethodCall, _: &mut Diagnostics| -> Result<Expr, TransformError> {
///         Ok(Expr::method_call(Expr::variable("log"), "info", call.arguments))
///     },
/// );
///
/// let rewritten = rewriter.rewrite(Expr::call("println", vec![Expr::string("hi")]))?;
/// assert_eq!(
///     rewritten,
///     Expr::method_call(Expr::variable("log"), "info", vec![Expr::string("hi")])
/// );
/// # Ok::<(), TransformError>(())
/// ```
pub struct ExpressionRewriter<'ctx, C: ?Sized, K, X> {
    context: &'ctx mut C,
    criteria: K,
    transform: X,
    replacements: usize,
}

impl<'ctx, C, K, X> ExpressionRewriter<'ctx, C, K, X>
where
    C: ?Sized,
    K: Criteria,
    X: Transform<K::Target, C>,
{
    /// Creates a rewriter that forwards `context` to `transform`.
    pub fn new(context: &'ctx mut C, criteria: K, transform: X) -> Self {
        Self {
            context,
            criteria,
            transform,
            replacements: 0,
        }
    }

    /// Rewrites `expr`, returning the rebuilt tree.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the transform. The partially
    /// rewritten tree is discarded.
    pub fn rewrite(&mut self, expr: Expr) -> Result<Expr, TransformError> {
        let kind = expr.kind();
        match self.criteria.select(expr) {
            Selection::Matched(target) => {
                trace!(target: REWRITE_TARGET, %kind, "criteria matched");
                self.replacements = self.replacements.saturating_add(1);
                self.transform.transform(target, self.context)
            }
            Selection::Rejected(rejected) => rejected.map_children(|child| self.rewrite(child)),
        }
    }

    /// Rewrites an optional expression; `None` is returned as is without
    /// consulting the criteria.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the transform.
    pub fn rewrite_opt(&mut self, expr: Option<Expr>) -> Result<Option<Expr>, TransformError> {
        expr.map(|inner| self.rewrite(inner)).transpose()
    }

    /// Rewrites the expression in `slot` and stores the result back.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the transform. On error `slot`
    /// keeps its original expression.
    pub fn rewrite_in_place(&mut self, slot: &mut Expr) -> Result<(), TransformError> {
        *slot = self.rewrite(slot.clone())?;
        Ok(())
    }

    /// Rewrites every expression owned by the statements of `block`, in
    /// source order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the transform. Statements already
    /// rewritten keep their new expressions.
    pub fn rewrite_block(&mut self, block: &mut Block) -> Result<(), TransformError> {
        let before = self.replacements;
        block.try_for_each_expr_mut(&mut |slot: &mut Expr| self.rewrite_in_place(slot))?;
        debug!(
            target: REWRITE_TARGET,
            statements = block.statements.len(),
            replacements = self.replacements.saturating_sub(before),
            "rewrote block"
        );
        Ok(())
    }

    /// Rewrites the parameter default values and then the body of `method`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by the transform.
    pub fn rewrite_method(&mut self, method: &mut MethodNode) -> Result<(), TransformError> {
        for parameter in &mut method.parameters {
            if let Some(default) = parameter.default_value.as_mut() {
                self.rewrite_in_place(default)?;
            }
        }
        self.rewrite_block(&mut method.body)
    }

    /// Returns how many times the transform has run.
    #[must_use]
    pub const fn replacements(&self) -> usize {
        self.replacements
    }
}
