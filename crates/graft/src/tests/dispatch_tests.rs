//! Tests for [`DispatchRule`].

use std::sync::Arc;

use rstest::{fixture, rstest};

use crate::{
    AstElement, Block, ClassNode, Dispatch, DispatchRule, Expr, FieldNode, Marker,
    MarkerCatalog, MethodNode, NodeKind, RuleError, SkipReason, Span, Stmt, TransformError,
};

/// Records what the handler saw.
#[derive(Debug, Default)]
struct Seen {
    calls: usize,
    markers: Vec<Marker>,
    nodes: Vec<String>,
}

#[fixture]
fn catalog() -> Arc<MarkerCatalog> {
    let mut catalog = MarkerCatalog::new();
    catalog.declare("Logged").expect("declare Logged");
    catalog.declare("Cached").expect("declare Cached");
    catalog
        .declare_refinement("AuditLogged", "Logged")
        .expect("declare AuditLogged");
    Arc::new(catalog)
}

fn method(name: &str) -> MethodNode {
    MethodNode::new(
        name,
        Block::new(vec![Stmt::Expr(Expr::call("println", vec![Expr::int(1)]))]),
    )
}

/// Dispatches `elements` through a `Logged` method rule that records calls
/// and renames the method.
fn dispatch_logged(
    catalog: Arc<MarkerCatalog>,
    elements: &mut [AstElement<'_>],
) -> (Dispatch, Seen) {
    let mut seen = Seen::default();
    let mut rule = DispatchRule::<MethodNode, _>::new(
        catalog,
        "Logged",
        |marker: &Marker, node: &mut MethodNode, seen: &mut Seen| -> Result<(), TransformError> {
            seen.calls += 1;
            seen.markers.push(marker.clone());
            seen.nodes.push(node.name.clone());
            node.name.push_str("_logged");
            Ok(())
        },
    )
    .expect("rule");
    let outcome = rule.dispatch(elements, &mut seen).expect("dispatch");
    (outcome, seen)
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[rstest]
#[case::empty("")]
#[case::whitespace("  ")]
fn construction_requires_a_marker_type(catalog: Arc<MarkerCatalog>, #[case] name: &str) {
    let handler = |_: &Marker, _: &mut MethodNode, _: &mut ()| -> Result<(), TransformError> {
        Ok(())
    };
    let err = DispatchRule::<MethodNode, _>::new(catalog, name, handler).expect_err("blank");
    assert!(matches!(err, RuleError::MissingMarkerType));
}

#[rstest]
fn construction_rejects_undeclared_marker(catalog: Arc<MarkerCatalog>) {
    let handler = |_: &Marker, _: &mut MethodNode, _: &mut ()| -> Result<(), TransformError> {
        Ok(())
    };
    let err =
        DispatchRule::<MethodNode, _>::new(catalog, "Traced", handler).expect_err("undeclared");
    insta::assert_snapshot!(err.to_string(), @"marker type `Traced` is not declared in the catalog");
}

#[rstest]
fn binding_reports_marker_and_node_kind(catalog: Arc<MarkerCatalog>) {
    let handler = |_: &Marker, _: &mut FieldNode, _: &mut ()| -> Result<(), TransformError> {
        Ok(())
    };
    let rule = DispatchRule::<FieldNode, _>::new(catalog, "Cached", handler).expect("rule");
    assert_eq!(rule.binding().marker_type().as_str(), "Cached");
    assert_eq!(rule.binding().node_kind(), NodeKind::Field);
    assert_eq!(rule.binding().to_string(), "@Cached on field");
}

// ---------------------------------------------------------------------------
// Matching pairs
// ---------------------------------------------------------------------------

#[rstest]
fn matching_pair_invokes_handler_once_with_same_instances(catalog: Arc<MarkerCatalog>) {
    let marker = Marker::new("Logged").with_member("level", Expr::string("info"));
    let mut node = method("greet");

    let (outcome, seen) = dispatch_logged(
        catalog,
        &mut [AstElement::Marker(&marker), AstElement::Method(&mut node)],
    );

    assert_eq!(outcome, Dispatch::Applied);
    assert_eq!(seen.calls, 1);
    assert_eq!(seen.markers, vec![marker]);
    assert_eq!(seen.nodes, vec![String::from("greet")]);
    assert_eq!(node.name, "greet_logged");
}

#[rstest]
fn refined_marker_matches_broader_rule(catalog: Arc<MarkerCatalog>) {
    let marker = Marker::new("AuditLogged");
    let mut node = method("greet");

    let (outcome, seen) = dispatch_logged(
        catalog,
        &mut [AstElement::Marker(&marker), AstElement::Method(&mut node)],
    );

    assert!(outcome.is_applied());
    assert_eq!(seen.calls, 1);
}

#[rstest]
fn rule_is_reusable_across_pairs(catalog: Arc<MarkerCatalog>) {
    let mut calls = 0;
    let mut rule = DispatchRule::<MethodNode, _>::new(
        catalog,
        "Logged",
        |_: &Marker, _: &mut MethodNode, _: &mut ()| -> Result<(), TransformError> {
            calls += 1;
            Ok(())
        },
    )
    .expect("rule");

    let logged = Marker::new("Logged");
    let cached = Marker::new("Cached");
    let mut first = method("first");
    let mut second = method("second");
    let mut third = method("third");
    rule.dispatch(
        &mut [AstElement::Marker(&logged), AstElement::Method(&mut first)],
        &mut (),
    )
    .expect("first");
    rule.dispatch(
        &mut [AstElement::Marker(&cached), AstElement::Method(&mut second)],
        &mut (),
    )
    .expect("second");
    rule.dispatch(
        &mut [AstElement::Marker(&logged), AstElement::Method(&mut third)],
        &mut (),
    )
    .expect("third");
    drop(rule);

    assert_eq!(calls, 2);
}

// ---------------------------------------------------------------------------
// Ignored pairs
// ---------------------------------------------------------------------------

#[rstest]
fn empty_input_is_ignored(catalog: Arc<MarkerCatalog>) {
    let (outcome, seen) = dispatch_logged(catalog, &mut []);
    assert_eq!(outcome, Dispatch::Skipped(SkipReason::Empty));
    assert_eq!(seen.calls, 0);
}

#[rstest]
fn single_marker_is_ignored(catalog: Arc<MarkerCatalog>) {
    let marker = Marker::new("Logged");
    let (outcome, seen) = dispatch_logged(catalog, &mut [AstElement::Marker(&marker)]);
    assert_eq!(outcome, Dispatch::Skipped(SkipReason::WrongArity { len: 1 }));
    assert_eq!(seen.calls, 0);
}

#[rstest]
fn triple_is_ignored(catalog: Arc<MarkerCatalog>) {
    let marker = Marker::new("Logged");
    let mut node = method("greet");
    let original = node.clone();
    let (outcome, seen) = dispatch_logged(
        catalog,
        &mut [
            AstElement::Marker(&marker),
            AstElement::Marker(&marker),
            AstElement::Method(&mut node),
        ],
    );
    assert_eq!(outcome, Dispatch::Skipped(SkipReason::WrongArity { len: 3 }));
    assert_eq!(seen.calls, 0);
    assert_eq!(node, original);
}

#[rstest]
fn reversed_pair_is_ignored(catalog: Arc<MarkerCatalog>) {
    let marker = Marker::new("Logged");
    let mut node = method("greet");
    let original = node.clone();
    let (outcome, seen) = dispatch_logged(
        catalog,
        &mut [AstElement::Method(&mut node), AstElement::Marker(&marker)],
    );
    assert_eq!(outcome, Dispatch::Skipped(SkipReason::FirstNotMarker));
    assert_eq!(seen.calls, 0);
    assert_eq!(node, original);
}

#[rstest]
fn marker_on_expression_is_ignored(catalog: Arc<MarkerCatalog>) {
    let marker = Marker::new("Logged");
    let mut expr = Expr::call("println", vec![]);
    let (outcome, seen) = dispatch_logged(
        catalog,
        &mut [AstElement::Marker(&marker), AstElement::Expr(&mut expr)],
    );
    assert_eq!(outcome, Dispatch::Skipped(SkipReason::LastNotAnnotated));
    assert_eq!(seen.calls, 0);
}

#[rstest]
#[case::unrelated("Cached")]
#[case::undeclared("Traced")]
fn unrelated_marker_is_ignored(catalog: Arc<MarkerCatalog>, #[case] marker_type: &str) {
    let marker = Marker::new(marker_type);
    let mut node = method("greet");
    let original = node.clone();
    let (outcome, seen) = dispatch_logged(
        catalog,
        &mut [AstElement::Marker(&marker), AstElement::Method(&mut node)],
    );
    assert_eq!(
        outcome.skip_reason(),
        Some(&SkipReason::MarkerMismatch {
            found: marker.marker_type().clone()
        })
    );
    assert_eq!(seen.calls, 0);
    assert_eq!(node, original);
}

#[rstest]
fn other_node_kind_is_ignored(catalog: Arc<MarkerCatalog>) {
    let marker = Marker::new("Logged");
    let mut class = ClassNode::new("Service");
    let (outcome, seen) = dispatch_logged(
        catalog,
        &mut [AstElement::Marker(&marker), AstElement::Class(&mut class)],
    );
    assert_eq!(
        outcome,
        Dispatch::Skipped(SkipReason::NodeKindMismatch {
            found: NodeKind::Class
        })
    );
    assert_eq!(seen.calls, 0);
}

#[rstest]
fn marker_type_is_checked_before_node_kind(catalog: Arc<MarkerCatalog>) {
    let marker = Marker::new("Cached");
    let mut class = ClassNode::new("Service");
    let (outcome, _) = dispatch_logged(
        catalog,
        &mut [AstElement::Marker(&marker), AstElement::Class(&mut class)],
    );
    assert!(matches!(
        outcome,
        Dispatch::Skipped(SkipReason::MarkerMismatch { .. })
    ));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[rstest]
fn handler_errors_propagate_with_node_attribution(catalog: Arc<MarkerCatalog>) {
    let mut rule = DispatchRule::<MethodNode, _>::new(
        catalog,
        "Logged",
        |_: &Marker, node: &mut MethodNode, _: &mut ()| -> Result<(), TransformError> {
            Err(TransformError::failed(format!(
                "{} has no logger in scope",
                node.name
            )))
        },
    )
    .expect("rule");

    let marker = Marker::new("AuditLogged");
    let span = Span::on_line(12, 4, 30);
    let mut node = method("greet");
    node.span = Some(span);

    let err = rule
        .dispatch(
            &mut [AstElement::Marker(&marker), AstElement::Method(&mut node)],
            &mut (),
        )
        .expect_err("handler failure");

    assert!(matches!(err, TransformError::Handler { .. }));
    assert_eq!(err.span(), Some(&span));
    insta::assert_snapshot!(
        err.to_string(),
        @"@AuditLogged on method `greet` failed: greet has no logger in scope"
    );
}
