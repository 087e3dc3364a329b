//! Tests for the stock criteria.

use rstest::rstest;

use crate::criteria::{Criteria, Selection, by_call_name, everything, predicate};
use crate::{BinaryOp, Expr, ExprKind};

#[rstest]
#[case::implicit_receiver(Expr::call("foo", vec![]))]
#[case::explicit_receiver(Expr::method_call(Expr::variable("this"), "foo", vec![Expr::int(1)]))]
fn by_call_name_matches_calls_to_the_name(#[case] expr: Expr) {
    let expected = expr.as_method_call().cloned();
    match by_call_name("foo").select(expr) {
        Selection::Matched(call) => assert_eq!(Some(call), expected),
        Selection::Rejected(other) => panic!("expected a match, got {other:?}"),
    }
}

#[rstest]
#[case::other_name(Expr::call("bar", vec![]))]
#[case::different_case(Expr::call("Foo", vec![]))]
#[case::prefix(Expr::call("fooBar", vec![]))]
#[case::variable(Expr::variable("foo"))]
#[case::property(Expr::property(Expr::variable("this"), "foo"))]
fn by_call_name_hands_back_everything_else(#[case] expr: Expr) {
    let selection = by_call_name("foo").select(expr.clone());
    assert_eq!(selection, Selection::Rejected(expr));
}

#[rstest]
fn by_call_name_reports_its_name() {
    assert_eq!(by_call_name("println").name(), "println");
}

#[rstest]
#[case(Expr::null())]
#[case(Expr::binary(BinaryOp::And, Expr::boolean(true), Expr::boolean(false)))]
#[case(Expr::call("foo", vec![]))]
fn everything_matches_any_expression(#[case] expr: Expr) {
    assert_eq!(everything().select(expr.clone()), Selection::Matched(expr));
}

#[rstest]
fn predicate_lifts_a_boolean_test() {
    let constants = predicate(|expr: &Expr| expr.kind() == ExprKind::Constant);
    assert!(constants.select(Expr::int(3)).is_match());
    assert!(!constants.select(Expr::variable("x")).is_match());
}

#[rstest]
fn closures_are_criteria() {
    let names = |expr: Expr| match expr {
        Expr::Variable(variable) => Selection::Matched(variable.name),
        other => Selection::Rejected(other),
    };
    assert_eq!(
        names.select(Expr::variable("count")),
        Selection::Matched(String::from("count"))
    );
    assert!(!names.select(Expr::int(1)).is_match());
}
