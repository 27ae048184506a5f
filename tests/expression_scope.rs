//! Expression evaluation against render-context scope chains

mod common;

use std::sync::Arc;

use bi_report::expression::{EXPRESSION_CACHE_TAG, ExpressionType, TypeFunction};
use bi_report::model::{Record, Value};
use bi_report::{ExpressionEvaluator, RenderContext, TypeVocabulary};
use common::record;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
fn test_identifier_falls_back_to_the_root(#[case] depth: usize) {
    let root = record(&[("k", Value::from("root value"))]);
    let levels: Vec<Record> = (0..depth)
        .map(|i| record(&[(format!("level{i}").as_str(), Value::Integer(i as i64))]))
        .collect();
    let evaluator = ExpressionEvaluator::default();

    fn descend(
        context: &RenderContext<'_>,
        levels: &[Record],
        evaluator: &ExpressionEvaluator,
        depth: usize,
    ) {
        match levels.split_first() {
            Some((scope, rest)) => {
                let child = context.child(scope);
                descend(&child, rest, evaluator, depth);
            }
            None => {
                assert_eq!(context.depth(), depth);
                assert_eq!(evaluator.evaluate(context, "k").unwrap(), Value::from("root value"));
                assert_eq!(evaluator.evaluate(context, "undefined").unwrap(), Value::Empty);
                assert_eq!(evaluator.evaluate(context, "level0").unwrap(), Value::Integer(0));
            }
        }
    }

    let context = RenderContext::root(&root);
    assert_eq!(evaluator.evaluate(&context, "undefined").unwrap(), Value::Empty);
    descend(&context, &levels, &evaluator, depth);
}

#[test]
fn test_identifier_with_spaces_is_a_lookup() {
    let scope = record(&[("Net Sales", Value::Integer(12))]);
    let evaluator = ExpressionEvaluator::default();
    let context = RenderContext::root(&scope);
    assert_eq!(evaluator.evaluate(&context, "Net Sales").unwrap(), Value::Integer(12));
}

struct Tally;

impl ExpressionType for Tally {
    fn name(&self) -> &'static str {
        "Tally"
    }

    fn functions(&self) -> Vec<TypeFunction> {
        vec![TypeFunction::new("sum", 2, |call| {
            Ok(Value::Integer(call.integer(0)? + call.integer(1)?))
        })]
    }
}

#[test]
fn test_repeated_evaluation_compiles_once() {
    let mut vocabulary = TypeVocabulary::standard();
    vocabulary.register(Tally);
    let evaluator = ExpressionEvaluator::new(Arc::new(vocabulary));

    let root = record(&[]);
    let row = record(&[("a", Value::Integer(2)), ("b", Value::Integer(3))]);
    let root_context = RenderContext::root(&root);
    let context = root_context.child(&row);

    for _ in 0..3 {
        assert_eq!(evaluator.evaluate(&context, "Tally.sum(a, b)").unwrap(), Value::Integer(5));
        assert_eq!(evaluator.evaluate(&context, "a+b").unwrap(), Value::Integer(5));
    }
    assert_eq!(evaluator.vocabulary().bindings(), 1);
    assert_eq!(evaluator.compilations(), 2);
    assert!(root_context.has_tag(EXPRESSION_CACHE_TAG));
    assert!(!context.has_tag(EXPRESSION_CACHE_TAG));
}

#[test]
fn test_compiled_expressions_do_not_fall_back() {
    let root = record(&[("rate", Value::Integer(3))]);
    let row = record(&[("amount", Value::Integer(5))]);
    let root_context = RenderContext::root(&root);
    let context = root_context.child(&row);
    let evaluator = ExpressionEvaluator::default();

    assert_eq!(evaluator.evaluate(&context, "rate").unwrap(), Value::Integer(3));
    assert_eq!(evaluator.evaluate(&context, "amount * rate").unwrap(), Value::Empty);
    assert_eq!(evaluator.evaluate(&context, "amount * 2").unwrap(), Value::Integer(10));
}

#[test]
fn test_separate_renders_do_not_share_a_cache() {
    let evaluator = ExpressionEvaluator::default();
    let scope = record(&[("a", Value::Integer(1))]);

    for _ in 0..2 {
        let root = RenderContext::root(&scope);
        assert_eq!(evaluator.evaluate(&root, "a + 1").unwrap(), Value::Integer(2));
    }
    assert_eq!(evaluator.compilations(), 2);
}

#[rstest]
#[case("Timestamp.parse('2024-01-31T00:00:00Z') + Duration.days(1)", "2024-02-01T00:00:00+00:00")]
#[case("Uuid.parse('67e55044-10b1-426f-9247-bb680e5fe0c8')", "67e55044-10b1-426f-9247-bb680e5fe0c8")]
#[case("Text.upper('abc') & '-' & Text.len('héllo')", "ABC-5")]
#[case("Math.round(10 / 4, 1)", "2.5")]
#[case("not (1 > 2) and 'x' != 'y'", "true")]
fn test_vocabulary_expressions(#[case] expression: &str, #[case] expected: &str) {
    let scope = record(&[]);
    let context = RenderContext::root(&scope);
    let value = ExpressionEvaluator::default().evaluate(&context, expression).unwrap();
    assert_eq!(value.to_string(), expected);
}

#[rstest]
#[case("1 +")]
#[case("Nope.call(1)")]
#[case("Text.upper()")]
#[case("1 / 0")]
#[case("'a' * 2")]
fn test_expression_errors_are_hard_failures(#[case] expression: &str) {
    let scope = record(&[]);
    let context = RenderContext::root(&scope);
    let err = ExpressionEvaluator::default().evaluate(&context, expression).unwrap_err();
    assert_eq!(err.expression(), expression);
}
