//! Property-based tests using QuickCheck

use ipehr_aql::ast::{FromClause, ObjectPath, Primitive};
use ipehr_aql::path::evaluate;
use ipehr_aql::tree::{Node, ToNode, ValueNode};
use ipehr_aql::{Context, DocumentIndex, Executor, Row, Value};
use ipehr_models::Ehr;
use quickcheck::{QuickCheck, TestResult};
use std::sync::Arc;
use test_support::{expr, literal, path, query, seg};

mod test_support;

/// Property: evaluating the same path twice over the same tree gives the same answer
#[test]
fn prop_evaluation_idempotent() {
    fn prop(identifiers: Vec<String>) -> TestResult {
        let tree = Arc::new(test_support::vital_signs().to_node());
        let path = ObjectPath::from_identifiers(identifiers);

        TestResult::from_bool(evaluate(&path, &tree) == evaluate(&path, &tree))
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Vec<String>) -> TestResult);
}

/// Property: a value node returns its wrapped data whatever segments remain
#[test]
fn prop_value_node_returns_wrapped_data() {
    fn prop(data: String, identifiers: Vec<String>) -> TestResult {
        let node = Arc::new(Node::from(ValueNode::new(data.as_str())));
        let path = ObjectPath::from_identifiers(identifiers);

        TestResult::from_bool(evaluate(&path, &node) == Some(Value::String(data)))
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(String, Vec<String>) -> TestResult);
}

/// Property: a slice is never entered without an archetype code
#[test]
fn prop_slice_without_predicate_never_matches() {
    fn prop(tail: Vec<String>) -> TestResult {
        let tree = Arc::new(test_support::vital_signs().to_node());
        let mut identifiers = vec!["content".to_string()];
        identifiers.extend(tail);
        let path = ObjectPath::from_identifiers(identifiers);

        TestResult::from_bool(evaluate(&path, &tree).is_none())
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(Vec<String>) -> TestResult);
}

/// Property: one column per SELECT expression, literals always in one trailing row
#[test]
fn prop_columns_match_select_list() {
    fn prop(ehr_count: u8, literals: Vec<i64>) -> TestResult {
        let ehr_count = usize::from(ehr_count % 8);
        let mut index = DocumentIndex::new();
        for i in 0..ehr_count {
            index.add_ehr(Ehr::new("gateway", format!("ehr-{i}"), "2024-01-01T00:00:00Z"));
        }

        let mut exprs = vec![expr(path("e", vec![seg("ehr_id"), seg("value")]), None)];
        exprs.extend(
            literals
                .iter()
                .map(|n| expr(literal(Primitive::Integer(*n)), None)),
        );
        let q = query(exprs, FromClause::class("EHR", Some("e")));

        let Ok(table) = Executor::new(index).execute(&q, &Context::new()) else {
            return TestResult::failed();
        };

        let expected_rows = ehr_count + usize::from(!literals.is_empty());
        let trailing_ok = literals.is_empty()
            || table.rows.last()
                == Some(&Row::new(literals.iter().copied().map(Value::Integer).collect()));

        TestResult::from_bool(
            table.columns.len() == literals.len() + 1
                && table.rows.len() == expected_rows
                && trailing_ok,
        )
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(u8, Vec<i64>) -> TestResult);
}
