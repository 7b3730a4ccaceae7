//! Path evaluation over built document trees

use ipehr_aql::ast::{ObjectPath, PathSegment};
use ipehr_aql::path::{evaluate, evaluate_all};
use ipehr_aql::tree::{Node, ToNode};
use ipehr_aql::Value;
use std::sync::Arc;
use test_support::{coded, seg, systolic_element};

mod test_support;

fn composition() -> Arc<Node> {
    Arc::new(test_support::vital_signs().to_node())
}

fn with(mut segments: Vec<PathSegment>, tail: &[&str]) -> ObjectPath {
    segments.extend(tail.iter().map(|s| seg(s)));
    ObjectPath::new(segments)
}

#[test]
fn test_nested_quantity_magnitude() {
    let path = with(systolic_element(), &["value", "magnitude"]);
    assert_eq!(evaluate(&path, &composition()), Some(Value::Real(120.0)));
}

#[test]
fn test_coded_text_code_string() {
    let path = ObjectPath::new(vec![
        coded("content", "openEHR-EHR-OBSERVATION.pulse.v2"),
        coded("data", "at0002"),
        coded("events", "at0003"),
        coded("data", "at0001"),
        coded("items", "at0005"),
        seg("value"),
        seg("defining_code"),
        seg("code_string"),
    ]);
    assert_eq!(evaluate(&path, &composition()), Some(Value::string("at0006")));
}

#[test]
fn test_object_attribute_without_predicate() {
    let path = ObjectPath::from_identifiers(["context", "start_time", "value"]);
    assert_eq!(
        evaluate(&path, &composition()),
        Some(Value::string("2024-03-02T09:30:00Z"))
    );
}

#[test]
fn test_wrong_archetype_code_is_dead_end() {
    let path = ObjectPath::new(vec![
        coded("content", "openEHR-EHR-OBSERVATION.blood_pressure.v2"),
        coded("data", "at9999"),
        coded("events", "at0006"),
    ]);
    assert_eq!(evaluate(&path, &composition()), None);
}

#[test]
fn test_slice_without_predicate_does_not_match() {
    let path = ObjectPath::from_identifiers(["content", "name", "value"]);
    assert_eq!(evaluate(&path, &composition()), None);
}

#[test]
fn test_missing_attribute_does_not_match() {
    let path = ObjectPath::from_identifiers(["feeder_audit", "value"]);
    assert_eq!(evaluate(&path, &composition()), None);
}

#[test]
fn test_path_ending_on_element_does_not_match() {
    let path = ObjectPath::new(systolic_element());
    assert_eq!(evaluate(&path, &composition()), None);
}

#[test]
fn test_value_node_ignores_trailing_segments() {
    let path = ObjectPath::from_identifiers(["archetype_node_id", "value", "more"]);
    assert_eq!(
        evaluate(&path, &composition()),
        Some(Value::string("openEHR-EHR-COMPOSITION.encounter.v1"))
    );
}

#[test]
fn test_synthetic_id_key() {
    let path = ObjectPath::new(vec![
        coded("content", "openEHR-EHR-OBSERVATION.pulse.v2"),
        seg("id"),
    ]);
    assert_eq!(
        evaluate(&path, &composition()),
        Some(Value::string("openEHR-EHR-OBSERVATION.pulse.v2"))
    );
}

#[test]
fn test_ehr_id_value() {
    let ehr = Arc::new(test_support::ehr().to_node());
    let path = ObjectPath::from_identifiers(["ehr_id", "value"]);
    assert_eq!(evaluate(&path, &ehr), Some(Value::string("abc-123")));
}

#[test]
fn test_evaluation_is_repeatable() {
    let tree = composition();
    let path = with(systolic_element(), &["value", "units"]);
    let first = evaluate(&path, &tree);
    assert_eq!(first, evaluate(&path, &tree));
    assert_eq!(first, Some(Value::string("mm[Hg]")));
}

#[test]
fn test_evaluate_all_keeps_collection_order() {
    let mut second = test_support::vital_signs().clone();
    second.locatable.name.value = "Vital signs (repeat)".into();

    let trees = vec![
        composition(),
        Arc::new(test_support::ehr().to_node()),
        Arc::new(second.to_node()),
    ];
    let path = ObjectPath::from_identifiers(["name", "value"]);

    assert_eq!(
        evaluate_all(&path, &trees),
        vec![
            Value::string("Vital signs"),
            Value::string("Vital signs (repeat)"),
        ]
    );
}
