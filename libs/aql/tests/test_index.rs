//! DocumentIndex as a data source resolver

use ipehr_aql::{DataSourceResolver, DocumentIndex, ResolveError, Value};
use ipehr_models::{
    Document, Ehr, EhrStatus, Error, Locatable, ObjectVersionId, PartyProxy, UidBasedId,
};
use serde_json::json;

mod test_support;

fn status() -> EhrStatus {
    EhrStatus {
        locatable: Locatable::new("openEHR-EHR-EHR_STATUS.generic.v1", "EHR Status"),
        subject: PartyProxy::PartySelf { external_ref: None },
        is_queryable: true,
        is_modifiable: true,
        other_details: None,
    }
}

#[test]
fn test_serves_ehr_and_composition_classes() {
    let index = test_support::index();

    let ehrs = index.resolve("EHR").unwrap();
    assert_eq!(ehrs.len(), 1);
    assert_eq!(ehrs.groups().keys().collect::<Vec<_>>(), vec!["abc-123"]);

    let compositions = index.resolve("COMPOSITION").unwrap();
    assert_eq!(compositions.len(), 1);
    let node = compositions.nodes().next().unwrap();
    assert_eq!(node.type_name(), "COMPOSITION");
}

#[test]
fn test_unknown_class_is_not_found() {
    let index = test_support::index();
    assert_eq!(
        index.resolve("FOLDER").unwrap_err(),
        ResolveError::NotFound("FOLDER".into())
    );
}

#[test]
fn test_known_class_without_documents_is_empty() {
    let index = DocumentIndex::new();
    assert!(index.resolve("COMPOSITION").unwrap().is_empty());
    assert!(index.resolve("EHR_STATUS").unwrap().is_empty());
}

#[test]
fn test_groups_follow_insertion_order() {
    let mut index = DocumentIndex::new();
    for id in ["z", "a", "m"] {
        index.add_ehr(Ehr::new("gateway", id, "2024-01-01T00:00:00Z"));
    }

    let container = index.resolve("EHR").unwrap();
    assert_eq!(
        container.groups().keys().collect::<Vec<_>>(),
        vec!["z", "a", "m"]
    );
}

#[test]
fn test_new_version_replaces_composition() {
    let mut index = test_support::index();
    let mut revised = test_support::vital_signs().clone();
    revised.locatable.uid = Some(UidBasedId::Version(ObjectVersionId::new(
        "8849182c-82ad-4088-a07f-48ead4180515::gateway.ipehr.example::2",
    )));
    revised.locatable.name.value = "Vital signs (corrected)".into();
    index.add_composition("abc-123", revised).unwrap();

    let record = index.record("abc-123").unwrap();
    assert_eq!(record.compositions.len(), 1);
    assert_eq!(
        record.compositions[0].locatable.name.value,
        "Vital signs (corrected)"
    );
}

#[test]
fn test_composition_without_uid_is_rejected() {
    let mut index = DocumentIndex::new();
    let mut composition = test_support::vital_signs().clone();
    composition.locatable.uid = None;

    assert!(matches!(
        index.add_composition("abc-123", composition),
        Err(Error::MissingField(field)) if field == "uid"
    ));
}

#[test]
fn test_add_document_requires_ehr_id_for_owned_documents() {
    let mut index = DocumentIndex::new();
    let doc = Document::EhrStatus(status());

    assert!(index.add_document(None, doc.clone()).is_err());
    index.add_document(Some("abc-123"), doc).unwrap();

    let statuses = index.resolve("EHR_STATUS").unwrap();
    let node = statuses.nodes().next().unwrap();
    assert_eq!(node.type_name(), "EHR_STATUS");
    assert_eq!(
        node.child("is_queryable").unwrap().as_value(),
        Some(&Value::Boolean(true))
    );
}

#[test]
fn test_raw_documents_are_served_as_values() {
    let mut index = DocumentIndex::new();
    index.add_raw("FOLDER", "abc-123", json!({ "name": "root" }));

    assert!(index.class_names().contains(&"FOLDER".to_string()));
    let container = index.resolve("FOLDER").unwrap();
    let node = container.nodes().next().unwrap();
    assert_eq!(node.as_value(), Some(&Value::Json(json!({ "name": "root" }))));
}

#[test]
fn test_each_resolve_builds_fresh_trees() {
    let index = test_support::index();
    let first = index.resolve("COMPOSITION").unwrap();
    let second = index.resolve("COMPOSITION").unwrap();

    let a = first.nodes().next().unwrap();
    let b = second.nodes().next().unwrap();
    assert!(!std::sync::Arc::ptr_eq(a, b));
    assert_eq!(a, b);
}
