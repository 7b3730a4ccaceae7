//! End-to-end runs over the shared document fixtures

use ipehr_aql::{ResolveError, Value};
use ipehr_cli::commands::{document_tree, run_query, QueryOverrides};
use ipehr_cli::config::Config;
use ipehr_cli::loader::load_index;
use ipehr_cli::request::QueryRequest;
use serde_json::json;
use std::path::PathBuf;

fn documents_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures")
}

fn query_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/queries")
        .join(name)
}

#[test]
fn test_fixture_directory_loads_into_one_ehr() {
    let index = load_index(&documents_dir()).unwrap();
    let record = index.record("abc-123").expect("EHR fixture decides the EHR id");

    assert!(record.ehr.is_some());
    assert_eq!(record.compositions.len(), 1);
}

#[test]
fn test_query_request_with_parameter() {
    let request = QueryRequest::from_path(&query_file("ehr_id.json")).unwrap();
    let result = run_query(
        &Config::default(),
        &documents_dir(),
        &request,
        &QueryOverrides::default(),
    )
    .unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "q": "SELECT e/ehr_id/value AS ID, $site AS site FROM EHR e",
            "columns": [
                { "name": "ID", "path": "e/ehr_id/value" },
                { "name": "site" }
            ],
            "rows": [["abc-123"], ["Berlin"]]
        })
    );
}

#[test]
fn test_bare_syntax_tree_query() {
    let request = QueryRequest::from_path(&query_file("systolic.json")).unwrap();
    let result = run_query(
        &Config::default(),
        &documents_dir(),
        &request,
        &QueryOverrides::default(),
    )
    .unwrap();

    assert!(result.q.is_empty());
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].values, vec![Value::Real(120.0)]);
}

#[test]
fn test_flags_override_request_pagination() {
    let request = QueryRequest::from_path(&query_file("ehr_id.json")).unwrap();
    let overrides = QueryOverrides {
        offset: Some(1),
        ..QueryOverrides::default()
    };
    let result = run_query(&Config::default(), &documents_dir(), &request, &overrides).unwrap();

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].values, vec![Value::string("Berlin")]);
}

#[test]
fn test_unknown_class_reports_resolution_error() {
    let mut request = QueryRequest::from_path(&query_file("ehr_id.json")).unwrap();
    request.query.from = ipehr_aql::ast::FromClause::class("FOLDER", Some("e"));

    let err = run_query(
        &Config::default(),
        &documents_dir(),
        &request,
        &QueryOverrides::default(),
    )
    .unwrap_err();

    let engine_error = err
        .downcast_ref::<ipehr_aql::Error>()
        .expect("engine error in chain");
    assert!(matches!(
        engine_error,
        ipehr_aql::Error::SourceResolution {
            source: ResolveError::NotFound(_),
            ..
        }
    ));
}

#[test]
fn test_tree_of_composition_document() {
    let tree = document_tree(&documents_dir().join("composition_vital_signs.json")).unwrap();
    let json = serde_json::to_value(&tree).unwrap();

    assert_eq!(json["type"], "COMPOSITION");
    assert_eq!(json["id"], "openEHR-EHR-COMPOSITION.encounter.v1");
    assert_eq!(json["name"]["values"]["value"], "Vital signs");
    assert_eq!(json.as_object().unwrap().keys().filter(|k| *k == "name").count(), 1);
    assert_eq!(json["content"][1]["id"], "openEHR-EHR-OBSERVATION.pulse.v2");
}
