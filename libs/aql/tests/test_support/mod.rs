#![allow(dead_code)]

use ipehr_aql::ast::{
    FromClause, IdentifiedPath, ObjectPath, PathSegment, Primitive, Query, SelectClause,
    SelectExpr, SelectValue,
};
use ipehr_aql::DocumentIndex;
use ipehr_models::{Composition, Document, Ehr};
use std::path::PathBuf;
use std::sync::OnceLock;

pub const EHR_ID: &str = "abc-123";

pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures")
}

pub fn load_fixture(name: &str) -> Document {
    let path = fixtures_root().join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()));
    text.parse()
        .unwrap_or_else(|e| panic!("failed to parse {}: {e}", path.display()))
}

pub fn ehr() -> Ehr {
    match load_fixture("ehr.json") {
        Document::Ehr(ehr) => ehr,
        other => panic!("expected EHR fixture, got {}", other.type_name()),
    }
}

pub fn vital_signs() -> &'static Composition {
    static COMPOSITION: OnceLock<Composition> = OnceLock::new();
    COMPOSITION.get_or_init(|| match load_fixture("composition_vital_signs.json") {
        Document::Composition(composition) => composition,
        other => panic!("expected COMPOSITION fixture, got {}", other.type_name()),
    })
}

/// Index holding the EHR fixture and its vital signs composition.
pub fn index() -> DocumentIndex {
    let mut index = DocumentIndex::new();
    index.add_ehr(ehr());
    index
        .add_composition(EHR_ID, vital_signs().clone())
        .expect("composition fixture has a versioned uid");
    index
}

// ============================================
// Query builders
// ============================================

pub fn path(identifier: &str, segments: Vec<PathSegment>) -> SelectValue {
    SelectValue::IdentifiedPath(IdentifiedPath::new(
        identifier,
        Some(ObjectPath::new(segments)),
    ))
}

pub fn seg(identifier: &str) -> PathSegment {
    PathSegment::new(identifier)
}

pub fn coded(identifier: &str, code: &str) -> PathSegment {
    PathSegment::with_code(identifier, code)
}

pub fn literal(value: Primitive) -> SelectValue {
    SelectValue::Primitive { value }
}

pub fn expr(value: SelectValue, alias: Option<&str>) -> SelectExpr {
    SelectExpr {
        value,
        alias: alias.map(str::to_string),
    }
}

pub fn query(exprs: Vec<SelectExpr>, from: FromClause) -> Query {
    Query {
        select: SelectClause {
            distinct: false,
            exprs,
        },
        from,
        where_clause: None,
        order_by: Vec::new(),
    }
}

/// `SELECT e/ehr_id/value AS ID FROM EHR e`
pub fn ehr_id_query() -> Query {
    query(
        vec![expr(
            path("e", vec![seg("ehr_id"), seg("value")]),
            Some("ID"),
        )],
        FromClause::class("EHR", Some("e")),
    )
}

/// Segments down to the systolic element of the blood pressure observation
pub fn systolic_element() -> Vec<PathSegment> {
    vec![
        coded("content", "openEHR-EHR-OBSERVATION.blood_pressure.v2"),
        coded("data", "at0001"),
        coded("events", "at0006"),
        coded("data", "at0003"),
        coded("items", "at0004"),
    ]
}
