//! Conversion of typed openEHR values into tree nodes
//!
//! Every reference model type has exactly one canonical tree representation, selected at
//! compile time through [`ToNode`]:
//!
//! | Input | Node |
//! |---|---|
//! | `Ehr`, `Composition`, `EventContext` | object node of the matching kind |
//! | locatables (entries, structures, items) | object node with `name`, `archetype_node_id`, ... |
//! | data values | data value node with the value's attributes |
//! | identifiers | value node holding the identifier string, typed with its id type |
//! | `CodePhrase` | object node `{terminology_id, code_string, preferred_term}` |
//! | lists | slice node keyed by element id |
//! | scalars | value node |
//! | `serde_json::Value` | value node wrapping the JSON verbatim |

use super::{DataValueNode, Node, ObjectKind, ObjectNode, SliceNode, ValueNode};
use crate::value::Value;
use ipehr_models::common::{
    AdminEntry, ArchetypeId, Archetyped, Cluster, CodePhrase, Composition, ContentItem,
    DataValue, DvBoolean, DvCodedText, DvCount, DvDate, DvDateTime, DvIdentifier, DvOrdinal,
    DvProportion, DvQuantity, DvText, DvUri, Ehr, EhrStatus, Element, Evaluation, Event,
    EventContext, GenericId, HierObjectId, History, Identifier, Interval, Item, ItemList,
    ItemSingle, ItemStructure, ItemTree, Locatable, ObjectId, ObjectRef, ObjectVersionId,
    Observation, PartyProxy, Root, Section, TemplateId, TerminologyId, UidBasedId,
};

/// Conversion into the generic tree.
///
/// Never fails: anything reachable from a well-formed document has a representation.
pub trait ToNode {
    fn to_node(&self) -> Node;
}

impl<T: ToNode + ?Sized> ToNode for Box<T> {
    fn to_node(&self) -> Node {
        (**self).to_node()
    }
}

impl<T: ToNode> ToNode for Vec<T> {
    fn to_node(&self) -> Node {
        let mut slice = SliceNode::new();
        for item in self {
            slice.push(item.to_node());
        }
        slice.into()
    }
}

// ============================================
// Scalars
// ============================================

impl ToNode for str {
    fn to_node(&self) -> Node {
        ValueNode::new(self).into()
    }
}

impl ToNode for String {
    fn to_node(&self) -> Node {
        self.as_str().to_node()
    }
}

impl ToNode for bool {
    fn to_node(&self) -> Node {
        ValueNode::new(*self).into()
    }
}

impl ToNode for i64 {
    fn to_node(&self) -> Node {
        ValueNode::new(*self).into()
    }
}

impl ToNode for f64 {
    fn to_node(&self) -> Node {
        ValueNode::new(*self).into()
    }
}

/// Unstructured fallback for content without a typed model.
impl ToNode for serde_json::Value {
    fn to_node(&self) -> Node {
        tracing::warn!(
            json_type = json_type(self),
            "building unstructured value node from untyped JSON"
        );
        let value = match self {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n
                    .as_f64()
                    .map_or_else(|| Value::Json(self.clone()), Value::Real),
            },
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Value::Json(self.clone()),
        };
        ValueNode::typed("JSON", value).into()
    }
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ============================================
// Identifiers
// ============================================

fn identifier_node(id: &impl Identifier) -> Node {
    ValueNode::typed(id.id_type(), id.value()).into()
}

macro_rules! identifier_to_node {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToNode for $ty {
                fn to_node(&self) -> Node {
                    identifier_node(self)
                }
            }
        )*
    };
}

identifier_to_node!(
    HierObjectId,
    ObjectVersionId,
    TerminologyId,
    ArchetypeId,
    TemplateId,
    GenericId,
    UidBasedId,
    ObjectId,
);

impl ToNode for ObjectRef {
    fn to_node(&self) -> Node {
        let mut node = ObjectNode::new("OBJECT_REF").with_id(self.id.value());
        node.insert("namespace", self.namespace.to_node());
        node.insert("type", self.type_.to_node());
        node.insert("id", self.id.to_node());
        node.into()
    }
}

impl ToNode for CodePhrase {
    fn to_node(&self) -> Node {
        let mut node = ObjectNode::new("CODE_PHRASE");
        node.insert("terminology_id", self.terminology_id.to_node());
        node.insert("code_string", self.code_string.to_node());
        node.insert(
            "preferred_term",
            ValueNode::new(self.preferred_term.clone()).into(),
        );
        node.into()
    }
}

impl ToNode for PartyProxy {
    fn to_node(&self) -> Node {
        let mut node = ObjectNode::new(self.type_name());
        if let PartyProxy::PartyIdentified {
            name: Some(name), ..
        } = self
        {
            node.insert("name", name.to_node());
        }
        node.insert_opt("external_ref", self.external_ref().map(ToNode::to_node));
        node.into()
    }
}

// ============================================
// Data values
// ============================================

impl ToNode for DataValue {
    fn to_node(&self) -> Node {
        match self {
            DataValue::Text(v) => v.to_node(),
            DataValue::CodedText(v) => v.to_node(),
            DataValue::Quantity(v) => v.to_node(),
            DataValue::Count(v) => v.to_node(),
            DataValue::Boolean(v) => v.to_node(),
            DataValue::DateTime(v) => v.to_node(),
            DataValue::Date(v) => v.to_node(),
            DataValue::Identifier(v) => v.to_node(),
            DataValue::Uri(v) => v.to_node(),
            DataValue::Proportion(v) => v.to_node(),
            DataValue::Ordinal(v) => v.to_node(),
            DataValue::Interval(v) => interval_node("DV_INTERVAL", v),
        }
    }
}

macro_rules! single_value_to_node {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl ToNode for $ty {
                fn to_node(&self) -> Node {
                    let mut node = DataValueNode::new($name);
                    node.insert("value", self.value.to_node());
                    node.into()
                }
            }
        )*
    };
}

single_value_to_node! {
    DvText => "DV_TEXT",
    DvBoolean => "DV_BOOLEAN",
    DvDateTime => "DV_DATE_TIME",
    DvDate => "DV_DATE",
    DvUri => "DV_URI",
}

impl ToNode for DvCodedText {
    fn to_node(&self) -> Node {
        let mut node = DataValueNode::new("DV_CODED_TEXT");
        node.insert("value", self.value.to_node());
        node.insert("defining_code", self.defining_code.to_node());
        node.into()
    }
}

impl ToNode for DvQuantity {
    fn to_node(&self) -> Node {
        let mut node = DataValueNode::new("DV_QUANTITY");
        node.insert("magnitude", self.magnitude.to_node());
        node.insert("units", self.units.to_node());
        node.insert_opt("precision", self.precision.as_ref().map(ToNode::to_node));
        node.insert_opt(
            "normal_range",
            self.normal_range
                .as_ref()
                .map(|range| interval_node("INTERVAL", range)),
        );
        node.into()
    }
}

impl ToNode for DvCount {
    fn to_node(&self) -> Node {
        let mut node = DataValueNode::new("DV_COUNT");
        node.insert("magnitude", self.magnitude.to_node());
        node.into()
    }
}

impl ToNode for DvIdentifier {
    fn to_node(&self) -> Node {
        let mut node = DataValueNode::new("DV_IDENTIFIER");
        node.insert("id", self.id.to_node());
        node.insert_opt("issuer", self.issuer.as_ref().map(ToNode::to_node));
        node.insert_opt("assigner", self.assigner.as_ref().map(ToNode::to_node));
        node.insert_opt("type", self.type_.as_ref().map(ToNode::to_node));
        node.into()
    }
}

impl ToNode for DvProportion {
    fn to_node(&self) -> Node {
        let mut node = DataValueNode::new("DV_PROPORTION");
        node.insert("numerator", self.numerator.to_node());
        node.insert("denominator", self.denominator.to_node());
        node.insert("type", self.type_.to_node());
        node.into()
    }
}

impl ToNode for DvOrdinal {
    fn to_node(&self) -> Node {
        let mut node = DataValueNode::new("DV_ORDINAL");
        node.insert("value", self.value.to_node());
        node.insert("symbol", self.symbol.to_node());
        node.into()
    }
}

fn interval_node<T: ToNode>(type_name: &str, interval: &Interval<T>) -> Node {
    let mut node = DataValueNode::new(type_name);
    node.insert_opt("lower", interval.lower.as_ref().map(ToNode::to_node));
    node.insert_opt("upper", interval.upper.as_ref().map(ToNode::to_node));
    node.insert("lower_unbounded", interval.lower_unbounded.to_node());
    node.insert("upper_unbounded", interval.upper_unbounded.to_node());
    node.insert("lower_included", interval.lower_included.to_node());
    node.insert("upper_included", interval.upper_included.to_node());
    node.into()
}

// ============================================
// Locatables
// ============================================

/// Object node carrying the locatable header of `root`; callers add the
/// type-specific attributes.
fn locatable_node(root: &impl Root, kind: ObjectKind) -> ObjectNode {
    let locatable: &Locatable = root.locatable();
    let mut node = ObjectNode::with_kind(kind, root.rm_type())
        .with_id(&locatable.archetype_node_id)
        .with_name(&locatable.name.value);
    node.insert("name", locatable.name.to_node());
    node.insert("archetype_node_id", locatable.archetype_node_id.to_node());
    node.insert_opt("uid", locatable.uid.as_ref().map(ToNode::to_node));
    node.insert_opt(
        "archetype_details",
        locatable.archetype_details.as_ref().map(ToNode::to_node),
    );
    node
}

impl ToNode for Archetyped {
    fn to_node(&self) -> Node {
        let mut node = ObjectNode::new("ARCHETYPED");
        node.insert("archetype_id", self.archetype_id.to_node());
        node.insert_opt("template_id", self.template_id.as_ref().map(ToNode::to_node));
        node.insert("rm_version", self.rm_version.to_node());
        node.into()
    }
}

impl ToNode for Ehr {
    fn to_node(&self) -> Node {
        let mut node = ObjectNode::with_kind(ObjectKind::Ehr, "EHR");
        node.insert("system_id", self.system_id.to_node());
        node.insert("ehr_id", self.ehr_id.to_node());
        node.insert_opt("ehr_access", self.ehr_access.as_ref().map(ToNode::to_node));
        node.insert_opt("ehr_status", self.ehr_status.as_ref().map(ToNode::to_node));
        node.insert("time_created", self.time_created.to_node());
        node.insert("compositions", self.compositions.to_node());
        node.insert("contributions", self.contributions.to_node());
        node.into()
    }
}

impl ToNode for EhrStatus {
    fn to_node(&self) -> Node {
        let mut node = locatable_node(self, ObjectKind::Plain);
        node.insert("subject", self.subject.to_node());
        node.insert("is_queryable", self.is_queryable.to_node());
        node.insert("is_modifiable", self.is_modifiable.to_node());
        node.insert_opt(
            "other_details",
            self.other_details.as_ref().map(ToNode::to_node),
        );
        node.into()
    }
}

impl ToNode for Composition {
    fn to_node(&self) -> Node {
        let mut node = locatable_node(self, ObjectKind::Composition);
        node.insert("language", self.language.to_node());
        node.insert("territory", self.territory.to_node());
        node.insert("category", self.category.to_node());
        node.insert("composer", self.composer.to_node());
        node.insert_opt("context", self.context.as_ref().map(ToNode::to_node));
        node.insert("content", self.content.to_node());
        node.into()
    }
}

impl ToNode for EventContext {
    fn to_node(&self) -> Node {
        let mut node = ObjectNode::with_kind(ObjectKind::EventContext, "EVENT_CONTEXT");
        node.insert("start_time", self.start_time.to_node());
        node.insert_opt("end_time", self.end_time.as_ref().map(ToNode::to_node));
        node.insert_opt("location", self.location.as_ref().map(ToNode::to_node));
        node.insert("setting", self.setting.to_node());
        node.insert_opt(
            "health_care_facility",
            self.health_care_facility.as_ref().map(ToNode::to_node),
        );
        node.insert_opt(
            "other_context",
            self.other_context.as_ref().map(ToNode::to_node),
        );
        node.into()
    }
}

impl ToNode for ContentItem {
    fn to_node(&self) -> Node {
        match self {
            ContentItem::Section(s) => s.to_node(),
            ContentItem::Observation(o) => o.to_node(),
            ContentItem::Evaluation(e) => e.to_node(),
            ContentItem::AdminEntry(a) => a.to_node(),
        }
    }
}

impl ToNode for Section {
    fn to_node(&self) -> Node {
        let mut node = locatable_node(self, ObjectKind::Plain);
        node.insert("items", self.items.to_node());
        node.into()
    }
}

/// Attributes shared by care and admin entries.
fn entry_node(
    root: &impl Root,
    language: &CodePhrase,
    encoding: &CodePhrase,
    subject: &PartyProxy,
) -> ObjectNode {
    let mut node = locatable_node(root, ObjectKind::Plain);
    node.insert("language", language.to_node());
    node.insert("encoding", encoding.to_node());
    node.insert("subject", subject.to_node());
    node
}

impl ToNode for Observation {
    fn to_node(&self) -> Node {
        let mut node = entry_node(self, &self.language, &self.encoding, &self.subject);
        node.insert("data", self.data.to_node());
        node.insert_opt("protocol", self.protocol.as_ref().map(ToNode::to_node));
        node.into()
    }
}

impl ToNode for Evaluation {
    fn to_node(&self) -> Node {
        let mut node = entry_node(self, &self.language, &self.encoding, &self.subject);
        node.insert("data", self.data.to_node());
        node.insert_opt("protocol", self.protocol.as_ref().map(ToNode::to_node));
        node.into()
    }
}

impl ToNode for AdminEntry {
    fn to_node(&self) -> Node {
        let mut node = entry_node(self, &self.language, &self.encoding, &self.subject);
        node.insert("data", self.data.to_node());
        node.into()
    }
}

impl ToNode for History {
    fn to_node(&self) -> Node {
        let mut node = locatable_node(self, ObjectKind::Plain);
        node.insert("origin", self.origin.to_node());
        node.insert("events", self.events.to_node());
        node.into()
    }
}

impl ToNode for Event {
    fn to_node(&self) -> Node {
        let mut node = locatable_node(self, ObjectKind::Plain);
        node.insert("time", self.time.to_node());
        node.insert("data", self.data.to_node());
        node.insert_opt("state", self.state.as_ref().map(ToNode::to_node));
        node.into()
    }
}

impl ToNode for ItemStructure {
    fn to_node(&self) -> Node {
        match self {
            ItemStructure::Tree(t) => t.to_node(),
            ItemStructure::List(l) => l.to_node(),
            ItemStructure::Single(s) => s.to_node(),
        }
    }
}

impl ToNode for ItemTree {
    fn to_node(&self) -> Node {
        let mut node = locatable_node(self, ObjectKind::Plain);
        node.insert("items", self.items.to_node());
        node.into()
    }
}

impl ToNode for ItemList {
    fn to_node(&self) -> Node {
        let mut node = locatable_node(self, ObjectKind::Plain);
        node.insert("items", self.items.to_node());
        node.into()
    }
}

impl ToNode for ItemSingle {
    fn to_node(&self) -> Node {
        let mut node = locatable_node(self, ObjectKind::Plain);
        node.insert("item", self.item.to_node());
        node.into()
    }
}

impl ToNode for Item {
    fn to_node(&self) -> Node {
        match self {
            Item::Cluster(c) => c.to_node(),
            Item::Element(e) => e.to_node(),
        }
    }
}

impl ToNode for Cluster {
    fn to_node(&self) -> Node {
        let mut node = locatable_node(self, ObjectKind::Plain);
        node.insert("items", self.items.to_node());
        node.into()
    }
}

impl ToNode for Element {
    fn to_node(&self) -> Node {
        let mut node = locatable_node(self, ObjectKind::Plain);
        node.insert_opt("value", self.value.as_ref().map(ToNode::to_node));
        node.insert_opt(
            "null_flavour",
            self.null_flavour.as_ref().map(ToNode::to_node),
        );
        node.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;

    #[test]
    fn identifiers_become_typed_value_nodes() {
        let node = ObjectVersionId::new("1::sys::1").to_node();
        assert_eq!(node.kind(), NodeKind::Value);
        assert_eq!(node.type_name(), "OBJECT_VERSION_ID");
        assert_eq!(node.as_value(), Some(&Value::string("1::sys::1")));
    }

    #[test]
    fn code_phrase_always_has_preferred_term() {
        let node = CodePhrase::new("openehr", "433").to_node();
        assert_eq!(node.kind(), NodeKind::Object);
        let term = node.child("preferred_term").unwrap();
        assert_eq!(term.as_value(), Some(&Value::Null));
        let terminology = node.child("terminology_id").unwrap();
        assert_eq!(terminology.type_name(), "TERMINOLOGY_ID");
    }

    #[test]
    fn untyped_json_is_wrapped_verbatim() {
        let json = serde_json::json!({ "a": [1, 2] });
        let node = json.to_node();
        assert_eq!(node.as_value(), Some(&Value::Json(json)));
    }
}
