//! Generic document tree
//!
//! Typed documents are converted once into a tree of [`Node`]s (see [`builder`]) that the
//! path evaluator can navigate by attribute name and archetype code, without knowing the
//! concrete reference model type of each node.
//!
//! ```text
//! Composition (object)
//!  ├─ name ──────────── DV_TEXT (data value) ── value (value)
//!  ├─ archetype_node_id (value)
//!  └─ content ───────── slice
//!      └─ [openEHR-EHR-OBSERVATION.pulse.v2] (object)
//!          └─ data [at0002] (object) ── events (slice) ── ...
//! ```
//!
//! Trees are immutable once built; children are shared through `Arc` so a traversal can
//! hold on to any node without borrowing from its parent.

pub mod builder;

pub use builder::ToNode;

use crate::value::Value;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::sync::Arc;

/// Named children of object and data value nodes, in insertion order
pub type Attributes = IndexMap<String, Arc<Node>>;

/// Node-kind discriminator, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Object,
    Ehr,
    Composition,
    EventContext,
    Slice,
    DataValue,
    Value,
}

impl NodeKind {
    /// Kinds represented by [`ObjectNode`]
    pub fn is_object(self) -> bool {
        matches!(
            self,
            NodeKind::Object | NodeKind::Ehr | NodeKind::Composition | NodeKind::EventContext
        )
    }
}

/// The object-like subset of [`NodeKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Plain,
    Ehr,
    Composition,
    EventContext,
}

impl From<ObjectKind> for NodeKind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Plain => NodeKind::Object,
            ObjectKind::Ehr => NodeKind::Ehr,
            ObjectKind::Composition => NodeKind::Composition,
            ObjectKind::EventContext => NodeKind::EventContext,
        }
    }
}

/// Attributes every node carries
#[derive(Debug, Clone, PartialEq)]
pub struct NodeHeader {
    /// Archetype node id, or the key the node is found under in a slice
    pub id: Option<String>,
    /// Reference model type name, e.g. `OBSERVATION` or `DV_QUANTITY`
    pub type_name: String,
    /// Display name
    pub name: Option<String>,
    kind: NodeKind,
}

impl NodeHeader {
    fn new(kind: NodeKind, type_name: impl Into<String>) -> Self {
        Self {
            id: None,
            type_name: type_name.into(),
            name: None,
            kind,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }
}

/// A node of the generic tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Object(ObjectNode),
    Slice(SliceNode),
    DataValue(DataValueNode),
    Value(ValueNode),
}

impl Node {
    pub fn header(&self) -> &NodeHeader {
        match self {
            Node::Object(node) => &node.header,
            Node::Slice(node) => &node.header,
            Node::DataValue(node) => &node.header,
            Node::Value(node) => &node.header,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.header().kind
    }

    pub fn id(&self) -> Option<&str> {
        self.header().id.as_deref()
    }

    pub fn type_name(&self) -> &str {
        &self.header().type_name
    }

    pub fn name(&self) -> Option<&str> {
        self.header().name.as_deref()
    }

    /// Look up a child by key.
    ///
    /// Objects and data values are keyed by attribute name, slices by element id. Objects
    /// and data values also answer `id` with their identifier. Value nodes have no children.
    pub fn child(&self, key: &str) -> Option<Arc<Node>> {
        match self {
            Node::Object(node) => node.child(key),
            Node::Slice(node) => node.child(key),
            Node::DataValue(node) => node.child(key),
            Node::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(node) => Some(&node.value),
            _ => None,
        }
    }
}

fn id_child(header: &NodeHeader, key: &str) -> Option<Arc<Node>> {
    match (key, &header.id) {
        ("id", Some(id)) => Some(Arc::new(Node::Value(ValueNode::new(Value::string(id))))),
        _ => None,
    }
}

/// Structured object with ordered named attributes
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub header: NodeHeader,
    pub attributes: Attributes,
}

impl ObjectNode {
    /// Plain object node of the given reference model type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self::with_kind(ObjectKind::Plain, type_name)
    }

    /// Object node with a specialised kind (EHR, Composition, ...).
    pub fn with_kind(kind: ObjectKind, type_name: impl Into<String>) -> Self {
        Self {
            header: NodeHeader::new(kind.into(), type_name),
            attributes: Attributes::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.header.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.header.name = Some(name.into());
        self
    }

    /// Add an attribute; a repeated key replaces the earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) {
        self.attributes.insert(key.into(), Arc::new(node));
    }

    pub fn insert_opt(&mut self, key: impl Into<String>, node: Option<Node>) {
        if let Some(node) = node {
            self.insert(key, node);
        }
    }

    pub fn child(&self, key: &str) -> Option<Arc<Node>> {
        id_child(&self.header, key).or_else(|| self.attributes.get(key).cloned())
    }
}

/// Indexed collection whose elements are found by their identifier
#[derive(Debug, Clone, PartialEq)]
pub struct SliceNode {
    pub header: NodeHeader,
    pub items: Vec<Arc<Node>>,
}

impl SliceNode {
    pub fn new() -> Self {
        Self {
            header: NodeHeader::new(NodeKind::Slice, "LIST"),
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, node: Node) {
        self.items.push(Arc::new(node));
    }

    /// Element whose identifier equals `key`; with repeated identifiers the last one wins.
    pub fn child(&self, key: &str) -> Option<Arc<Node>> {
        self.items
            .iter()
            .rev()
            .find(|item| item.id() == Some(key))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for SliceNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Typed value container (coded text, quantity, ...) with named sub-values
#[derive(Debug, Clone, PartialEq)]
pub struct DataValueNode {
    pub header: NodeHeader,
    pub values: Attributes,
}

impl DataValueNode {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            header: NodeHeader::new(NodeKind::DataValue, type_name),
            values: Attributes::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, node: Node) {
        self.values.insert(key.into(), Arc::new(node));
    }

    pub fn insert_opt(&mut self, key: impl Into<String>, node: Option<Node>) {
        if let Some(node) = node {
            self.insert(key, node);
        }
    }

    pub fn child(&self, key: &str) -> Option<Arc<Node>> {
        id_child(&self.header, key).or_else(|| self.values.get(key).cloned())
    }
}

/// Terminal scalar
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    pub header: NodeHeader,
    pub value: Value,
}

impl ValueNode {
    pub fn new(value: impl Into<Value>) -> Self {
        Self::typed("", value)
    }

    /// Value node tagged with a type name, e.g. the kind of identifier it holds.
    pub fn typed(type_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            header: NodeHeader::new(NodeKind::Value, type_name),
            value: value.into(),
        }
    }
}

impl From<ObjectNode> for Node {
    fn from(node: ObjectNode) -> Self {
        Node::Object(node)
    }
}

impl From<SliceNode> for Node {
    fn from(node: SliceNode) -> Self {
        Node::Slice(node)
    }
}

impl From<DataValueNode> for Node {
    fn from(node: DataValueNode) -> Self {
        Node::DataValue(node)
    }
}

impl From<ValueNode> for Node {
    fn from(node: ValueNode) -> Self {
        Node::Value(node)
    }
}

// Objects serialize as `{id, name, type, ...attributes}` in attribute order, slices as
// arrays, data values as `{type, values}` and value nodes as their bare value. An attribute
// takes the key over a header entry of the same name.
impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Object(node) => {
                let mut map = serializer.serialize_map(None)?;
                let header = [
                    ("id", node.header.id.as_deref()),
                    ("name", node.header.name.as_deref()),
                    ("type", Some(node.header.type_name.as_str())),
                ];
                for (key, value) in header {
                    if let Some(value) = value {
                        if !node.attributes.contains_key(key) {
                            map.serialize_entry(key, value)?;
                        }
                    }
                }
                for (key, child) in &node.attributes {
                    map.serialize_entry(key, child.as_ref())?;
                }
                map.end()
            }
            Node::Slice(node) => {
                let mut seq = serializer.serialize_seq(Some(node.items.len()))?;
                for item in &node.items {
                    seq.serialize_element(item.as_ref())?;
                }
                seq.end()
            }
            Node::DataValue(node) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", &node.header.type_name)?;
                map.serialize_entry("values", &AttributesRef(&node.values))?;
                map.end()
            }
            Node::Value(node) => node.value.serialize(serializer),
        }
    }
}

struct AttributesRef<'a>(&'a Attributes);

impl Serialize for AttributesRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, child) in self.0 {
            map.serialize_entry(key, child.as_ref())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_answers_id_before_attributes() {
        let mut node = ObjectNode::new("ELEMENT").with_id("at0004");
        node.insert("value", ValueNode::new(1i64).into());

        let id = node.child("id").expect("id child");
        assert_eq!(id.as_value(), Some(&Value::string("at0004")));
        assert!(node.child("missing").is_none());
    }

    #[test]
    fn slice_keeps_last_of_repeated_identifier() {
        let mut slice = SliceNode::new();
        slice.push(ObjectNode::new("ELEMENT").with_id("at0004").with_name("first").into());
        slice.push(ObjectNode::new("ELEMENT").with_id("at0004").with_name("second").into());

        let found = slice.child("at0004").unwrap();
        assert_eq!(found.name(), Some("second"));
        assert!(slice.child("id").is_none());
    }

    #[test]
    fn object_serializes_attributes_in_insertion_order() {
        let mut node = ObjectNode::new("CODE_PHRASE");
        node.insert("terminology_id", ValueNode::new("openehr").into());
        node.insert("code_string", ValueNode::new("433").into());

        let json = serde_json::to_string(&Node::from(node)).unwrap();
        assert_eq!(
            json,
            r#"{"type":"CODE_PHRASE","terminology_id":"openehr","code_string":"433"}"#
        );
    }

    #[test]
    fn attribute_takes_key_over_header() {
        let mut name = DataValueNode::new("DV_TEXT");
        name.insert("value", ValueNode::new("Vital signs").into());
        let mut node = ObjectNode::new("COMPOSITION")
            .with_id("openEHR-EHR-COMPOSITION.encounter.v1")
            .with_name("Vital signs");
        node.insert("name", name.into());

        let json = serde_json::to_string(&Node::from(node)).unwrap();
        assert_eq!(
            json,
            r#"{"id":"openEHR-EHR-COMPOSITION.encounter.v1","type":"COMPOSITION","name":{"type":"DV_TEXT","values":{"value":"Vital signs"}}}"#
        );
    }
}
