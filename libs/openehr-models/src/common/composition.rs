//! Composition and its content
//!
//! A Composition is the unit of commit in an EHR. Its content is a tree of archetyped
//! entries whose leaves are [`Element`]s carrying [`DataValue`]s.

use super::data_values::{CodePhrase, DataValue, DvCodedText, DvDateTime};
use super::ids::PartyRef;
use super::locatable::{impl_root, Locatable, Root};
use serde::{Deserialize, Serialize};

/// openEHR Composition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Composition {
    #[serde(flatten)]
    pub locatable: Locatable,

    /// Language the composition was written in
    pub language: CodePhrase,

    /// Territory the composition was written in
    pub territory: CodePhrase,

    /// `event` or `persistent`
    pub category: DvCodedText,

    /// Author of the content
    pub composer: PartyProxy,

    /// Clinical session context; absent for persistent compositions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<EventContext>,

    #[serde(default)]
    pub content: Vec<ContentItem>,
}

/// Context of the clinical session a Composition was recorded in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventContext {
    pub start_time: DvDateTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DvDateTime>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Care setting, coded in the openEHR `setting` group
    pub setting: DvCodedText,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_care_facility: Option<PartyProxy>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_context: Option<ItemStructure>,
}

/// The subject or author of a record, either the EHR owner or an identified party
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "_type")]
pub enum PartyProxy {
    #[serde(rename = "PARTY_SELF")]
    PartySelf {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        external_ref: Option<PartyRef>,
    },
    #[serde(rename = "PARTY_IDENTIFIED")]
    PartyIdentified {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        external_ref: Option<PartyRef>,
    },
}

impl PartyProxy {
    pub fn type_name(&self) -> &'static str {
        match self {
            PartyProxy::PartySelf { .. } => "PARTY_SELF",
            PartyProxy::PartyIdentified { .. } => "PARTY_IDENTIFIED",
        }
    }

    pub fn external_ref(&self) -> Option<&PartyRef> {
        match self {
            PartyProxy::PartySelf { external_ref } => external_ref.as_ref(),
            PartyProxy::PartyIdentified { external_ref, .. } => external_ref.as_ref(),
        }
    }
}

/// Top-level content of a Composition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "_type")]
pub enum ContentItem {
    #[serde(rename = "SECTION")]
    Section(Section),
    #[serde(rename = "OBSERVATION")]
    Observation(Observation),
    #[serde(rename = "EVALUATION")]
    Evaluation(Evaluation),
    #[serde(rename = "ADMIN_ENTRY")]
    AdminEntry(AdminEntry),
}

/// Navigational grouping of content items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Section {
    #[serde(flatten)]
    pub locatable: Locatable,

    #[serde(default)]
    pub items: Vec<ContentItem>,
}

/// Observed or measured phenomena over time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    #[serde(flatten)]
    pub locatable: Locatable,

    pub language: CodePhrase,

    pub encoding: CodePhrase,

    pub subject: PartyProxy,

    pub data: History,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<ItemStructure>,
}

/// Clinical assessment, opinion or summary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluation {
    #[serde(flatten)]
    pub locatable: Locatable,

    pub language: CodePhrase,

    pub encoding: CodePhrase,

    pub subject: PartyProxy,

    pub data: ItemStructure,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<ItemStructure>,
}

/// Administrative information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminEntry {
    #[serde(flatten)]
    pub locatable: Locatable,

    pub language: CodePhrase,

    pub encoding: CodePhrase,

    pub subject: PartyProxy,

    pub data: ItemStructure,
}

/// Time series of events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct History {
    #[serde(flatten)]
    pub locatable: Locatable,

    pub origin: DvDateTime,

    #[serde(default)]
    pub events: Vec<Event>,
}

/// Single sample in a [`History`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    #[serde(flatten)]
    pub locatable: Locatable,

    pub time: DvDateTime,

    pub data: ItemStructure,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ItemStructure>,
}

/// Data structure holding the items of an entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "_type")]
pub enum ItemStructure {
    #[serde(rename = "ITEM_TREE")]
    Tree(ItemTree),
    #[serde(rename = "ITEM_LIST")]
    List(ItemList),
    #[serde(rename = "ITEM_SINGLE")]
    Single(ItemSingle),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemTree {
    #[serde(flatten)]
    pub locatable: Locatable,

    #[serde(default)]
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemList {
    #[serde(flatten)]
    pub locatable: Locatable,

    #[serde(default)]
    pub items: Vec<Element>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemSingle {
    #[serde(flatten)]
    pub locatable: Locatable,

    pub item: Element,
}

/// Node of an item tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "_type")]
pub enum Item {
    #[serde(rename = "CLUSTER")]
    Cluster(Cluster),
    #[serde(rename = "ELEMENT")]
    Element(Element),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cluster {
    #[serde(flatten)]
    pub locatable: Locatable,

    #[serde(default)]
    pub items: Vec<Item>,
}

/// Leaf of an item tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    #[serde(flatten)]
    pub locatable: Locatable,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<DataValue>,

    /// Why `value` is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_flavour: Option<DvCodedText>,
}

impl_root! {
    Composition => "COMPOSITION",
    Section => "SECTION",
    Observation => "OBSERVATION",
    Evaluation => "EVALUATION",
    AdminEntry => "ADMIN_ENTRY",
    History => "HISTORY",
    Event => "EVENT",
    ItemTree => "ITEM_TREE",
    ItemList => "ITEM_LIST",
    ItemSingle => "ITEM_SINGLE",
    Cluster => "CLUSTER",
    Element => "ELEMENT",
}

impl Root for ContentItem {
    fn locatable(&self) -> &Locatable {
        match self {
            ContentItem::Section(s) => s.locatable(),
            ContentItem::Observation(o) => o.locatable(),
            ContentItem::Evaluation(e) => e.locatable(),
            ContentItem::AdminEntry(a) => a.locatable(),
        }
    }

    fn rm_type(&self) -> &'static str {
        match self {
            ContentItem::Section(s) => s.rm_type(),
            ContentItem::Observation(o) => o.rm_type(),
            ContentItem::Evaluation(e) => e.rm_type(),
            ContentItem::AdminEntry(a) => a.rm_type(),
        }
    }
}

impl Root for ItemStructure {
    fn locatable(&self) -> &Locatable {
        match self {
            ItemStructure::Tree(t) => t.locatable(),
            ItemStructure::List(l) => l.locatable(),
            ItemStructure::Single(s) => s.locatable(),
        }
    }

    fn rm_type(&self) -> &'static str {
        match self {
            ItemStructure::Tree(t) => t.rm_type(),
            ItemStructure::List(l) => l.rm_type(),
            ItemStructure::Single(s) => s.rm_type(),
        }
    }
}

impl Root for Item {
    fn locatable(&self) -> &Locatable {
        match self {
            Item::Cluster(c) => c.locatable(),
            Item::Element(e) => e.locatable(),
        }
    }

    fn rm_type(&self) -> &'static str {
        match self {
            Item::Cluster(c) => c.rm_type(),
            Item::Element(e) => e.rm_type(),
        }
    }
}
