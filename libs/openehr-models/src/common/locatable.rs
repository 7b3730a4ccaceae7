//! Locatable header shared by every archetyped structure

use super::data_values::DvText;
use super::ids::{ArchetypeId, TemplateId, UidBasedId};
use serde::{Deserialize, Serialize};

/// Archetype and template a root structure was built from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Archetyped {
    pub archetype_id: ArchetypeId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<TemplateId>,

    pub rm_version: String,
}

/// Attributes every archetyped node carries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Locatable {
    /// Archetype id for archetype roots, `atNNNN` code for inner nodes
    pub archetype_node_id: String,

    /// Runtime name of the node
    pub name: DvText,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<UidBasedId>,

    /// Present on archetype roots only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype_details: Option<Archetyped>,
}

impl Locatable {
    pub fn new(archetype_node_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            archetype_node_id: archetype_node_id.into(),
            name: DvText::new(name),
            uid: None,
            archetype_details: None,
        }
    }

    pub fn is_archetype_root(&self) -> bool {
        self.archetype_details.is_some()
    }
}

/// A structure that carries a [`Locatable`] header.
pub trait Root {
    fn locatable(&self) -> &Locatable;

    /// openEHR type name, e.g. `OBSERVATION`
    fn rm_type(&self) -> &'static str;
}

macro_rules! impl_root {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl $crate::common::locatable::Root for $ty {
                fn locatable(&self) -> &$crate::common::locatable::Locatable {
                    &self.locatable
                }

                fn rm_type(&self) -> &'static str {
                    $name
                }
            }
        )*
    };
}

pub(crate) use impl_root;
