//! openEHR identifier types
//!
//! Every identifier is a string `value` wrapped in a type that tells how the string is
//! structured. Polymorphic positions (`OBJECT_ID`, `UID_BASED_ID`) are enums discriminated
//! by `_type`.

use super::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Common read access to the identifier string and its openEHR type name.
pub trait Identifier {
    /// openEHR type name, e.g. `HIER_OBJECT_ID`
    fn id_type(&self) -> &'static str;

    /// The identifier string
    fn value(&self) -> &str;
}

macro_rules! simple_id {
    ($(#[$doc:meta])* $name:ident, $type_name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
        pub struct $name {
            pub value: String,
        }

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self {
                    value: value.into(),
                }
            }
        }

        impl Identifier for $name {
            fn id_type(&self) -> &'static str {
                $type_name
            }

            fn value(&self) -> &str {
                &self.value
            }
        }
    };
}

simple_id!(
    /// Hierarchical identifier (UUID, ISO OID or internet id, optionally with an extension)
    HierObjectId,
    "HIER_OBJECT_ID"
);

simple_id!(
    /// Globally unique identifier of one version of a versioned object:
    /// `object_id::creating_system_id::version_tree_id`
    ObjectVersionId,
    "OBJECT_VERSION_ID"
);

simple_id!(
    /// Identifier of a terminology, e.g. `SNOMED-CT` or `openehr`
    TerminologyId,
    "TERMINOLOGY_ID"
);

simple_id!(
    /// Multi-axial archetype identifier, e.g. `openEHR-EHR-OBSERVATION.blood_pressure.v2`
    ArchetypeId,
    "ARCHETYPE_ID"
);

simple_id!(
    /// Identifier of an operational template
    TemplateId,
    "TEMPLATE_ID"
);

/// Identifier in a locally defined scheme
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GenericId {
    pub value: String,
    pub scheme: String,
}

impl Identifier for GenericId {
    fn id_type(&self) -> &'static str {
        "GENERIC_ID"
    }

    fn value(&self) -> &str {
        &self.value
    }
}

/// The three parts of an [`ObjectVersionId`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionParts<'a> {
    pub object_id: &'a str,
    pub creating_system_id: &'a str,
    pub version_tree_id: &'a str,
}

impl ObjectVersionId {
    /// Split the identifier into its `::`-separated parts.
    pub fn parts(&self) -> Result<VersionParts<'_>> {
        let mut parts = self.value.splitn(3, "::");
        match (parts.next(), parts.next(), parts.next()) {
            (Some(object_id), Some(system), Some(version))
                if !object_id.is_empty() && !system.is_empty() && !version.is_empty() =>
            {
                Ok(VersionParts {
                    object_id,
                    creating_system_id: system,
                    version_tree_id: version,
                })
            }
            _ => Err(Error::InvalidIdentifier(format!(
                "OBJECT_VERSION_ID '{}' is not of the form object_id::system::version",
                self.value
            ))),
        }
    }
}

/// `UID_BASED_ID`: the `uid` attribute of locatables
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "_type")]
pub enum UidBasedId {
    #[serde(rename = "HIER_OBJECT_ID")]
    Hier(HierObjectId),
    #[serde(rename = "OBJECT_VERSION_ID")]
    Version(ObjectVersionId),
}

impl Identifier for UidBasedId {
    fn id_type(&self) -> &'static str {
        match self {
            UidBasedId::Hier(id) => id.id_type(),
            UidBasedId::Version(id) => id.id_type(),
        }
    }

    fn value(&self) -> &str {
        match self {
            UidBasedId::Hier(id) => id.value(),
            UidBasedId::Version(id) => id.value(),
        }
    }
}

/// `OBJECT_ID`: any identifier, used by references
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "_type")]
pub enum ObjectId {
    #[serde(rename = "HIER_OBJECT_ID")]
    Hier(HierObjectId),
    #[serde(rename = "OBJECT_VERSION_ID")]
    Version(ObjectVersionId),
    #[serde(rename = "TERMINOLOGY_ID")]
    Terminology(TerminologyId),
    #[serde(rename = "ARCHETYPE_ID")]
    Archetype(ArchetypeId),
    #[serde(rename = "TEMPLATE_ID")]
    Template(TemplateId),
    #[serde(rename = "GENERIC_ID")]
    Generic(GenericId),
}

impl Identifier for ObjectId {
    fn id_type(&self) -> &'static str {
        match self {
            ObjectId::Hier(id) => id.id_type(),
            ObjectId::Version(id) => id.id_type(),
            ObjectId::Terminology(id) => id.id_type(),
            ObjectId::Archetype(id) => id.id_type(),
            ObjectId::Template(id) => id.id_type(),
            ObjectId::Generic(id) => id.id_type(),
        }
    }

    fn value(&self) -> &str {
        match self {
            ObjectId::Hier(id) => id.value(),
            ObjectId::Version(id) => id.value(),
            ObjectId::Terminology(id) => id.value(),
            ObjectId::Archetype(id) => id.value(),
            ObjectId::Template(id) => id.value(),
            ObjectId::Generic(id) => id.value(),
        }
    }
}

/// Reference to an object held in another service or in the same EHR
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectRef {
    /// Namespace the object belongs to, e.g. `local` or `demographic`
    pub namespace: String,

    /// openEHR type of the referenced object, e.g. `EHR_STATUS`
    #[serde(rename = "type")]
    pub type_: String,

    pub id: ObjectId,
}

/// Reference to a party in a demographic service
pub type PartyRef = ObjectRef;
