//! EHR and EHR status

use super::composition::{ItemStructure, PartyProxy};
use super::data_values::DvDateTime;
use super::ids::{HierObjectId, ObjectRef};
use super::locatable::{impl_root, Locatable};
use serde::{Deserialize, Serialize};

/// Root object of one patient's health record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ehr {
    /// System the EHR was created in
    pub system_id: HierObjectId,

    pub ehr_id: HierObjectId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ehr_access: Option<ObjectRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ehr_status: Option<ObjectRef>,

    pub time_created: DvDateTime,

    #[serde(default)]
    pub compositions: Vec<ObjectRef>,

    #[serde(default)]
    pub contributions: Vec<ObjectRef>,
}

impl Ehr {
    pub fn new(
        system_id: impl Into<String>,
        ehr_id: impl Into<String>,
        time_created: impl Into<String>,
    ) -> Self {
        Self {
            system_id: HierObjectId::new(system_id),
            ehr_id: HierObjectId::new(ehr_id),
            ehr_access: None,
            ehr_status: None,
            time_created: DvDateTime::new(time_created),
            compositions: Vec::new(),
            contributions: Vec::new(),
        }
    }
}

/// Status and control information of an EHR
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EhrStatus {
    #[serde(flatten)]
    pub locatable: Locatable,

    pub subject: PartyProxy,

    pub is_queryable: bool,

    pub is_modifiable: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_details: Option<ItemStructure>,
}

impl_root! {
    EhrStatus => "EHR_STATUS",
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::locatable::Root;
    use serde_json::json;

    #[test]
    fn ehr_status_is_a_root() {
        let status: EhrStatus = serde_json::from_value(json!({
            "_type": "EHR_STATUS",
            "archetype_node_id": "openEHR-EHR-EHR_STATUS.generic.v1",
            "name": { "value": "EHR Status" },
            "subject": { "_type": "PARTY_SELF" },
            "is_queryable": true,
            "is_modifiable": true
        }))
        .unwrap();

        assert_eq!(status.rm_type(), "EHR_STATUS");
        assert_eq!(status.locatable().name.value, "EHR Status");
        assert!(status.other_details.is_none());
    }
}
