//! In-memory document index
//!
//! Holds typed documents grouped by EHR id and serves them to the executor as data sources.
//! Trees are built on every [`resolve`](DataSourceResolver::resolve) call so each query
//! execution gets its own.

use crate::resolver::{Container, DataSourceResolver, ResolveError};
use crate::tree::ToNode;
use indexmap::IndexMap;
use ipehr_models::common::{
    Composition, Document, Ehr, EhrStatus, Error, Identifier, Result, UidBasedId,
};

/// Documents of one EHR
#[derive(Debug, Clone, Default)]
pub struct EhrRecord {
    pub ehr: Option<Ehr>,
    pub status: Option<EhrStatus>,
    /// Latest version of each composition, keyed by versioned object id
    pub compositions: IndexMap<String, Composition>,
}

/// Documents keyed by EHR id, in insertion order
#[derive(Debug, Clone, Default)]
pub struct DocumentIndex {
    records: IndexMap<String, EhrRecord>,
    raw: IndexMap<String, IndexMap<String, Vec<serde_json::Value>>>,
}

impl DocumentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_ehr(&mut self, ehr: Ehr) {
        let ehr_id = ehr.ehr_id.value.clone();
        self.records.entry(ehr_id).or_default().ehr = Some(ehr);
    }

    pub fn add_ehr_status(&mut self, ehr_id: &str, status: EhrStatus) {
        self.record_mut(ehr_id).status = Some(status);
    }

    /// Store a composition under its EHR. A new version of a stored composition replaces it
    /// in place.
    pub fn add_composition(&mut self, ehr_id: &str, composition: Composition) -> Result<()> {
        let key = versioned_object_id(&composition)?;
        self.record_mut(ehr_id).compositions.insert(key, composition);
        Ok(())
    }

    /// Store any supported document; status and compositions need the owning EHR id.
    pub fn add_document(&mut self, ehr_id: Option<&str>, document: Document) -> Result<()> {
        match document {
            Document::Ehr(ehr) => {
                self.add_ehr(ehr);
                Ok(())
            }
            Document::EhrStatus(status) => {
                let ehr_id = ehr_id.ok_or_else(|| Error::MissingField("ehr_id".into()))?;
                self.add_ehr_status(ehr_id, status);
                Ok(())
            }
            Document::Composition(composition) => {
                let ehr_id = ehr_id.ok_or_else(|| Error::MissingField("ehr_id".into()))?;
                self.add_composition(ehr_id, composition)
            }
        }
    }

    /// Store a document of a class without a typed model; it is served as an unstructured
    /// value node.
    pub fn add_raw(&mut self, class_name: &str, key: &str, json: serde_json::Value) {
        self.raw
            .entry(class_name.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default()
            .push(json);
    }

    pub fn record(&self, ehr_id: &str) -> Option<&EhrRecord> {
        self.records.get(ehr_id)
    }

    /// Classes this index can serve
    pub fn class_names(&self) -> Vec<String> {
        let mut names = vec![
            "EHR".to_string(),
            "EHR_STATUS".to_string(),
            "COMPOSITION".to_string(),
        ];
        names.extend(self.raw.keys().cloned());
        names
    }

    fn record_mut(&mut self, ehr_id: &str) -> &mut EhrRecord {
        self.records.entry(ehr_id.to_string()).or_default()
    }
}

fn versioned_object_id(composition: &Composition) -> Result<String> {
    match &composition.locatable.uid {
        Some(UidBasedId::Version(version)) => Ok(version.parts()?.object_id.to_string()),
        Some(uid @ UidBasedId::Hier(_)) => Ok(uid.value().to_string()),
        None => Err(Error::MissingField("uid".into())),
    }
}

impl DataSourceResolver for DocumentIndex {
    fn resolve(&self, class_name: &str) -> std::result::Result<Container, ResolveError> {
        let mut container = Container::new();
        match class_name {
            "EHR" => {
                for (ehr_id, record) in &self.records {
                    if let Some(ehr) = &record.ehr {
                        container.push(ehr_id.as_str(), ehr.to_node());
                    }
                }
            }
            "EHR_STATUS" => {
                for (ehr_id, record) in &self.records {
                    if let Some(status) = &record.status {
                        container.push(ehr_id.as_str(), status.to_node());
                    }
                }
            }
            "COMPOSITION" => {
                for (ehr_id, record) in &self.records {
                    for composition in record.compositions.values() {
                        container.push(ehr_id.as_str(), composition.to_node());
                    }
                }
            }
            other => {
                let groups = self
                    .raw
                    .get(other)
                    .ok_or_else(|| ResolveError::NotFound(other.to_string()))?;
                for (key, documents) in groups {
                    for json in documents {
                        container.push(key.as_str(), json.to_node());
                    }
                }
            }
        }

        tracing::debug!(
            class_name,
            groups = container.groups().len(),
            nodes = container.len(),
            "resolved data source"
        );
        Ok(container)
    }
}
