//! Top-level documents stored by the gateway

use super::composition::Composition;
use super::ehr::{Ehr, EhrStatus};
use super::error::{Error, Result};
use serde_json::Value;
use std::str::FromStr;

/// A top-level document, dispatched on its `_type`
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Ehr(Ehr),
    EhrStatus(EhrStatus),
    Composition(Composition),
}

impl Document {
    /// Parse a canonical JSON document.
    pub fn from_json(value: Value) -> Result<Self> {
        let type_name = value
            .get("_type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MissingField("_type".to_string()))?
            .to_string();

        match type_name.as_str() {
            "EHR" => Ok(Document::Ehr(serde_json::from_value(value)?)),
            "EHR_STATUS" => Ok(Document::EhrStatus(serde_json::from_value(value)?)),
            "COMPOSITION" => Ok(Document::Composition(serde_json::from_value(value)?)),
            _ => Err(Error::UnsupportedType(type_name)),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Document::Ehr(_) => "EHR",
            Document::EhrStatus(_) => "EHR_STATUS",
            Document::Composition(_) => "COMPOSITION",
        }
    }

    pub fn as_ehr(&self) -> Option<&Ehr> {
        match self {
            Document::Ehr(ehr) => Some(ehr),
            _ => None,
        }
    }

    pub fn as_composition(&self) -> Option<&Composition> {
        match self {
            Document::Composition(composition) => Some(composition),
            _ => None,
        }
    }
}

impl FromStr for Document {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(Error::InvalidDocument(
                "top-level JSON value must be an object".to_string(),
            ));
        }
        Self::from_json(value)
    }
}
