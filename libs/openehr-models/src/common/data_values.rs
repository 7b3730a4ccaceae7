//! openEHR data values
//!
//! Leaf values carried by `ELEMENT.value` and by the typed attributes of entries
//! (times, categories, settings). All of them are collected in [`DataValue`], which is
//! discriminated by `_type` in canonical JSON.

use super::ids::TerminologyId;
use super::interval::Interval;
use serde::{Deserialize, Serialize};

/// A code from a terminology
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CodePhrase {
    pub terminology_id: TerminologyId,

    pub code_string: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_term: Option<String>,
}

impl CodePhrase {
    pub fn new(terminology: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            terminology_id: TerminologyId::new(terminology),
            code_string: code.into(),
            preferred_term: None,
        }
    }
}

/// Plain text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DvText {
    pub value: String,
}

impl DvText {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Text whose meaning is defined by a terminology code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DvCodedText {
    /// Rubric of the code
    pub value: String,

    pub defining_code: CodePhrase,
}

impl DvCodedText {
    pub fn new(value: impl Into<String>, defining_code: CodePhrase) -> Self {
        Self {
            value: value.into(),
            defining_code,
        }
    }
}

/// Measured quantity with UCUM units
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DvQuantity {
    pub magnitude: f64,

    pub units: String,

    /// Number of decimal places, `-1` for unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<i64>,

    /// Optional normal range for the measured value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_range: Option<Interval<f64>>,
}

/// Countable quantity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DvCount {
    pub magnitude: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DvBoolean {
    pub value: bool,
}

/// ISO 8601 date/time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DvDateTime {
    pub value: String,
}

impl DvDateTime {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// ISO 8601 date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DvDate {
    pub value: String,
}

/// Identifier issued by an external authority (passport, MRN, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DvIdentifier {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigner: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DvUri {
    pub value: String,
}

/// Ratio of two real values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DvProportion {
    pub numerator: f64,

    pub denominator: f64,

    /// Proportion kind: 0 ratio, 1 unitary, 2 percent, 3 fraction, 4 integer fraction
    #[serde(rename = "type")]
    pub type_: i64,
}

/// Ordinal value with a coded symbol, e.g. a score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DvOrdinal {
    pub value: i64,

    pub symbol: DvCodedText,
}

/// Interval of ordered data values
pub type DvInterval = Interval<Box<DataValue>>;

/// Any openEHR data value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "_type")]
pub enum DataValue {
    #[serde(rename = "DV_TEXT")]
    Text(DvText),
    #[serde(rename = "DV_CODED_TEXT")]
    CodedText(DvCodedText),
    #[serde(rename = "DV_QUANTITY")]
    Quantity(DvQuantity),
    #[serde(rename = "DV_COUNT")]
    Count(DvCount),
    #[serde(rename = "DV_BOOLEAN")]
    Boolean(DvBoolean),
    #[serde(rename = "DV_DATE_TIME")]
    DateTime(DvDateTime),
    #[serde(rename = "DV_DATE")]
    Date(DvDate),
    #[serde(rename = "DV_IDENTIFIER")]
    Identifier(DvIdentifier),
    #[serde(rename = "DV_URI")]
    Uri(DvUri),
    #[serde(rename = "DV_PROPORTION")]
    Proportion(DvProportion),
    #[serde(rename = "DV_ORDINAL")]
    Ordinal(DvOrdinal),
    #[serde(rename = "DV_INTERVAL")]
    Interval(DvInterval),
}

impl DataValue {
    /// openEHR type name of the value
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Text(_) => "DV_TEXT",
            DataValue::CodedText(_) => "DV_CODED_TEXT",
            DataValue::Quantity(_) => "DV_QUANTITY",
            DataValue::Count(_) => "DV_COUNT",
            DataValue::Boolean(_) => "DV_BOOLEAN",
            DataValue::DateTime(_) => "DV_DATE_TIME",
            DataValue::Date(_) => "DV_DATE",
            DataValue::Identifier(_) => "DV_IDENTIFIER",
            DataValue::Uri(_) => "DV_URI",
            DataValue::Proportion(_) => "DV_PROPORTION",
            DataValue::Ordinal(_) => "DV_ORDINAL",
            DataValue::Interval(_) => "DV_INTERVAL",
        }
    }
}
