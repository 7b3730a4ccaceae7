//! openEHR reference model types
//!
//! This crate provides strongly-typed Rust structures for the part of the openEHR
//! reference model the gateway stores: EHRs, EHR status and Compositions down to
//! elements and their data values.
//!
//! # Module Organization
//!
//! - `common`: identifiers, data values, locatable structures and the top-level documents
//!
//! # Design Philosophy
//!
//! - **Canonical JSON**: polymorphic attributes are discriminated by `_type`, attribute
//!   names are the snake_case openEHR names
//! - **Strongly-typed**: every value reachable from a document has one concrete Rust type
//! - **Lenient**: unknown attributes are ignored on input
//!
//! # Example
//!
//! ```rust
//! use ipehr_models::common::{Document, Ehr};
//! use serde_json::json;
//!
//! let ehr_json = json!({
//!     "_type": "EHR",
//!     "system_id": { "_type": "HIER_OBJECT_ID", "value": "gateway.example" },
//!     "ehr_id": { "_type": "HIER_OBJECT_ID", "value": "7d44b88c-4199-4bad-97dc-d78268e01398" },
//!     "time_created": { "_type": "DV_DATE_TIME", "value": "2024-03-01T10:00:00Z" }
//! });
//!
//! let doc = Document::from_json(ehr_json).unwrap();
//! let ehr: &Ehr = doc.as_ehr().unwrap();
//! assert_eq!(ehr.ehr_id.value, "7d44b88c-4199-4bad-97dc-d78268e01398");
//! ```

pub mod common;

// Re-export commonly used types
pub use common::*;
