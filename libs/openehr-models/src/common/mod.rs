//! openEHR reference model
//!
//! Types shared by EHR and Composition documents

pub mod composition;
pub mod data_values;
pub mod document;
pub mod ehr;
pub mod error;
pub mod ids;
pub mod interval;
pub mod locatable;

// Re-export commonly used types
pub use composition::*;
pub use data_values::*;
pub use document::*;
pub use ehr::*;
pub use error::{Error, Result};
pub use ids::*;
pub use interval::*;
pub use locatable::*;
