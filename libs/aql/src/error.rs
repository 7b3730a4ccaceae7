//! Error types for the AQL engine

use crate::resolver::ResolveError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Query execution errors
///
/// Finding no value for a path is not an error; it yields no rows.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A valid query shape the engine does not implement
    #[error("Not implemented: {0}")]
    Unsupported(String),

    #[error("Unexpected identifier '{identifier}' in SELECT expression #{index}")]
    UnknownIdentifier { identifier: String, index: usize },

    #[error("Cannot get data source by name '{class_name}': {source}")]
    SourceResolution {
        class_name: String,
        #[source]
        source: ResolveError,
    },

    #[error("Unexpected SELECT expression type at #{index}")]
    UnexpectedExpression { index: usize },

    #[error("Unknown query parameter: ${0}")]
    UnknownParameter(String),

    #[error("Duplicate data source binding: {0}")]
    DuplicateBinding(String),

    #[error("Query cancelled while {stage}")]
    Cancelled { stage: String },

    #[error("Query deadline exceeded while {stage}")]
    DeadlineExceeded { stage: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether the error reports an unimplemented query construct.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Error::Unsupported(_))
    }
}
