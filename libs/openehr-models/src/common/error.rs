//! Error types for openEHR models

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid openEHR document: {0}")]
    InvalidDocument(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unsupported document type: {0}")]
    UnsupportedType(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
