//! Schema error types.

use thiserror::Error;

/// Errors that can occur when exporting or importing a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Serialization to JSON failed
    #[error("Schema serialization failed: {0}")]
    Serialization(String),

    /// The document is not a valid schema
    #[error("Invalid schema document: {0}")]
    InvalidDocument(String),

    /// The state decoder did not recognise a state name
    #[error("Unknown state '{value}' in schema")]
    UnknownState { value: String },
}
