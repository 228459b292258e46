//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckpointError {
    /// No context codec was configured on the machine
    #[error("Context codec is not set")]
    MissingContextCodec,

    /// Serialization to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// The state decoder did not recognise a state name
    #[error("Unknown state '{value}'")]
    UnknownState { value: String },
}
