//! Crate-wide error type.

use crate::builder::BuildError;
use crate::checkpoint::CheckpointError;
use crate::core::TransitionError;
use crate::schema::SchemaError;
use thiserror::Error;

/// Any error produced by this crate.
///
/// Each operation returns its own narrow error type; this wrapper lets
/// callers chain them with `?`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn fails() -> Result<()> {
        Err(TransitionError::NotFound {
            name: "open".to_string(),
        })?;
        Ok(())
    }

    #[test]
    fn narrow_errors_convert_with_question_mark() {
        let err = fails().unwrap_err();

        assert!(matches!(err, Error::Transition(TransitionError::NotFound { .. })));
        assert_eq!(err.to_string(), "Transition not found: open");
    }

    #[test]
    fn checkpoint_errors_are_transparent() {
        let err = Error::from(CheckpointError::MissingContextCodec);

        assert_eq!(err.to_string(), CheckpointError::MissingContextCodec.to_string());
    }
}
