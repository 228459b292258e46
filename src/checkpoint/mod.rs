//! Checkpoint and resume functionality for state machines.
//!
//! A checkpoint captures the dynamic half of a machine: the current state and
//! the context. The context goes through the machine's [`ContextCodec`], so
//! the document is `{"state": "<name>", "context": "<codec output>"}`.
//! Transitions, guards and observers are not part of a checkpoint; restoring
//! requires a machine built with the same table.

use crate::core::State;
use crate::machine::StateMachine;
use serde::{Deserialize, Serialize};
use tracing::debug;

mod codec;
pub mod error;

pub use codec::{ContextCodec, JsonCodec};
pub use error::CheckpointError;

/// Serializable snapshot of a machine's state and context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Name of the current state
    pub state: String,

    /// Context as encoded by the machine's codec
    pub context: String,
}

impl<S: State, C> StateMachine<S, C> {
    /// Capture the current state and context.
    ///
    /// # Errors
    ///
    /// [`CheckpointError::MissingContextCodec`] if the machine has no codec,
    /// or whatever the codec reports.
    pub fn checkpoint(&self) -> Result<Checkpoint, CheckpointError> {
        let codec = self
            .codec
            .as_ref()
            .ok_or(CheckpointError::MissingContextCodec)?;

        Ok(Checkpoint {
            state: self.state.name().to_string(),
            context: codec.encode(&self.context)?,
        })
    }

    /// Serialize [`checkpoint`](Self::checkpoint) to JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        let checkpoint = self.checkpoint()?;
        serde_json::to_string(&checkpoint)
            .map_err(|e| CheckpointError::SerializationFailed(format!("{}", e)))
    }

    /// Replace state and context with the ones in `checkpoint`.
    ///
    /// `decode` turns the stored state name back into a state. The restored
    /// state is not checked against the transition table. Both values are
    /// decoded before either is assigned, so on error the machine is
    /// unchanged.
    pub fn restore<F>(&mut self, checkpoint: &Checkpoint, decode: F) -> Result<(), CheckpointError>
    where
        F: Fn(&str) -> Option<S>,
    {
        let codec = self
            .codec
            .as_ref()
            .ok_or(CheckpointError::MissingContextCodec)?;

        let state = decode(&checkpoint.state).ok_or_else(|| CheckpointError::UnknownState {
            value: checkpoint.state.clone(),
        })?;
        let context = codec.decode(&checkpoint.context)?;

        debug!(
            from = self.state.name(),
            to = state.name(),
            "Restoring machine from checkpoint"
        );
        self.state = state;
        self.context = context;
        Ok(())
    }

    /// Parse a JSON checkpoint and [`restore`](Self::restore) it.
    pub fn from_json<F>(&mut self, json: &str, decode: F) -> Result<(), CheckpointError>
    where
        F: Fn(&str) -> Option<S>,
    {
        let checkpoint: Checkpoint = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(format!("{}", e)))?;
        self.restore(&checkpoint, decode)
    }
}
