//! Checkpoint and restore for state machines.
//!
//! A checkpoint captures the runtime state of a machine: its current state
//! and transition history. Hooks and context data are not part of it; a
//! machine is restored by building it against its instruction set again and
//! applying the checkpoint.

use crate::core::{State, StateHistory};
use crate::instructions::state_label;
use crate::machine::StateMachine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<S: State> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Current state of the machine, `None` if it never transited
    pub state_current: Option<S>,

    /// Complete transition history
    pub history: StateHistory<S>,
}

impl<S: State> Checkpoint<S> {
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validate()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.validate()
    }

    fn validate(self) -> Result<Self, CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        if let Some(last) = self.history.last() {
            if self.state_current.as_ref() != Some(&last.to) {
                return Err(CheckpointError::ValidationFailed(format!(
                    "current state {} does not match last transition to {}",
                    state_label(self.state_current.as_ref()),
                    last.to.name()
                )));
            }
        }
        Ok(self)
    }
}

impl<S: State, C> StateMachine<S, C> {
    /// Snapshot the current state and history.
    pub fn checkpoint(&self) -> Checkpoint<S> {
        Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            state_current: self.state_current().cloned(),
            history: self.history().clone(),
        }
    }

    /// Replace the current state and history with those of `checkpoint`.
    ///
    /// No hook runs. Context data, instructions and the history limit are
    /// left as they are. Fails without touching the machine when the
    /// checkpoint's state disagrees with its own history.
    pub fn restore(&mut self, checkpoint: Checkpoint<S>) -> Result<(), CheckpointError> {
        let checkpoint = checkpoint.validate()?;
        tracing::debug!(
            id = %checkpoint.id,
            state = state_label(checkpoint.state_current.as_ref()),
            "restoring checkpoint"
        );
        self.reset(checkpoint.state_current, checkpoint.history);
        Ok(())
    }
}
