use thiserror::Error;

use super::types::{PersistenceAction, PersistenceState};
use super::uri::UriError;

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The reference uses a grammar the classifier does not understand
    #[error("Unrecognized artifact reference: {source}")]
    UnrecognizedReference {
        #[from]
        source: UriError,
    },

    #[error("Invalid action: {action} is not offered in state {state}")]
    InvalidAction {
        action: PersistenceAction,
        state: PersistenceState,
    },

    #[error("Failed to save: the executor returned no reference")]
    SaveFailed,

    #[error("{operation} failed: {source}")]
    OperationFailed {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("Action {action} requires a local artifact reference")]
    NotLocalReference { action: PersistenceAction },

    #[error("Action {action} requires a name")]
    MissingName { action: PersistenceAction },

    #[error("Not implemented yet: {action}")]
    NotImplemented { action: PersistenceAction },

    #[error("Another persistence action is already in progress")]
    ActionInProgress,
}

impl PersistenceError {
    pub(crate) fn operation(operation: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| PersistenceError::OperationFailed { operation, source }
    }
}
