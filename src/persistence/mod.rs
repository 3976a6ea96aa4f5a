// Artifact Persistence Module - Lifecycle State Machine
//
// Classifies an artifact reference into one of eight lifecycle states,
// offers the legal actions for that state and performs them through
// injected collaborators.

pub mod types;
pub mod uri;
pub mod errors;
pub mod traits;
pub mod classifier;
pub mod actions;
pub mod sanitizer;
pub mod executor;

#[cfg(test)]
pub mod mocks;


pub use types::{
    ActionOptions, ActionSet, ActionSlot, DeleteAction, Locality, Mutation, ObjectNode,
    PersistenceAction, PersistenceState, PersistenceView, RenameAction, SaveRequest, StoreAction,
    TrackingForm,
};
pub use uri::{ArtifactUri, UriError};
pub use errors::PersistenceError;
pub use classifier::{classify, classify_reference};
pub use actions::{actions_for, available_actions};
pub use sanitizer::ArtifactSafeNames;
pub use executor::{PersistenceManager, PersistenceServices, PersistenceSettings};
