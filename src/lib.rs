// artifact-lifecycle - persistence state machine for addressable artifacts
// This exposes the core components for testing and integration

pub mod persistence;
pub mod config;
pub mod telemetry;

// Re-export key types for easy access
pub use persistence::{
    available_actions, classify, classify_reference, ActionOptions, ActionSet, ArtifactUri,
    Locality, ObjectNode, PersistenceAction, PersistenceError, PersistenceManager,
    PersistenceServices, PersistenceSettings, PersistenceState, PersistenceView,
};
pub use persistence::traits::{
    AuthStatus, MutationService, NameSanitizer, NodeValueExecutor, ReferenceExtractor,
    RemoteLookup,
};
pub use config::LifecycleConfig;
pub use telemetry::{init_telemetry, generate_correlation_id, create_action_span};
