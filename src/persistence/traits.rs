// Traits for dependency injection - every collaborator the state machine consults

use anyhow::Result;
use async_trait::async_trait;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use super::types::{Mutation, ObjectNode, SaveRequest};
use super::uri::ArtifactUri;

/// Derives a reference from an arbitrary computation description
pub trait ReferenceExtractor: Send + Sync {
    /// Reference named by the node, or `None` for an unsaved object
    fn reference_of(&self, node: &ObjectNode) -> Option<String>;
}

/// Looks up whether a reference was branched from a remote artifact
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait RemoteLookup: Send + Sync {
    fn has_remote_counterpart(&self, reference: &ArtifactUri) -> bool;
}

/// Signed-in status of the current user
pub trait AuthStatus: Send + Sync {
    /// `None` while unknown, treated as signed out
    fn is_authenticated(&self) -> Option<bool>;
}

/// Evaluates operation descriptions against the graph engine
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait NodeValueExecutor: Send + Sync {
    /// Run `save_to_uri` and return the URI of the stored object
    async fn save_to_uri(&self, request: &SaveRequest) -> Result<Option<String>>;
}

/// Performs artifact mutations against the backend
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait]
pub trait MutationService: Send + Sync {
    /// Apply `mutation` to the artifact behind `node`.
    ///
    /// Returns the new root node when the backend produces one.
    async fn mutate(&self, node: &ObjectNode, mutation: &Mutation) -> Result<Option<ObjectNode>>;
}

/// Maps arbitrary user text to a backend-safe artifact name
pub trait NameSanitizer: Send + Sync {
    fn to_safe_name(&self, raw: &str) -> String;
}

/// Reads the URI straight off `Get` nodes
#[derive(Debug, Clone, Copy, Default)]
pub struct GetNodeReferences;

impl ReferenceExtractor for GetNodeReferences {
    fn reference_of(&self, node: &ObjectNode) -> Option<String> {
        match node {
            ObjectNode::Get { uri } => Some(uri.clone()),
            ObjectNode::Void | ObjectNode::Expr { .. } => None,
        }
    }
}

/// Fixed authentication status, for sessions where it never changes
#[derive(Debug, Clone, Copy)]
pub struct StaticAuth(pub Option<bool>);

impl AuthStatus for StaticAuth {
    fn is_authenticated(&self) -> Option<bool> {
        self.0
    }
}

/// Remote lookup for sessions that never branch from remote artifacts
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRemotes;

impl RemoteLookup for NoRemotes {
    fn has_remote_counterpart(&self, _reference: &ArtifactUri) -> bool {
        false
    }
}
