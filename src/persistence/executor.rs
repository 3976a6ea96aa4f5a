// Action executor - validates and performs transitions for one held artifact

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::Instrument;

use super::actions::{actions_for, available_actions};
use super::classifier::{classify, parse_reference};
use super::errors::PersistenceError;
use super::sanitizer::ArtifactSafeNames;
use super::traits::*;
use super::types::*;
use super::uri::ArtifactUri;
use crate::config::LifecycleConfig;
use crate::telemetry::{create_action_span, generate_correlation_id};

pub type Result<T, E = PersistenceError> = std::result::Result<T, E>;

/// Collaborators consulted by the manager
#[derive(Clone)]
pub struct PersistenceServices {
    pub references: Arc<dyn ReferenceExtractor>,
    pub remotes: Arc<dyn RemoteLookup>,
    pub auth: Arc<dyn AuthStatus>,
    pub executor: Arc<dyn NodeValueExecutor>,
    pub mutations: Arc<dyn MutationService>,
    pub sanitizer: Arc<dyn NameSanitizer>,
}

impl PersistenceServices {
    /// Services with `Get`-node references, no remotes, signed out and the default sanitizer
    pub fn new(executor: Arc<dyn NodeValueExecutor>, mutations: Arc<dyn MutationService>) -> Self {
        Self {
            references: Arc::new(GetNodeReferences),
            remotes: Arc::new(NoRemotes),
            auth: Arc::new(StaticAuth(None)),
            executor,
            mutations,
            sanitizer: Arc::new(ArtifactSafeNames),
        }
    }

    pub fn with_references(mut self, references: Arc<dyn ReferenceExtractor>) -> Self {
        self.references = references;
        self
    }

    pub fn with_remotes(mut self, remotes: Arc<dyn RemoteLookup>) -> Self {
        self.remotes = remotes;
        self
    }

    pub fn with_auth(mut self, auth: Arc<dyn AuthStatus>) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn NameSanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }
}

impl std::fmt::Debug for PersistenceServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceServices").finish_non_exhaustive()
    }
}

/// Session settings that shape classification and dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceSettings {
    pub locality: Locality,
    pub default_project: String,
    pub default_entity: Option<String>,
    /// Reject a second action while one is still in flight
    pub single_flight: bool,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            locality: Locality::Local,
            default_project: "weave".to_string(),
            default_entity: None,
            single_flight: true,
        }
    }
}

impl From<&LifecycleConfig> for PersistenceSettings {
    fn from(config: &LifecycleConfig) -> Self {
        Self {
            locality: config.session.locality(),
            default_project: config.publish.default_project.clone(),
            default_entity: config.publish.default_entity.clone(),
            single_flight: config.execution.single_flight,
        }
    }
}

/// Holds the caller's object node and performs persistence actions on it.
///
/// The lifecycle state is never stored: every read re-derives it from the
/// held node, the remote lookup and the configured locality.
#[derive(Debug)]
pub struct PersistenceManager {
    node: RwLock<ObjectNode>,
    in_flight: AtomicUsize,
    settings: PersistenceSettings,
    services: PersistenceServices,
}

impl PersistenceManager {
    pub fn new(node: ObjectNode, settings: PersistenceSettings, services: PersistenceServices) -> Self {
        Self {
            node: RwLock::new(node),
            in_flight: AtomicUsize::new(0),
            settings,
            services,
        }
    }

    pub fn settings(&self) -> &PersistenceSettings {
        &self.settings
    }

    /// Snapshot of the held node
    pub fn node(&self) -> ObjectNode {
        self.node
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the held node, e.g. after the caller navigates elsewhere.
    /// An action still in flight may overwrite it again when it completes.
    pub fn set_node(&self, node: ObjectNode) {
        *self.node.write().unwrap_or_else(PoisonError::into_inner) = node;
    }

    pub fn reference(&self) -> Result<Option<ArtifactUri>> {
        let node = self.node();
        self.services
            .references
            .reference_of(&node)
            .as_deref()
            .map(parse_reference)
            .transpose()
    }

    pub fn state(&self) -> Result<PersistenceState> {
        let reference = self.reference()?;
        let has_remote = reference
            .as_ref()
            .is_some_and(|r| self.services.remotes.has_remote_counterpart(r));
        Ok(classify(reference.as_ref(), has_remote, self.settings.locality))
    }

    pub fn is_authenticated(&self) -> bool {
        self.services.auth.is_authenticated().unwrap_or(false)
    }

    pub fn available_actions(&self) -> Result<ActionSet> {
        Ok(available_actions(self.state()?, self.is_authenticated()))
    }

    /// True while an action is in flight
    pub fn acting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire) > 0
    }

    pub fn view(&self) -> Result<PersistenceView> {
        let state = self.state()?;
        Ok(PersistenceView {
            state,
            actions: available_actions(state, self.is_authenticated()),
            acting: self.acting(),
        })
    }

    pub async fn take_action(&self, action: PersistenceAction, options: ActionOptions) -> Result<()> {
        self.take_action_then(action, options, || {}).await
    }

    /// Perform `action` and call `on_finished` once it succeeded.
    ///
    /// `on_finished` runs after the held node was replaced and the acting
    /// flag was released. It is not called when the action fails.
    pub async fn take_action_then<F>(
        &self,
        action: PersistenceAction,
        options: ActionOptions,
        on_finished: F,
    ) -> Result<()>
    where
        F: FnOnce() + Send,
    {
        let correlation_id = generate_correlation_id();
        let span = create_action_span(action, &correlation_id);
        self.run_action(action, options, on_finished)
            .instrument(span)
            .await
    }

    async fn run_action<F>(
        &self,
        action: PersistenceAction,
        options: ActionOptions,
        on_finished: F,
    ) -> Result<()>
    where
        F: FnOnce() + Send,
    {
        let guard = ActingGuard::acquire(&self.in_flight, self.settings.single_flight)?;

        let state = self.state()?;
        tracing::Span::current().record("state", state.as_str());
        if !actions_for(state).contains(action) {
            tracing::warn!(%action, %state, "Rejected action not offered in current state");
            return Err(PersistenceError::InvalidAction { action, state });
        }

        tracing::info!(%action, %state, "Taking persistence action");
        let replacement = self.dispatch(action, options).await.inspect_err(|e| {
            tracing::error!(%action, error = %e, "Persistence action failed");
        })?;

        if let Some(node) = replacement {
            tracing::debug!(?node, "Replacing held node");
            self.set_node(node);
        }
        drop(guard);

        tracing::info!(%action, "Persistence action finished");
        on_finished();
        Ok(())
    }

    async fn dispatch(
        &self,
        action: PersistenceAction,
        options: ActionOptions,
    ) -> Result<Option<ObjectNode>> {
        let node = self.node();

        match action {
            PersistenceAction::Save => {
                let request = SaveRequest {
                    obj: node,
                    name: options.name,
                };
                let uri = self
                    .services
                    .executor
                    .save_to_uri(&request)
                    .await
                    .map_err(PersistenceError::operation("save_to_uri"))?
                    .ok_or(PersistenceError::SaveFailed)?;
                Ok(Some(ObjectNode::get(uri)))
            }
            PersistenceAction::RenameLocal => {
                if !self.reference()?.is_some_and(|r| r.is_local()) {
                    return Err(PersistenceError::NotLocalReference { action });
                }
                let raw = options
                    .name
                    .ok_or(PersistenceError::MissingName { action })?;
                let name = self.services.sanitizer.to_safe_name(&raw);

                self.mutate(&node, Mutation::Rename { name: name.clone() })
                    .await?;
                Ok(Some(ObjectNode::get(
                    ArtifactUri::local_latest(&name).to_string(),
                )))
            }
            PersistenceAction::PublishAs | PersistenceAction::PublishNew => {
                let mutation = Mutation::Publish {
                    artifact_name: options
                        .name
                        .as_deref()
                        .map(|raw| self.services.sanitizer.to_safe_name(raw)),
                    project_name: options
                        .project_name
                        .unwrap_or_else(|| self.settings.default_project.clone()),
                    entity_name: options
                        .entity_name
                        .or_else(|| self.settings.default_entity.clone()),
                };
                self.mutate_for_root(&node, mutation).await
            }
            PersistenceAction::Commit => self.mutate_for_root(&node, Mutation::Merge).await,
            PersistenceAction::DeleteLocal | PersistenceAction::DeleteRemote => {
                // The caller navigates away; the held node stays as it was.
                self.mutate(&node, Mutation::Delete).await?;
                Ok(None)
            }
            PersistenceAction::RenameRemote => Err(PersistenceError::NotImplemented { action }),
        }
    }

    async fn mutate(&self, node: &ObjectNode, mutation: Mutation) -> Result<Option<ObjectNode>> {
        tracing::debug!(op = mutation.op_name(), "Dispatching mutation");
        self.services
            .mutations
            .mutate(node, &mutation)
            .await
            .map_err(PersistenceError::operation(mutation.op_name()))
    }

    async fn mutate_for_root(
        &self,
        node: &ObjectNode,
        mutation: Mutation,
    ) -> Result<Option<ObjectNode>> {
        let op = mutation.op_name();
        let root = self.mutate(node, mutation).await?;
        if root.is_none() {
            tracing::warn!(op, "Mutation produced no new root; keeping current node");
        }
        Ok(root)
    }
}

/// Marks an action in flight for as long as it lives
struct ActingGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> ActingGuard<'a> {
    fn acquire(in_flight: &'a AtomicUsize, single_flight: bool) -> Result<Self> {
        if single_flight {
            in_flight
                .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
                .map_err(|_| PersistenceError::ActionInProgress)?;
        } else {
            in_flight.fetch_add(1, Ordering::AcqRel);
        }
        Ok(Self { in_flight })
    }
}

impl Drop for ActingGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}
