// Recording collaborators for testing - no side effects

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use crate::persistence::sanitizer::ArtifactSafeNames;
use crate::persistence::traits::*;
use crate::persistence::types::*;
use crate::persistence::uri::ArtifactUri;

/// Node value executor that returns a preset save result
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub save_result: Mutex<Option<String>>,
    pub failure: Mutex<Option<String>>,
    pub requests: Mutex<Vec<SaveRequest>>,
}

impl RecordingExecutor {
    pub fn returning(uri: Option<&str>) -> Self {
        let executor = Self::default();
        *executor.save_result.lock().unwrap() = uri.map(str::to_string);
        executor
    }

    pub fn set_failure(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn get_requests(&self) -> Vec<SaveRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl NodeValueExecutor for RecordingExecutor {
    async fn save_to_uri(&self, request: &SaveRequest) -> Result<Option<String>> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        Ok(self.save_result.lock().unwrap().clone())
    }
}

/// Mutation service that records every call and answers with preset roots
#[derive(Debug, Default)]
pub struct RecordingMutations {
    pub roots: Mutex<HashMap<&'static str, ObjectNode>>,
    pub failures: Mutex<HashMap<&'static str, String>>,
    pub executed: Mutex<Vec<(ObjectNode, Mutation)>>,
    pub pause: Mutex<Option<Arc<Notify>>>,
}

impl RecordingMutations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_root(&self, op: &'static str, root: ObjectNode) {
        self.roots.lock().unwrap().insert(op, root);
    }

    pub fn set_failure(&self, op: &'static str, message: &str) {
        self.failures.lock().unwrap().insert(op, message.to_string());
    }

    /// Hold every mutation until `notify` fires
    pub fn pause_until(&self, notify: Arc<Notify>) {
        *self.pause.lock().unwrap() = Some(notify);
    }

    pub fn get_executed(&self) -> Vec<(ObjectNode, Mutation)> {
        self.executed.lock().unwrap().clone()
    }

    pub fn get_executed_ops(&self) -> Vec<&'static str> {
        self.get_executed()
            .iter()
            .map(|(_, mutation)| mutation.op_name())
            .collect()
    }
}

#[async_trait]
impl MutationService for RecordingMutations {
    async fn mutate(&self, node: &ObjectNode, mutation: &Mutation) -> Result<Option<ObjectNode>> {
        self.executed
            .lock()
            .unwrap()
            .push((node.clone(), mutation.clone()));

        let pause = self.pause.lock().unwrap().clone();
        if let Some(notify) = pause {
            notify.notified().await;
        }

        let op = mutation.op_name();
        if let Some(message) = self.failures.lock().unwrap().get(op) {
            return Err(anyhow!(message.clone()));
        }
        Ok(self.roots.lock().unwrap().get(op).cloned())
    }
}

/// Remote lookup with a switchable answer
#[derive(Debug, Default)]
pub struct SwitchableRemotes {
    pub has_remote: Mutex<bool>,
    pub lookups: Mutex<Vec<ArtifactUri>>,
}

impl SwitchableRemotes {
    pub fn new(has_remote: bool) -> Self {
        Self {
            has_remote: Mutex::new(has_remote),
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn set(&self, has_remote: bool) {
        *self.has_remote.lock().unwrap() = has_remote;
    }
}

impl RemoteLookup for SwitchableRemotes {
    fn has_remote_counterpart(&self, reference: &ArtifactUri) -> bool {
        self.lookups.lock().unwrap().push(reference.clone());
        *self.has_remote.lock().unwrap()
    }
}

/// Authentication status that can flip mid-test
#[derive(Debug, Default)]
pub struct SwitchableAuth {
    pub status: Mutex<Option<bool>>,
}

impl SwitchableAuth {
    pub fn new(status: Option<bool>) -> Self {
        Self {
            status: Mutex::new(status),
        }
    }

    pub fn set(&self, status: Option<bool>) {
        *self.status.lock().unwrap() = status;
    }
}

impl AuthStatus for SwitchableAuth {
    fn is_authenticated(&self) -> Option<bool> {
        *self.status.lock().unwrap()
    }
}

/// Default sanitizer that remembers its inputs
#[derive(Debug, Default)]
pub struct RecordingSanitizer {
    pub inputs: Mutex<Vec<String>>,
}

impl RecordingSanitizer {
    pub fn get_inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl NameSanitizer for RecordingSanitizer {
    fn to_safe_name(&self, raw: &str) -> String {
        self.inputs.lock().unwrap().push(raw.to_string());
        ArtifactSafeNames.to_safe_name(raw)
    }
}

/// All recording collaborators wired together
pub struct TestHarness {
    pub executor: Arc<RecordingExecutor>,
    pub mutations: Arc<RecordingMutations>,
    pub remotes: Arc<SwitchableRemotes>,
    pub auth: Arc<SwitchableAuth>,
    pub sanitizer: Arc<RecordingSanitizer>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            executor: Arc::new(RecordingExecutor::default()),
            mutations: Arc::new(RecordingMutations::new()),
            remotes: Arc::new(SwitchableRemotes::new(false)),
            auth: Arc::new(SwitchableAuth::new(Some(true))),
            sanitizer: Arc::new(RecordingSanitizer::default()),
        }
    }

    pub fn services(&self) -> crate::persistence::PersistenceServices {
        crate::persistence::PersistenceServices::new(
            self.executor.clone(),
            self.mutations.clone(),
        )
        .with_remotes(self.remotes.clone())
        .with_auth(self.auth.clone())
        .with_sanitizer(self.sanitizer.clone())
    }

    pub fn manager(
        &self,
        node: ObjectNode,
        locality: Locality,
    ) -> crate::persistence::PersistenceManager {
        let settings = crate::persistence::PersistenceSettings {
            locality,
            ..Default::default()
        };
        crate::persistence::PersistenceManager::new(node, settings, self.services())
    }

    /// Total number of collaborator calls that could change data
    pub fn external_calls(&self) -> usize {
        self.executor.get_requests().len() + self.mutations.get_executed().len()
    }
}
