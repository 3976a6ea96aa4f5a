// Core types for the artifact persistence state machine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the editing session is hosted locally or in the cloud
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locality {
    Local,
    Cloud,
}

impl Locality {
    pub fn from_served_locally(served_locally: bool) -> Self {
        if served_locally {
            Locality::Local
        } else {
            Locality::Cloud
        }
    }
}

/// How a reference relates to a remote counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackingForm {
    /// No reference yet, the object only exists in memory
    Untracked,
    /// Local reference with no remote branch point
    SavedNoRemote,
    /// Local reference branched from a remote artifact
    UncommittedWithRemote,
    /// The reference itself points at a published artifact
    Published,
}

/// Lifecycle state of a single artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceState {
    LocalUntracked,
    LocalSavedNoRemote,
    LocalUncommittedWithRemote,
    LocalPublished,
    CloudUntracked,
    CloudSavedNoRemote,
    CloudUncommittedWithRemote,
    CloudPublished,
}

impl PersistenceState {
    pub const ALL: [PersistenceState; 8] = [
        PersistenceState::LocalUntracked,
        PersistenceState::LocalSavedNoRemote,
        PersistenceState::LocalUncommittedWithRemote,
        PersistenceState::LocalPublished,
        PersistenceState::CloudUntracked,
        PersistenceState::CloudSavedNoRemote,
        PersistenceState::CloudUncommittedWithRemote,
        PersistenceState::CloudPublished,
    ];

    pub fn from_parts(locality: Locality, form: TrackingForm) -> Self {
        match (locality, form) {
            (Locality::Local, TrackingForm::Untracked) => PersistenceState::LocalUntracked,
            (Locality::Local, TrackingForm::SavedNoRemote) => PersistenceState::LocalSavedNoRemote,
            (Locality::Local, TrackingForm::UncommittedWithRemote) => {
                PersistenceState::LocalUncommittedWithRemote
            }
            (Locality::Local, TrackingForm::Published) => PersistenceState::LocalPublished,
            (Locality::Cloud, TrackingForm::Untracked) => PersistenceState::CloudUntracked,
            (Locality::Cloud, TrackingForm::SavedNoRemote) => PersistenceState::CloudSavedNoRemote,
            (Locality::Cloud, TrackingForm::UncommittedWithRemote) => {
                PersistenceState::CloudUncommittedWithRemote
            }
            (Locality::Cloud, TrackingForm::Published) => PersistenceState::CloudPublished,
        }
    }

    pub fn locality(&self) -> Locality {
        match self {
            PersistenceState::LocalUntracked
            | PersistenceState::LocalSavedNoRemote
            | PersistenceState::LocalUncommittedWithRemote
            | PersistenceState::LocalPublished => Locality::Local,
            PersistenceState::CloudUntracked
            | PersistenceState::CloudSavedNoRemote
            | PersistenceState::CloudUncommittedWithRemote
            | PersistenceState::CloudPublished => Locality::Cloud,
        }
    }

    pub fn form(&self) -> TrackingForm {
        match self {
            PersistenceState::LocalUntracked | PersistenceState::CloudUntracked => {
                TrackingForm::Untracked
            }
            PersistenceState::LocalSavedNoRemote | PersistenceState::CloudSavedNoRemote => {
                TrackingForm::SavedNoRemote
            }
            PersistenceState::LocalUncommittedWithRemote
            | PersistenceState::CloudUncommittedWithRemote => TrackingForm::UncommittedWithRemote,
            PersistenceState::LocalPublished | PersistenceState::CloudPublished => {
                TrackingForm::Published
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PersistenceState::LocalUntracked => "local_untracked",
            PersistenceState::LocalSavedNoRemote => "local_saved_no_remote",
            PersistenceState::LocalUncommittedWithRemote => "local_uncommitted_with_remote",
            PersistenceState::LocalPublished => "local_published",
            PersistenceState::CloudUntracked => "cloud_untracked",
            PersistenceState::CloudSavedNoRemote => "cloud_saved_no_remote",
            PersistenceState::CloudUncommittedWithRemote => "cloud_uncommitted_with_remote",
            PersistenceState::CloudPublished => "cloud_published",
        }
    }

    /// Short status text shown next to the artifact name
    pub fn label(&self) -> &'static str {
        match self {
            PersistenceState::LocalUntracked | PersistenceState::CloudUntracked => {
                "Unsaved changes"
            }
            PersistenceState::LocalSavedNoRemote => "Saved",
            PersistenceState::CloudSavedNoRemote => "Not published",
            PersistenceState::LocalUncommittedWithRemote
            | PersistenceState::CloudUncommittedWithRemote => "Uncommitted changes",
            PersistenceState::LocalPublished | PersistenceState::CloudPublished => "Published",
        }
    }
}

impl fmt::Display for PersistenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three independent action categories a state may offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSlot {
    Store,
    Rename,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreAction {
    /// Start tracking changes locally
    Save,
    /// Merge local changes into the remote branch
    Commit,
    /// Push a local artifact without remote to a new remote branch under its current name
    PublishNew,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameAction {
    /// Only applicable when no remote branch exists
    RenameLocal,
    /// Publish to a new remote branch under a chosen name
    PublishAs,
    /// Rename a remote branch directly; the backend does not support this yet
    RenameRemote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteAction {
    DeleteLocal,
    DeleteRemote,
}

/// Any transition action, regardless of slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistenceAction {
    Save,
    Commit,
    PublishNew,
    RenameLocal,
    PublishAs,
    RenameRemote,
    DeleteLocal,
    DeleteRemote,
}

impl PersistenceAction {
    pub const ALL: [PersistenceAction; 8] = [
        PersistenceAction::Save,
        PersistenceAction::Commit,
        PersistenceAction::PublishNew,
        PersistenceAction::RenameLocal,
        PersistenceAction::PublishAs,
        PersistenceAction::RenameRemote,
        PersistenceAction::DeleteLocal,
        PersistenceAction::DeleteRemote,
    ];

    pub fn slot(&self) -> ActionSlot {
        match self {
            PersistenceAction::Save | PersistenceAction::Commit | PersistenceAction::PublishNew => {
                ActionSlot::Store
            }
            PersistenceAction::RenameLocal
            | PersistenceAction::PublishAs
            | PersistenceAction::RenameRemote => ActionSlot::Rename,
            PersistenceAction::DeleteLocal | PersistenceAction::DeleteRemote => ActionSlot::Delete,
        }
    }

    /// Actions that touch a remote system need a signed-in identity
    pub fn requires_authentication(&self) -> bool {
        matches!(
            self,
            PersistenceAction::Commit
                | PersistenceAction::PublishAs
                | PersistenceAction::PublishNew
                | PersistenceAction::RenameRemote
                | PersistenceAction::DeleteRemote
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PersistenceAction::Save => "save",
            PersistenceAction::Commit => "commit",
            PersistenceAction::PublishNew => "publish_new",
            PersistenceAction::RenameLocal => "rename_local",
            PersistenceAction::PublishAs => "publish_as",
            PersistenceAction::RenameRemote => "rename_remote",
            PersistenceAction::DeleteLocal => "delete_local",
            PersistenceAction::DeleteRemote => "delete_remote",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PersistenceAction::Save => "Make object",
            PersistenceAction::Commit => "Publish changes",
            PersistenceAction::RenameLocal | PersistenceAction::RenameRemote => "Rename",
            PersistenceAction::PublishAs => "Publish As",
            PersistenceAction::PublishNew => "Publish board",
            PersistenceAction::DeleteLocal | PersistenceAction::DeleteRemote => "Delete board",
        }
    }
}

impl fmt::Display for PersistenceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PersistenceAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PersistenceAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("unknown persistence action: {s}"))
    }
}

impl From<StoreAction> for PersistenceAction {
    fn from(action: StoreAction) -> Self {
        match action {
            StoreAction::Save => PersistenceAction::Save,
            StoreAction::Commit => PersistenceAction::Commit,
            StoreAction::PublishNew => PersistenceAction::PublishNew,
        }
    }
}

impl From<RenameAction> for PersistenceAction {
    fn from(action: RenameAction) -> Self {
        match action {
            RenameAction::RenameLocal => PersistenceAction::RenameLocal,
            RenameAction::PublishAs => PersistenceAction::PublishAs,
            RenameAction::RenameRemote => PersistenceAction::RenameRemote,
        }
    }
}

impl From<DeleteAction> for PersistenceAction {
    fn from(action: DeleteAction) -> Self {
        match action {
            DeleteAction::DeleteLocal => PersistenceAction::DeleteLocal,
            DeleteAction::DeleteRemote => PersistenceAction::DeleteRemote,
        }
    }
}

/// Actions offered for a state, at most one per slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSet {
    pub store: Option<StoreAction>,
    pub rename: Option<RenameAction>,
    pub delete: Option<DeleteAction>,
}

impl ActionSet {
    pub fn iter(&self) -> impl Iterator<Item = PersistenceAction> {
        [
            self.store.map(PersistenceAction::from),
            self.rename.map(PersistenceAction::from),
            self.delete.map(PersistenceAction::from),
        ]
        .into_iter()
        .flatten()
    }

    pub fn contains(&self, action: PersistenceAction) -> bool {
        self.iter().any(|offered| offered == action)
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_none() && self.rename.is_none() && self.delete.is_none()
    }
}

/// Opaque computation description held by the caller
///
/// A `Get` node reads an artifact by URI; everything else is an
/// unsaved expression the graph evaluator knows how to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ObjectNode {
    Void,
    Get { uri: String },
    Expr { op: String, inputs: serde_json::Value },
}

impl ObjectNode {
    pub fn get(uri: impl Into<String>) -> Self {
        ObjectNode::Get { uri: uri.into() }
    }
}

/// Caller supplied parameters for an action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOptions {
    pub name: Option<String>,
    pub project_name: Option<String>,
    pub entity_name: Option<String>,
}

impl ActionOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Operation description handed to the node value executor for `save`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub obj: ObjectNode,
    pub name: Option<String>,
}

/// Mutations dispatched to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    Rename {
        name: String,
    },
    Publish {
        artifact_name: Option<String>,
        project_name: String,
        entity_name: Option<String>,
    },
    Merge,
    Delete,
}

impl Mutation {
    pub fn op_name(&self) -> &'static str {
        match self {
            Mutation::Rename { .. } => "rename_artifact",
            Mutation::Publish { .. } => "publish_artifact",
            Mutation::Merge => "merge_artifact",
            Mutation::Delete => "delete_artifact",
        }
    }
}

/// What the caller renders: the derived state, the enabled actions and the busy flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PersistenceView {
    pub state: PersistenceState,
    pub actions: ActionSet,
    pub acting: bool,
}
