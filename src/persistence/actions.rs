// Action table and authentication gate

use super::types::{
    ActionSet, DeleteAction, PersistenceAction, PersistenceState, RenameAction, StoreAction,
};

/// Static action table. Business policy, hand enumerated per state.
pub fn actions_for(state: PersistenceState) -> ActionSet {
    use DeleteAction::*;
    use RenameAction::*;
    use StoreAction::*;

    let (store, rename, delete) = match state {
        PersistenceState::LocalUntracked => (Some(Save), Some(PublishAs), Some(DeleteLocal)),
        PersistenceState::LocalSavedNoRemote => {
            (Some(PublishNew), Some(RenameLocal), Some(DeleteLocal))
        }
        PersistenceState::LocalUncommittedWithRemote => {
            (Some(Commit), Some(PublishAs), Some(DeleteLocal))
        }
        // TODO: offer RenameRemote once the backend supports renaming a remote branch
        PersistenceState::LocalPublished => (None, None, Some(DeleteLocal)),
        PersistenceState::CloudUntracked => (None, Some(PublishAs), Some(DeleteRemote)),
        PersistenceState::CloudSavedNoRemote => {
            (Some(PublishNew), Some(PublishAs), Some(DeleteRemote))
        }
        PersistenceState::CloudUncommittedWithRemote => {
            (Some(Commit), Some(PublishAs), Some(DeleteRemote))
        }
        PersistenceState::CloudPublished => (None, None, Some(DeleteRemote)),
    };

    ActionSet {
        store,
        rename,
        delete,
    }
}

/// Actions offered to the caller, with remote-touching actions removed
/// when nobody is signed in. Never affects the state itself.
pub fn available_actions(state: PersistenceState, is_authenticated: bool) -> ActionSet {
    let actions = actions_for(state);
    if is_authenticated {
        return actions;
    }

    ActionSet {
        store: gate(actions.store),
        rename: gate(actions.rename),
        delete: gate(actions.delete),
    }
}

fn gate<A>(action: Option<A>) -> Option<A>
where
    A: Copy + Into<PersistenceAction>,
{
    action.filter(|a| !Into::<PersistenceAction>::into(*a).requires_authentication())
}
