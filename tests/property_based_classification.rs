// Property-Based Testing for State Classification and the Action Table
// Tests classifier and gate invariants over generated references

use artifact_lifecycle::persistence::{actions_for, ActionSlot, TrackingForm};
use artifact_lifecycle::{
    available_actions, classify_reference, ArtifactUri, Locality, PersistenceAction,
    PersistenceState,
};
use proptest::prelude::*;
use proptest_derive::Arbitrary;

#[derive(Debug, Clone, Copy, Arbitrary)]
enum ReferenceShape {
    Absent,
    Local,
    Remote,
}

#[derive(Debug, Clone, Arbitrary)]
struct ClassifierInput {
    shape: ReferenceShape,
    #[proptest(strategy = "artifact_name_strategy()")]
    name: String,
    #[proptest(strategy = "version_strategy()")]
    version: String,
    has_remote: bool,
    served_locally: bool,
}

impl ClassifierInput {
    fn reference(&self) -> Option<String> {
        match self.shape {
            ReferenceShape::Absent => None,
            ReferenceShape::Local => Some(format!(
                "local-artifact:///{}:{}/obj",
                self.name, self.version
            )),
            ReferenceShape::Remote => Some(format!(
                "wandb-artifact:///team/weave/{}:{}/obj",
                self.name, self.version
            )),
        }
    }

    fn locality(&self) -> Locality {
        Locality::from_served_locally(self.served_locally)
    }
}

// Strategy for generating valid artifact names
fn artifact_name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{1,24}"
}

fn version_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("latest".to_string()),
        "v[0-9]{1,3}",
        "[0-9a-f]{8,20}",
    ]
}

fn state_strategy() -> impl Strategy<Value = PersistenceState> {
    proptest::sample::select(PersistenceState::ALL.to_vec())
}

proptest! {
    #[test]
    fn classification_is_total_and_stable(input in any::<ClassifierInput>()) {
        let reference = input.reference();
        let first = classify_reference(reference.as_deref(), input.has_remote, input.locality());
        let second = classify_reference(reference.as_deref(), input.has_remote, input.locality());

        prop_assert!(first.is_ok());
        prop_assert_eq!(first.as_ref().ok(), second.as_ref().ok());
    }

    #[test]
    fn classification_respects_both_axes(input in any::<ClassifierInput>()) {
        let reference = input.reference();
        let state = classify_reference(reference.as_deref(), input.has_remote, input.locality())
            .unwrap();

        prop_assert_eq!(state.locality(), input.locality());
        let expected_form = match input.shape {
            ReferenceShape::Absent => TrackingForm::Untracked,
            ReferenceShape::Remote => TrackingForm::Published,
            ReferenceShape::Local if input.has_remote => TrackingForm::UncommittedWithRemote,
            ReferenceShape::Local => TrackingForm::SavedNoRemote,
        };
        prop_assert_eq!(state.form(), expected_form);
    }

    #[test]
    fn generated_references_round_trip(input in any::<ClassifierInput>()) {
        if let Some(reference) = input.reference() {
            let parsed = ArtifactUri::parse(&reference).unwrap();
            prop_assert_eq!(parsed.to_string(), reference);
            prop_assert_eq!(parsed.name(), input.name.as_str());
        }
    }

    #[test]
    fn foreign_schemes_are_rejected(scheme in "[a-z]{2,10}", rest in "[a-z0-9/:]{0,20}") {
        let reference = format!("{scheme}://{rest}");
        prop_assert!(classify_reference(Some(&reference), false, Locality::Local).is_err());
    }

    #[test]
    fn gate_only_removes_authenticated_actions(state in state_strategy()) {
        let full = actions_for(state);
        let gated = available_actions(state, false);

        prop_assert_eq!(available_actions(state, true), full);
        for action in full.iter() {
            prop_assert_eq!(gated.contains(action), !action.requires_authentication());
        }
    }

    #[test]
    fn at_most_one_action_per_slot(state in state_strategy(), authenticated in any::<bool>()) {
        let actions = available_actions(state, authenticated);
        let slots: Vec<ActionSlot> = actions.iter().map(|a: PersistenceAction| a.slot()).collect();
        for slot in [ActionSlot::Store, ActionSlot::Rename, ActionSlot::Delete] {
            prop_assert!(slots.iter().filter(|s| **s == slot).count() <= 1);
        }
    }
}
