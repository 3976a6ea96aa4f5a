// State classification - a pure projection of (reference, remote flag, locality)

use super::errors::PersistenceError;
use super::types::{Locality, PersistenceState, TrackingForm};
use super::uri::ArtifactUri;

impl TrackingForm {
    /// Derive the tracking form of a reference
    pub fn of(reference: Option<&ArtifactUri>, has_remote: bool) -> Self {
        match reference {
            None => TrackingForm::Untracked,
            Some(ArtifactUri::Remote { .. }) => TrackingForm::Published,
            Some(ArtifactUri::Local { .. }) if has_remote => TrackingForm::UncommittedWithRemote,
            Some(ArtifactUri::Local { .. }) => TrackingForm::SavedNoRemote,
        }
    }
}

/// Classify a parsed reference. Total over its inputs.
pub fn classify(
    reference: Option<&ArtifactUri>,
    has_remote: bool,
    locality: Locality,
) -> PersistenceState {
    PersistenceState::from_parts(locality, TrackingForm::of(reference, has_remote))
}

/// Classify a raw reference string.
///
/// A reference in any grammar other than the local or remote artifact
/// forms is an invariant violation and is reported, never defaulted.
pub fn classify_reference(
    reference: Option<&str>,
    has_remote: bool,
    locality: Locality,
) -> Result<PersistenceState, PersistenceError> {
    let parsed = reference.map(parse_reference).transpose()?;
    Ok(classify(parsed.as_ref(), has_remote, locality))
}

pub(crate) fn parse_reference(raw: &str) -> Result<ArtifactUri, PersistenceError> {
    ArtifactUri::parse(raw).map_err(|e| {
        tracing::error!(reference = %raw, error = %e, "Unrecognized artifact reference form");
        PersistenceError::from(e)
    })
}
