// Copyright (c) 2025 - Cowboy AI, Inc.
//! Identity Verification and Fallback Location
//!
//! Drives the [`LookupState`] machine against an [`ObjectStore`]: each state
//! names the store call it needs, the driver performs it and feeds the
//! observation back as input until a terminal state is reached.
//!
//! A reference returned by the store can be reassigned to a different object
//! by out-of-band changes, so a read is only accepted once the tracking value
//! on the returned record matches the one recorded in persisted state. When
//! it does not, or the reference is gone, the object is looked up by its
//! tracking attribute instead.

use tracing::{debug, info, warn};

use crate::attributes::AttributeMap;
use crate::errors::ReconcileResult;
use crate::state_machine::{LookupInput, LookupPhase, LookupState, LookupStep, StateMachine};
use crate::store::{ObjectRecord, ObjectStore, SearchOptions};

/// Terminal outcome of a lookup
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityOutcome {
    /// Our object, possibly under a new reference
    Accept(ObjectRecord),
    /// The resource no longer exists
    Remove,
}

/// Outcome plus the phases visited on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub outcome: IdentityOutcome,
    pub path: Vec<LookupPhase>,
}

impl Resolution {
    /// Whether the fallback lookup was needed
    pub fn used_fallback(&self) -> bool {
        self.path.contains(&LookupPhase::FallbackLookup)
    }
}

/// Resolve `reference` to the object carrying the tracking value recorded in
/// `persisted_full`
///
/// Store errors other than NotFound on the primary read are returned as-is.
pub async fn resolve<S>(
    store: &S,
    object_type: &str,
    reference: &str,
    persisted_full: &AttributeMap,
    options: &SearchOptions,
) -> ReconcileResult<Resolution>
where
    S: ObjectStore + ?Sized,
{
    let mut state = LookupState::start(reference, persisted_full);
    let mut path = vec![state.phase()];

    while !state.is_terminal() {
        let input = match &state {
            LookupState::PrimaryLookup { reference, .. } => {
                match store.read(reference, options).await {
                    Ok(record) => LookupInput::Found(record),
                    Err(e) if e.is_not_found() => LookupInput::NotFound,
                    Err(e) => return Err(e.into()),
                }
            }
            LookupState::FallbackLookup { .. } => match state.fallback_filter() {
                Some(filter) => {
                    LookupInput::Matches(store.list(object_type, &filter, options).await?)
                }
                None => LookupInput::Check,
            },
            _ => LookupInput::Check,
        };

        let (next, step) = state.transition(&input)?;
        log_step(reference, &step);
        state = next;
        path.push(state.phase());
    }

    let outcome = match state {
        LookupState::Accept(record) => IdentityOutcome::Accept(record),
        _ => IdentityOutcome::Remove,
    };
    Ok(Resolution { outcome, path })
}

fn log_step(reference: &str, step: &LookupStep) {
    match step {
        LookupStep::ReferenceResolved => debug!("{} resolved, verifying identity", reference),
        LookupStep::ReferenceGone => debug!("{} no longer resolves", reference),
        LookupStep::IdentityVerified => debug!("{} identity verified", reference),
        LookupStep::IdentityMismatch { found } => warn!(
            "{} now holds a different object (tracking value {:?}), searching by tracking value",
            reference, found
        ),
        LookupStep::NoTrackingValue => {
            info!("{} is gone and no tracking value is recorded; removing", reference)
        }
        LookupStep::Recovered { reference: new } => {
            info!("{} was recreated as {}", reference, new)
        }
        LookupStep::Vanished => info!("{} no longer exists; removing", reference),
    }
}
