// Copyright (c) 2025 - Cowboy AI, Inc.
//! Identity Lookup State Machine
//!
//! Pure FSM deciding whether the object behind a persisted reference is
//! still the resource instance we created, and how to find it if not.
//!
//! # State Machine Type
//!
//! This is a **Mealy Machine**: outputs depend on both state and input.
//!
//! # States
//!
//! - PrimaryLookup: read the persisted reference
//! - VerifyIdentity: compare tracking values
//! - FallbackLookup: list objects carrying our tracking value
//! - Accept (terminal): record found and verified
//! - Remove (terminal): resource no longer exists
//!
//! # Transitions
//!
//! ```text
//! PrimaryLookup  ──Found──────────▶ VerifyIdentity
//! PrimaryLookup  ──NotFound───────▶ FallbackLookup
//! VerifyIdentity ──Check (match)──▶ Accept
//! VerifyIdentity ──Check (differ)─▶ FallbackLookup
//! FallbackLookup ──Check──────────▶ Remove        (no tracking value)
//! FallbackLookup ──Matches([])────▶ Remove
//! FallbackLookup ──Matches([r])───▶ Accept(r)
//! ```
//!
//! Verifying without a persisted tracking value, and a fallback that finds
//! more than one object, are terminal failures.

use super::{StateMachine, TransitionError, TransitionResult};
use crate::attributes::AttributeMap;
use crate::errors::ReconcileError;
use crate::store::{AttributeFilter, ObjectRecord};
use crate::tracking::{tracking_id, TRACKING_ATTRIBUTE};

/// State name without payload, for logging and path assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupPhase {
    PrimaryLookup,
    VerifyIdentity,
    FallbackLookup,
    Accept,
    Remove,
}

/// Lookup state
#[derive(Debug, Clone, PartialEq)]
pub enum LookupState {
    PrimaryLookup {
        reference: String,
        expected: Option<String>,
    },
    VerifyIdentity {
        reference: String,
        expected: Option<String>,
        record: ObjectRecord,
    },
    FallbackLookup {
        reference: String,
        expected: Option<String>,
    },
    Accept(ObjectRecord),
    Remove,
}

/// Observation fed into the machine (FSM input)
#[derive(Debug, Clone, PartialEq)]
pub enum LookupInput {
    /// Primary read returned a record
    Found(ObjectRecord),
    /// Primary read reported the reference is gone
    NotFound,
    /// Evaluate the current state without new data
    Check,
    /// Result of listing by tracking value
    Matches(Vec<ObjectRecord>),
}

/// Transition output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStep {
    ReferenceResolved,
    ReferenceGone,
    IdentityVerified,
    IdentityMismatch { found: Option<String> },
    NoTrackingValue,
    Recovered { reference: String },
    Vanished,
}

impl LookupState {
    /// Initial state for a read of `reference` with persisted full attributes
    pub fn start(reference: impl Into<String>, persisted_full: &AttributeMap) -> Self {
        LookupState::PrimaryLookup {
            reference: reference.into(),
            expected: tracking_id(persisted_full).map(str::to_string),
        }
    }

    pub fn phase(&self) -> LookupPhase {
        match self {
            LookupState::PrimaryLookup { .. } => LookupPhase::PrimaryLookup,
            LookupState::VerifyIdentity { .. } => LookupPhase::VerifyIdentity,
            LookupState::FallbackLookup { .. } => LookupPhase::FallbackLookup,
            LookupState::Accept(_) => LookupPhase::Accept,
            LookupState::Remove => LookupPhase::Remove,
        }
    }

    /// Filter the fallback lookup must list with, if one is possible
    pub fn fallback_filter(&self) -> Option<AttributeFilter> {
        match self {
            LookupState::FallbackLookup {
                expected: Some(id), ..
            } => {
                let mut filter = AttributeFilter::new();
                filter.insert(TRACKING_ATTRIBUTE.to_string(), id.clone());
                Some(filter)
            }
            _ => None,
        }
    }

    fn invalid(&self, input: &LookupInput) -> ReconcileError {
        let input = match input {
            LookupInput::Found(_) => "Found",
            LookupInput::NotFound => "NotFound",
            LookupInput::Check => "Check",
            LookupInput::Matches(_) => "Matches",
        };
        TransitionError::InvalidTransition {
            from: format!("{:?}", self.phase()),
            input: input.to_string(),
        }
        .into()
    }
}

impl StateMachine for LookupState {
    type Input = LookupInput;
    type Output = LookupStep;
    type Error = ReconcileError;

    fn transition(
        &self,
        input: &Self::Input,
    ) -> TransitionResult<(Self, Self::Output), Self::Error> {
        use LookupInput::*;
        use LookupState::*;

        match (self, input) {
            (PrimaryLookup { reference, expected }, Found(record)) => Ok((
                VerifyIdentity {
                    reference: reference.clone(),
                    expected: expected.clone(),
                    record: record.clone(),
                },
                LookupStep::ReferenceResolved,
            )),
            (PrimaryLookup { reference, expected }, NotFound) => Ok((
                FallbackLookup {
                    reference: reference.clone(),
                    expected: expected.clone(),
                },
                LookupStep::ReferenceGone,
            )),

            (VerifyIdentity { reference, expected, record }, Check) => {
                let Some(expected) = expected else {
                    return Err(ReconcileError::MissingIdentity {
                        reference: reference.clone(),
                    });
                };
                let found = tracking_id(&record.attributes);
                if found == Some(expected.as_str()) {
                    Ok((Accept(record.clone()), LookupStep::IdentityVerified))
                } else {
                    Ok((
                        FallbackLookup {
                            reference: reference.clone(),
                            expected: Some(expected.clone()),
                        },
                        LookupStep::IdentityMismatch {
                            found: found.map(str::to_string),
                        },
                    ))
                }
            }

            (FallbackLookup { expected: None, .. }, Check) => {
                Ok((Remove, LookupStep::NoTrackingValue))
            }
            (FallbackLookup { expected: Some(expected), .. }, Matches(records)) => {
                // Stores that ignore the filter must not hand us a stranger.
                let mut ours: Vec<&ObjectRecord> = records
                    .iter()
                    .filter(|r| tracking_id(&r.attributes) == Some(expected.as_str()))
                    .collect();

                match ours.len() {
                    0 => Ok((Remove, LookupStep::Vanished)),
                    1 => {
                        let record = ours.remove(0).clone();
                        let reference = record.reference.clone();
                        Ok((Accept(record), LookupStep::Recovered { reference }))
                    }
                    matches => Err(ReconcileError::AmbiguousIdentity {
                        tracking_id: expected.clone(),
                        matches,
                    }),
                }
            }

            (Accept(_) | Remove, _) => {
                Err(TransitionError::Terminal(format!("{:?}", self.phase())).into())
            }

            _ => Err(self.invalid(input)),
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, LookupState::Accept(_) | LookupState::Remove)
    }
}
