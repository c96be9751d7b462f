// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Identity Lookup Machine
//!
//! The machine is pure, so every path can be checked without a store.

use cim_ipam::attributes::AttributeMap;
use cim_ipam::errors::ReconcileError;
use cim_ipam::state_machine::{LookupInput, LookupState, StateMachine};
use cim_ipam::store::{Fields, ObjectRecord};
use cim_ipam::tracking::TRACKING_ATTRIBUTE;
use proptest::prelude::*;

fn record(reference: &str, id: &str) -> ObjectRecord {
    ObjectRecord::new(
        reference,
        AttributeMap::from([(TRACKING_ATTRIBUTE, id)]),
        Fields::new(),
    )
}

fn persisted(id: &str) -> AttributeMap {
    AttributeMap::from([("Site", "NY"), (TRACKING_ATTRIBUTE, id)])
}

/// Feed inputs until the machine stops, or fail on the first error
fn run(mut state: LookupState, inputs: Vec<LookupInput>) -> Result<LookupState, ReconcileError> {
    for input in inputs {
        if state.is_terminal() {
            break;
        }
        state = state.transition(&input)?.0;
    }
    Ok(state)
}

proptest! {
    /// A resolving reference holding our tracking value is accepted as-is
    #[test]
    fn prop_verified_reference_is_accepted(id in "[a-f0-9]{12}") {
        let found = record("network/abc", &id);
        let end = run(
            LookupState::start("network/abc", &persisted(&id)),
            vec![LookupInput::Found(found.clone()), LookupInput::Check],
        )
        .unwrap();

        prop_assert_eq!(end, LookupState::Accept(found));
    }

    /// A reference holding someone else's tracking value is never accepted
    #[test]
    fn prop_stranger_is_never_accepted(
        ours in "[a-f0-9]{12}",
        theirs in "[a-f0-9]{12}",
    ) {
        prop_assume!(ours != theirs);

        let end = run(
            LookupState::start("network/abc", &persisted(&ours)),
            vec![
                LookupInput::Found(record("network/abc", &theirs)),
                LookupInput::Check,
                LookupInput::Matches(vec![record("network/abc", &theirs)]),
            ],
        )
        .unwrap();

        prop_assert_eq!(end, LookupState::Remove);
    }

    /// Fallback outcome depends only on how many records carry our value
    #[test]
    fn prop_fallback_counts_our_matches(
        id in "[a-f0-9]{12}",
        ours in 0usize..4,
        strangers in 0usize..4,
    ) {
        let mut records: Vec<ObjectRecord> = (0..ours)
            .map(|i| record(&format!("network/ours{}", i), &id))
            .collect();
        records.extend((0..strangers).map(|i| record(&format!("network/other{}", i), "other")));

        let result = run(
            LookupState::start("network/gone", &persisted(&id)),
            vec![LookupInput::NotFound, LookupInput::Matches(records)],
        );

        match ours {
            0 => prop_assert_eq!(result.unwrap(), LookupState::Remove),
            1 => prop_assert_eq!(
                result.unwrap(),
                LookupState::Accept(record("network/ours0", &id))
            ),
            n => prop_assert!(matches!(
                result,
                Err(ReconcileError::AmbiguousIdentity { matches, .. }) if matches == n
            ), "expected AmbiguousIdentity with {} matches, got {:?}", n, result),
        }
    }
}
