// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Attribute Reconciliation
//!
//! split / merge / merge_for_update and tracking-value injection over
//! arbitrary attribute maps.

use cim_ipam::attributes::{AttributeMap, AttributeValue};
use cim_ipam::inheritance::{merge, merge_for_update, split};
use cim_ipam::tracking::{inject, tracking_id, TRACKING_ATTRIBUTE};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn attribute_map() -> impl Strategy<Value = AttributeMap> {
    prop::collection::btree_map("[A-Z][a-z]{1,8}", "[a-zA-Z0-9 ]{1,12}", 0..6)
        .prop_map(AttributeMap::from)
}

/// Attributes the server injects from parent scopes
fn inherited_map() -> impl Strategy<Value = AttributeMap> {
    attribute_map().prop_map(|map| {
        map.into_iter()
            .map(|(k, v)| (k, AttributeValue::inherited(v.value(), "networkview/parent")))
            .collect()
    })
}

/// What the server returns after storing `declared` under `inherited`
fn server_view(declared: &AttributeMap, inherited: &AttributeMap) -> AttributeMap {
    let mut full = inherited.clone();
    full.extend(declared.clone());
    full
}

// ============================================================================
// split
// ============================================================================

proptest! {
    /// Declared attributes come back unchanged: no drift
    #[test]
    fn prop_split_reproduces_declared(
        declared in attribute_map(),
        inherited in inherited_map(),
    ) {
        let server = server_view(&declared, &inherited);
        let parts = split(&declared, &server);

        prop_assert!(parts.user_visible.values_equal(&declared));
    }

    /// The full set is the server's set, nothing dropped or invented
    #[test]
    fn prop_split_keeps_server_view(
        declared in attribute_map(),
        inherited in inherited_map(),
    ) {
        let server = server_view(&declared, &inherited);
        let parts = split(&declared, &server);

        prop_assert_eq!(&parts.full, &server);
        for key in parts.user_visible.keys() {
            prop_assert!(server.contains_key(key));
        }
    }

    /// Inherited-only keys never leak into the declared view
    #[test]
    fn prop_split_hides_undeclared(
        declared in attribute_map(),
        inherited in inherited_map(),
    ) {
        let server = server_view(&declared, &inherited);
        let parts = split(&declared, &server);

        for key in inherited.keys().filter(|k| !declared.contains_key(k)) {
            prop_assert!(!parts.user_visible.contains_key(key));
        }
    }
}

// ============================================================================
// merge
// ============================================================================

proptest! {
    /// Every previously observed key survives, declared values win
    #[test]
    fn prop_merge_preserves_previous_keys(
        declared in attribute_map(),
        previous in attribute_map(),
    ) {
        let merged = merge(&declared, &previous);

        for key in previous.keys() {
            prop_assert!(merged.contains_key(key));
        }
        for (key, value) in &declared {
            prop_assert_eq!(merged.value(key), Some(value.value()));
        }
        for (key, value) in &previous {
            if !declared.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    /// Removed declarations are dropped, the tracking value always stays
    #[test]
    fn prop_merge_for_update_honors_removals(
        previously_declared in attribute_map(),
        newly_declared in attribute_map(),
        inherited in inherited_map(),
    ) {
        let previous_full = inject(server_view(&previously_declared, &inherited));
        let outgoing = merge_for_update(&newly_declared, &previous_full, &previously_declared);

        for key in previously_declared.keys() {
            if !newly_declared.contains_key(key) {
                prop_assert!(!outgoing.contains_key(key));
            }
        }
        prop_assert_eq!(tracking_id(&outgoing), tracking_id(&previous_full));
        for key in newly_declared.keys() {
            prop_assert!(outgoing.contains_key(key));
        }
    }

    /// An update followed by a read reproduces the new declaration
    #[test]
    fn prop_update_round_trip_has_no_drift(
        previously_declared in attribute_map(),
        newly_declared in attribute_map(),
        inherited in inherited_map(),
    ) {
        let previous_full = inject(server_view(&previously_declared, &inherited));
        let outgoing = merge_for_update(&newly_declared, &previous_full, &previously_declared);
        let parts = split(&newly_declared, &outgoing);

        prop_assert!(parts.user_visible.values_equal(&newly_declared));
    }
}

// ============================================================================
// Tracking value
// ============================================================================

proptest! {
    /// Injection adds exactly one attribute and never touches the others
    #[test]
    fn prop_inject_adds_single_tracking_value(declared in attribute_map()) {
        let injected = inject(declared.clone());

        prop_assert_eq!(injected.len(), declared.len() + 1);
        prop_assert!(tracking_id(&injected).is_some());
        for (key, value) in &declared {
            prop_assert_eq!(injected.get(key), Some(value));
        }
    }

    /// An existing tracking value is never replaced
    #[test]
    fn prop_inject_is_idempotent(declared in attribute_map(), id in "[a-f0-9]{8}") {
        let mut tagged = declared;
        tagged.insert(TRACKING_ATTRIBUTE, id.as_str());

        let injected = inject(tagged.clone());
        prop_assert_eq!(&injected, &tagged);
        prop_assert_eq!(tracking_id(&injected), Some(id.as_str()));
    }
}
