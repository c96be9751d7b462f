// Copyright (c) 2025 - Cowboy AI, Inc.
//! Inherited Attribute Reconciliation
//!
//! The object store injects attributes inherited from parent scopes, and it
//! replaces the whole attribute set on every write. Two pure functions keep
//! the declared view drift-free without losing inherited values:
//!
//! ```text
//!   after a round trip         before an update
//!   ──────────────────         ────────────────
//!   split(declared, server)    merge(declared, full)
//!     user_visible ⊆ server      declared ∪ (full \ declared)
//!     full = server
//! ```

use std::collections::BTreeSet;

use tracing::warn;

use crate::attributes::AttributeMap;
use crate::tracking::TRACKING_ATTRIBUTE;

/// The two attribute sets persisted after a round trip
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitAttributes {
    /// Server values for the keys the user declared
    pub user_visible: AttributeMap,
    /// Everything the server returned
    pub full: AttributeMap,
}

/// Partition the server's attribute set into the user-visible subset and the
/// full set
///
/// Values come from `server_full`, since the server may normalize them. A
/// declared key the server does not hold is dropped rather than fabricated.
pub fn split(declared: &AttributeMap, server_full: &AttributeMap) -> SplitAttributes {
    let user_visible = server_full
        .iter()
        .filter(|(name, _)| declared.contains_key(name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect();

    SplitAttributes {
        user_visible,
        full: server_full.clone(),
    }
}

/// Re-inject previously observed attributes that are not currently declared
///
/// Declared values win on collision.
pub fn merge(newly_declared: &AttributeMap, previous_full: &AttributeMap) -> AttributeMap {
    merge_for_update(newly_declared, previous_full, &AttributeMap::new())
}

/// Build the outgoing attribute set for an update
///
/// Like [`merge`], but keys the user declared at the last observation and
/// has since removed are not carried forward, so removing an attribute from
/// configuration deletes it. The tracking attribute is always carried.
pub fn merge_for_update(
    newly_declared: &AttributeMap,
    previous_full: &AttributeMap,
    previously_declared: &AttributeMap,
) -> AttributeMap {
    if previous_full.is_empty() {
        warn!(
            "No previously observed attributes; inherited attributes may be dropped by this update"
        );
    }

    let dropped: BTreeSet<&str> = previously_declared
        .keys()
        .filter(|k| *k != TRACKING_ATTRIBUTE && !newly_declared.contains_key(k))
        .collect();

    let mut outgoing = newly_declared.clone();
    for (name, value) in previous_full {
        if newly_declared.contains_key(name) || dropped.contains(name.as_str()) {
            continue;
        }
        outgoing.insert(name.clone(), value.clone());
    }
    outgoing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeValue;

    fn server_response() -> AttributeMap {
        AttributeMap::from([
            ("Site", "NY"),
            ("Region", "US-East"),
            (TRACKING_ATTRIBUTE, "abc123"),
        ])
    }

    #[test]
    fn test_split_create_scenario() {
        let declared = AttributeMap::from([("Site", "NY")]);
        let split = split(&declared, &server_response());

        assert_eq!(split.user_visible, AttributeMap::from([("Site", "NY")]));
        assert_eq!(split.full, server_response());
    }

    #[test]
    fn test_split_takes_server_values() {
        let declared = AttributeMap::from([("Site", "ny ")]);
        let split = split(&declared, &server_response());
        assert_eq!(split.user_visible.value("Site"), Some("NY"));
    }

    #[test]
    fn test_split_drops_keys_missing_on_server() {
        let declared = AttributeMap::from([("Site", "NY"), ("Owner", "netops")]);
        let split = split(&declared, &server_response());
        assert!(!split.user_visible.contains_key("Owner"));
        assert_eq!(split.user_visible.len(), 1);
    }

    #[test]
    fn test_split_empty_declared_keeps_full() {
        let split = split(&AttributeMap::new(), &server_response());
        assert!(split.user_visible.is_empty());
        assert_eq!(split.full.len(), 3);
    }

    #[test]
    fn test_split_keeps_inheritance_markers() {
        let mut server = AttributeMap::new();
        server.insert("Region", AttributeValue::inherited("US-East", "networkview/abc"));
        let declared = AttributeMap::from([("Region", "US-East")]);

        let split = split(&declared, &server);
        assert!(split.user_visible.get("Region").unwrap().is_inherited());
    }

    #[test]
    fn test_merge_declared_wins() {
        let full = AttributeMap::from([("a", "1"), ("b", "2")]);
        let declared = AttributeMap::from([("a", "9")]);
        assert_eq!(
            merge(&declared, &full),
            AttributeMap::from([("a", "9"), ("b", "2")])
        );
    }

    #[test]
    fn test_merge_update_scenario() {
        let declared = AttributeMap::from([("Site", "Boston")]);
        assert_eq!(
            merge(&declared, &server_response()),
            AttributeMap::from([
                ("Site", "Boston"),
                ("Region", "US-East"),
                (TRACKING_ATTRIBUTE, "abc123"),
            ])
        );
    }

    #[test]
    fn test_merge_empty_previous_degrades_to_declared() {
        let declared = AttributeMap::from([("Site", "Boston")]);
        assert_eq!(merge(&declared, &AttributeMap::new()), declared);
    }

    #[test]
    fn test_merge_for_update_drops_removed_declarations() {
        let previously_declared = AttributeMap::from([("Site", "NY"), ("Owner", "netops")]);
        let mut full = server_response();
        full.insert("Owner", "netops");
        let declared = AttributeMap::from([("Site", "Boston")]);

        let outgoing = merge_for_update(&declared, &full, &previously_declared);
        assert_eq!(
            outgoing,
            AttributeMap::from([
                ("Site", "Boston"),
                ("Region", "US-East"),
                (TRACKING_ATTRIBUTE, "abc123"),
            ])
        );
    }

    #[test]
    fn test_merge_for_update_always_carries_tracking_value() {
        let previously_declared = AttributeMap::from([(TRACKING_ATTRIBUTE, "abc123")]);
        let outgoing = merge_for_update(
            &AttributeMap::new(),
            &server_response(),
            &previously_declared,
        );
        assert_eq!(outgoing.value(TRACKING_ATTRIBUTE), Some("abc123"));
    }
}
