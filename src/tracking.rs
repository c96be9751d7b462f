// Copyright (c) 2025 - Cowboy AI, Inc.
//! Internal-ID Injection
//!
//! Every resource instance is tagged with a provider-generated tracking value
//! stored under [`TRACKING_ATTRIBUTE`]. The value is set once, immediately
//! before the first create, and never changes afterwards. It lets a later
//! read re-identify the object even when its reference has been reassigned.

use tracing::debug;
use uuid::Uuid;

use crate::attributes::AttributeMap;
use crate::errors::{ReconcileError, ReconcileResult};

/// Reserved attribute key holding the tracking value
pub const TRACKING_ATTRIBUTE: &str = "Terraform Internal ID";

/// Generate a fresh tracking value
pub fn new_tracking_id() -> String {
    Uuid::now_v7().to_string()
}

/// Tracking value carried by `attributes`, if present and not blank
///
/// The value is returned byte-for-byte. Identity checks and tracking-value
/// searches compare it exactly, so it is never trimmed.
pub fn tracking_id(attributes: &AttributeMap) -> Option<&str> {
    attributes
        .value(TRACKING_ATTRIBUTE)
        .filter(|v| !v.trim().is_empty())
}

/// Ensure `declared` carries a tracking value
///
/// An existing value is left untouched, so injecting twice is a no-op.
pub fn inject(mut declared: AttributeMap) -> AttributeMap {
    if tracking_id(&declared).is_none() {
        let id = new_tracking_id();
        debug!("Injecting tracking value {}", id);
        declared.insert(TRACKING_ATTRIBUTE, id);
    }
    declared
}

/// Set the tracking value to `expected`
///
/// Fails with [`ReconcileError::TrackingIdConflict`] if the map already
/// holds any other value, including one that differs only in whitespace.
/// A blank value is replaced.
pub fn ensure_tracking_id(
    mut declared: AttributeMap,
    expected: &str,
) -> ReconcileResult<AttributeMap> {
    match tracking_id(&declared) {
        Some(existing) if existing == expected => Ok(declared),
        Some(existing) => Err(ReconcileError::TrackingIdConflict {
            existing: existing.to_string(),
            requested: expected.to_string(),
        }),
        None => {
            declared.insert(TRACKING_ATTRIBUTE, expected);
            Ok(declared)
        }
    }
}
