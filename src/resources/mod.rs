// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Adapters
//!
//! Thin [`ResourceAdapter`](crate::reconciler::ResourceAdapter)
//! implementations, one per managed object type. Each supplies the store
//! object type, a serde specification struct, and validation; attribute
//! reconciliation is shared.
//!
//! | Adapter | Object type |
//! |---|---|
//! | [`NetworkViewAdapter`] | `networkview` |
//! | [`NetworkAdapter`] | `network`, `ipv6network` |
//! | [`VlanAdapter`] | `vlan` |
//! | [`SuperHostAdapter`] | `superhost` |
//! | [`NetworkTemplateAdapter`] | `networktemplate` |

pub mod network;
pub mod network_view;
pub mod superhost;
pub mod template;
pub mod vlan;

pub use network::{IpFamily, NetworkAdapter, NetworkSpec};
pub use network_view::{NetworkViewAdapter, NetworkViewSpec};
pub use superhost::{SuperHostAdapter, SuperHostSpec};
pub use template::{NetworkTemplateAdapter, NetworkTemplateSpec};
pub use vlan::{VlanAdapter, VlanSpec};

use crate::errors::{ReconcileError, ReconcileResult};

pub(crate) fn require_non_empty(object_type: &str, field: &str, value: &str) -> ReconcileResult<()> {
    if value.trim().is_empty() {
        return Err(ReconcileError::InvalidSpec(format!(
            "{}: '{}' must not be empty",
            object_type, field
        )));
    }
    Ok(())
}
