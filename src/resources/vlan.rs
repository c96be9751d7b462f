// Copyright (c) 2025 - Cowboy AI, Inc.
//! VLAN adapter

use serde::{Deserialize, Serialize};

use super::require_non_empty;
use crate::domain::VlanId;
use crate::errors::ReconcileResult;
use crate::reconciler::ResourceAdapter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanSpec {
    pub name: String,
    pub id: VlanId,
    /// Reference of the VLAN view or range holding this VLAN
    pub parent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VlanAdapter;

impl ResourceAdapter for VlanAdapter {
    type Spec = VlanSpec;

    fn object_type(&self) -> &str {
        "vlan"
    }

    fn validate(&self, spec: &VlanSpec) -> ReconcileResult<()> {
        require_non_empty(self.object_type(), "name", &spec.name)?;
        require_non_empty(self.object_type(), "parent", &spec.parent)
    }
}
