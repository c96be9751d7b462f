// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network view adapter

use serde::{Deserialize, Serialize};

use super::require_non_empty;
use crate::errors::ReconcileResult;
use crate::reconciler::ResourceAdapter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkViewSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NetworkViewSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkViewAdapter;

impl ResourceAdapter for NetworkViewAdapter {
    type Spec = NetworkViewSpec;

    fn object_type(&self) -> &str {
        "networkview"
    }

    fn validate(&self, spec: &NetworkViewSpec) -> ReconcileResult<()> {
        require_non_empty(self.object_type(), "name", &spec.name)
    }
}
