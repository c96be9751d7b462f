// Copyright (c) 2025 - Cowboy AI, Inc.
//! Super host adapter

use serde::{Deserialize, Serialize};

use super::require_non_empty;
use crate::errors::ReconcileResult;
use crate::reconciler::ResourceAdapter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperHostSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SuperHostAdapter;

impl ResourceAdapter for SuperHostAdapter {
    type Spec = SuperHostSpec;

    fn object_type(&self) -> &str {
        "superhost"
    }

    fn return_fields(&self) -> &[&str] {
        &["disabled"]
    }

    fn validate(&self, spec: &SuperHostSpec) -> ReconcileResult<()> {
        require_non_empty(self.object_type(), "name", &spec.name)
    }
}
