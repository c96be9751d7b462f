// Copyright (c) 2025 - Cowboy AI, Inc.
//! IPv4 network template adapter

use serde::{Deserialize, Serialize};

use super::require_non_empty;
use crate::domain::NetworkError;
use crate::errors::ReconcileResult;
use crate::reconciler::ResourceAdapter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkTemplateSpec {
    pub name: String,
    /// Prefix length of networks created from this template
    pub netmask: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkTemplateAdapter;

impl ResourceAdapter for NetworkTemplateAdapter {
    type Spec = NetworkTemplateSpec;

    fn object_type(&self) -> &str {
        "networktemplate"
    }

    fn return_fields(&self) -> &[&str] {
        &["netmask"]
    }

    fn validate(&self, spec: &NetworkTemplateSpec) -> ReconcileResult<()> {
        require_non_empty(self.object_type(), "name", &spec.name)?;
        if !(1..=32).contains(&spec.netmask) {
            return Err(NetworkError::InvalidPrefixLength(spec.netmask).into());
        }
        Ok(())
    }
}
