// Copyright (c) 2025 - Cowboy AI, Inc.
//! IPv4 / IPv6 network adapter

use serde::{Deserialize, Serialize};

use crate::domain::IpAddressWithCidr;
use crate::errors::{ReconcileError, ReconcileResult};
use crate::reconciler::ResourceAdapter;

fn default_view() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    #[serde(default = "default_view")]
    pub network_view: String,
    /// Network in CIDR notation
    pub network: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl NetworkSpec {
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network_view: default_view(),
            network: network.into(),
            comment: None,
        }
    }

    pub fn in_view(mut self, view: impl Into<String>) -> Self {
        self.network_view = view.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpFamily {
    V4,
    V6,
}

#[derive(Debug, Clone, Copy)]
pub struct NetworkAdapter {
    family: IpFamily,
}

impl NetworkAdapter {
    pub fn ipv4() -> Self {
        Self {
            family: IpFamily::V4,
        }
    }

    pub fn ipv6() -> Self {
        Self {
            family: IpFamily::V6,
        }
    }

    pub fn family(&self) -> IpFamily {
        self.family
    }
}

impl ResourceAdapter for NetworkAdapter {
    type Spec = NetworkSpec;

    fn object_type(&self) -> &str {
        match self.family {
            IpFamily::V4 => "network",
            IpFamily::V6 => "ipv6network",
        }
    }

    fn validate(&self, spec: &NetworkSpec) -> ReconcileResult<()> {
        let cidr = IpAddressWithCidr::network(&spec.network)?;
        let family_matches = match self.family {
            IpFamily::V4 => cidr.is_ipv4(),
            IpFamily::V6 => cidr.is_ipv6(),
        };
        if !family_matches {
            return Err(ReconcileError::InvalidSpec(format!(
                "{} is not a valid {} network",
                spec.network,
                self.object_type()
            )));
        }
        Ok(())
    }
}
