// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Value Objects with Validation Invariants

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use thiserror::Error;

/// Network validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Address part does not parse
    #[error("Invalid IP address format: {0}")]
    InvalidIpAddress(String),

    /// Prefix missing or not a number
    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    /// Prefix longer than the address family allows
    #[error("Invalid prefix length: {0} (must be 0-32 for IPv4, 0-128 for IPv6)")]
    InvalidPrefixLength(u8),

    /// Network given with bits set past the prefix
    #[error("Host bits set in network address: {0}")]
    HostBitsSet(String),

    /// VLAN ID outside 1-4094
    #[error("Invalid VLAN ID: {0} (must be 1-4094)")]
    InvalidVlanId(u16),
}

/// IP Address with CIDR notation value object
///
/// Represents an IPv4 or IPv6 address with optional prefix length.
/// Invariants:
/// - Valid IP address format
/// - Prefix length within valid range
/// - Canonical representation
///
/// # Examples
///
/// ```rust
/// use cim_ipam::domain::IpAddressWithCidr;
///
/// let ip = IpAddressWithCidr::new("192.168.1.10/24").unwrap();
/// assert_eq!(ip.address().to_string(), "192.168.1.10");
/// assert_eq!(ip.prefix_length(), Some(24));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpAddressWithCidr {
    address: IpAddr,
    prefix_length: Option<u8>,
}

fn max_prefix(address: &IpAddr) -> u8 {
    match address {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

impl IpAddressWithCidr {
    /// Create a new IP address with optional CIDR notation
    ///
    /// # Invariants
    /// - Valid IP address format
    /// - Prefix length 0-32 for IPv4, 0-128 for IPv6
    pub fn new(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref();

        if let Some((addr_str, prefix_str)) = cidr.split_once('/') {
            let address = IpAddr::from_str(addr_str)
                .map_err(|_| NetworkError::InvalidIpAddress(addr_str.to_string()))?;

            let prefix_length = prefix_str
                .parse::<u8>()
                .map_err(|_| NetworkError::InvalidCidr(cidr.to_string()))?;

            Self::from_parts(address, Some(prefix_length))
        } else {
            let address = IpAddr::from_str(cidr)
                .map_err(|_| NetworkError::InvalidIpAddress(cidr.to_string()))?;

            Ok(Self {
                address,
                prefix_length: None,
            })
        }
    }

    /// Parse a network in CIDR notation: prefix required, host bits clear
    pub fn network(cidr: impl AsRef<str>) -> Result<Self, NetworkError> {
        let cidr = cidr.as_ref();
        let parsed = Self::new(cidr)?;
        if parsed.prefix_length.is_none() {
            return Err(NetworkError::InvalidCidr(cidr.to_string()));
        }
        if !parsed.is_network_address() {
            return Err(NetworkError::HostBitsSet(cidr.to_string()));
        }
        Ok(parsed)
    }

    /// Create from separate address and prefix
    pub fn from_parts(address: IpAddr, prefix_length: Option<u8>) -> Result<Self, NetworkError> {
        if let Some(prefix) = prefix_length {
            if prefix > max_prefix(&address) {
                return Err(NetworkError::InvalidPrefixLength(prefix));
            }
        }

        Ok(Self {
            address,
            prefix_length,
        })
    }

    /// Get the IP address
    pub fn address(&self) -> IpAddr {
        self.address
    }

    /// Get the prefix length
    pub fn prefix_length(&self) -> Option<u8> {
        self.prefix_length
    }

    /// Check if this is an IPv4 address
    pub fn is_ipv4(&self) -> bool {
        matches!(self.address, IpAddr::V4(_))
    }

    /// Check if this is an IPv6 address
    pub fn is_ipv6(&self) -> bool {
        matches!(self.address, IpAddr::V6(_))
    }

    /// Whether all bits past the prefix are zero
    ///
    /// An address without a prefix is a host, never a network.
    pub fn is_network_address(&self) -> bool {
        let Some(prefix) = self.prefix_length else {
            return false;
        };
        match self.address {
            IpAddr::V4(v4) => {
                let bits = u32::from(v4);
                let host_mask = u32::MAX.checked_shr(u32::from(prefix)).unwrap_or(0);
                bits & host_mask == 0
            }
            IpAddr::V6(v6) => {
                let bits = u128::from(v6);
                let host_mask = u128::MAX.checked_shr(u32::from(prefix)).unwrap_or(0);
                bits & host_mask == 0
            }
        }
    }

    /// Get as CIDR notation string
    pub fn as_cidr(&self) -> String {
        if let Some(prefix) = self.prefix_length {
            format!("{}/{}", self.address, prefix)
        } else {
            self.address.to_string()
        }
    }
}

impl fmt::Display for IpAddressWithCidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_cidr())
    }
}

impl FromStr for IpAddressWithCidr {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// VLAN ID value object
///
/// Represents a VLAN ID (IEEE 802.1Q) with validation.
/// Invariants:
/// - Valid VLAN ID range (1-4094)
/// - VLAN 0 and 4095 are reserved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct VlanId(u16);

impl VlanId {
    /// Minimum valid VLAN ID
    pub const MIN: u16 = 1;

    /// Maximum valid VLAN ID
    pub const MAX: u16 = 4094;

    /// Create a new VLAN ID with validation
    ///
    /// # Invariants
    /// - ID in range 1-4094
    pub fn new(id: u16) -> Result<Self, NetworkError> {
        if !(Self::MIN..=Self::MAX).contains(&id) {
            return Err(NetworkError::InvalidVlanId(id));
        }

        Ok(Self(id))
    }

    /// Get the VLAN ID value
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u16> for VlanId {
    type Error = NetworkError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<VlanId> for u16 {
    fn from(id: VlanId) -> Self {
        id.0
    }
}
