// Copyright (c) 2025 - Cowboy AI, Inc.
//! IPAM Value Objects
//!
//! Validated value objects used by resource adapters before a request is
//! sent to the object store.
//!
//! - [`IpAddressWithCidr`] - IPv4/IPv6 with CIDR notation
//! - [`VlanId`] - IEEE 802.1Q VLAN ID (1-4094)

pub mod network;

pub use network::{IpAddressWithCidr, NetworkError, VlanId};
