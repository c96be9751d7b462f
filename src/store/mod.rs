// Copyright (c) 2025 - Cowboy AI, Inc.
//! Object Store Abstraction
//!
//! The reconciliation layer talks to the IPAM backend exclusively through the
//! [`ObjectStore`] trait: create, read, update, delete and filtered list over
//! opaque records. Each record carries a reference (the store's primary key),
//! a flat attribute map, and resource-specific fields.
//!
//! # Implementations
//!
//! - [`InMemoryObjectStore`] for tests, demos and embedding
//! - `WapiObjectStore` for an Infoblox-style WAPI REST backend
//!   (`wapi` feature)
//!
//! # Semantics
//!
//! - `update` replaces the *entire* attribute set; omitting a key deletes it
//! - `read` fails with [`StoreError::NotFound`] once a reference no longer
//!   resolves
//! - `delete` treats a missing object as success
//!
//! [`StoreError::NotFound`]: crate::errors::StoreError::NotFound

pub mod memory;
#[cfg(feature = "wapi")]
pub mod wapi;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::attributes::AttributeMap;
use crate::errors::StoreResult;

pub use memory::InMemoryObjectStore;
#[cfg(feature = "wapi")]
pub use wapi::WapiObjectStore;

/// Resource-specific fields of a record, keyed by field name
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Attribute name → required value
pub type AttributeFilter = BTreeMap<String, String>;

/// A record as held by the object store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    /// Primary key; may change if the object is recreated
    pub reference: String,

    /// Complete extensible attribute set
    #[serde(default)]
    pub attributes: AttributeMap,

    /// Everything else
    #[serde(default)]
    pub fields: Fields,
}

impl ObjectRecord {
    /// Build a record from its parts
    pub fn new(reference: impl Into<String>, attributes: AttributeMap, fields: Fields) -> Self {
        Self {
            reference: reference.into(),
            attributes,
            fields,
        }
    }

    /// Whether every filter entry matches an attribute value exactly
    pub fn matches(&self, filter: &AttributeFilter) -> bool {
        filter
            .iter()
            .all(|(name, value)| self.attributes.value(name) == Some(value.as_str()))
    }
}

/// Options threaded into every store call that returns records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Ask the grid master to answer on behalf of members
    pub proxy_search: bool,

    /// Fields to return beyond the object's basic fields
    #[serde(default)]
    pub return_fields: Vec<String>,
}

impl SearchOptions {
    /// Enable or disable proxy search
    pub fn with_proxy_search(mut self, enabled: bool) -> Self {
        self.proxy_search = enabled;
        self
    }

    /// Request `fields` in addition to any already requested
    pub fn with_return_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        for field in fields {
            let field = field.into();
            if !self.return_fields.contains(&field) {
                self.return_fields.push(field);
            }
        }
        self
    }
}

/// Object store capability consumed by the reconciler
///
/// Implementations must be safe to share between resource instances; the
/// reconciler itself holds no mutable state.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create an object of `object_type`
    async fn create(
        &self,
        object_type: &str,
        attributes: &AttributeMap,
        fields: &Fields,
        options: &SearchOptions,
    ) -> StoreResult<ObjectRecord>;

    /// Read an object by reference
    async fn read(&self, reference: &str, options: &SearchOptions) -> StoreResult<ObjectRecord>;

    /// Replace an object's attribute set and update its fields
    async fn update(
        &self,
        reference: &str,
        attributes: &AttributeMap,
        fields: &Fields,
        options: &SearchOptions,
    ) -> StoreResult<ObjectRecord>;

    /// Delete an object; a missing object is not an error
    async fn delete(&self, reference: &str) -> StoreResult<()>;

    /// List objects of `object_type` whose attributes match `filter`
    async fn list(
        &self,
        object_type: &str,
        filter: &AttributeFilter,
        options: &SearchOptions,
    ) -> StoreResult<Vec<ObjectRecord>>;
}

/// Object type encoded in a reference (`network/ZG5z...:10.0.0.0/24/default`)
pub fn object_type_of(reference: &str) -> &str {
    reference.split('/').next().unwrap_or(reference)
}
