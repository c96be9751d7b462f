// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-ipam
//!
//! Deterministic tracking values, timestamps, records, and stores shared by
//! the integration tests. Nothing here calls `Uuid::now_v7()` or `Utc::now()`.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use cim_ipam::attributes::AttributeMap;
use cim_ipam::errors::{StoreError, StoreResult};
use cim_ipam::reconciler::{ResourcePlan, ResourceState};
use cim_ipam::resources::NetworkSpec;
use cim_ipam::store::{
    AttributeFilter, Fields, InMemoryObjectStore, ObjectRecord, ObjectStore, SearchOptions,
};
use cim_ipam::tracking::TRACKING_ATTRIBUTE;

// Fixed tracking values (UUID v7 format, but deterministic for testing)
pub const TRACKING_ID_1: &str = "01934f4a-0001-7000-8000-000000000001";
pub const TRACKING_ID_2: &str = "01934f4a-0002-7000-8000-000000000002";

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

pub const NETWORK: &str = "10.0.0.0/24";

pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

/// Store that injects `Region=US-East` into every new network
pub fn inheriting_store() -> InMemoryObjectStore {
    InMemoryObjectStore::new()
        .with_inherited("network", AttributeMap::from([("Region", "US-East")]))
}

pub fn network_plan(network: &str, attrs: &[(&str, &str)]) -> ResourcePlan<NetworkSpec> {
    ResourcePlan::new(NetworkSpec::new(network)).with_ext_attrs(attrs.iter().copied().collect())
}

pub fn network_fields(network: &str) -> Fields {
    json!({ "network_view": "default", "network": network })
        .as_object()
        .cloned()
        .expect("fixture fields are an object")
}

/// A network record carrying `tracking_id` plus `attrs`
pub fn tracked_record(reference: &str, tracking_id: &str, attrs: &[(&str, &str)]) -> ObjectRecord {
    let mut attributes: AttributeMap = attrs.iter().copied().collect();
    attributes.insert(TRACKING_ATTRIBUTE, tracking_id);
    ObjectRecord::new(reference, attributes, network_fields(NETWORK))
}

/// Persisted state for `reference`; `tracking_id` of `None` models legacy state
pub fn persisted_state(reference: &str, tracking_id: Option<&str>) -> ResourceState<NetworkSpec> {
    let mut full = AttributeMap::from([("Site", "NY")]);
    if let Some(id) = tracking_id {
        full.insert(TRACKING_ATTRIBUTE, id);
    }
    ResourceState {
        reference: reference.to_string(),
        spec: NetworkSpec::new(NETWORK),
        ext_attrs: AttributeMap::from([("Site", "NY")]),
        ext_attrs_all: full,
        observed_at: fixed_timestamp(),
    }
}

/// Wraps an in-memory store, fails reads with a transport error on demand,
/// and remembers the options of every call
pub struct FlakyStore {
    pub inner: InMemoryObjectStore,
    fail_reads: AtomicBool,
    seen_options: Mutex<Vec<SearchOptions>>,
}

impl FlakyStore {
    pub fn new(inner: InMemoryObjectStore) -> Self {
        Self {
            inner,
            fail_reads: AtomicBool::new(false),
            seen_options: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_reads(&self, enabled: bool) {
        self.fail_reads.store(enabled, Ordering::SeqCst);
    }

    /// Options passed to create, read, update, and list, oldest first
    pub fn seen_options(&self) -> Vec<SearchOptions> {
        self.seen_options.lock().expect("options lock").clone()
    }

    fn observe(&self, options: &SearchOptions) {
        self.seen_options.lock().expect("options lock").push(options.clone());
    }
}

#[async_trait]
impl ObjectStore for FlakyStore {
    async fn create(
        &self,
        object_type: &str,
        attributes: &AttributeMap,
        fields: &Fields,
        options: &SearchOptions,
    ) -> StoreResult<ObjectRecord> {
        self.observe(options);
        self.inner.create(object_type, attributes, fields, options).await
    }

    async fn read(&self, reference: &str, options: &SearchOptions) -> StoreResult<ObjectRecord> {
        self.observe(options);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Transport("connection reset by peer".to_string()));
        }
        self.inner.read(reference, options).await
    }

    async fn update(
        &self,
        reference: &str,
        attributes: &AttributeMap,
        fields: &Fields,
        options: &SearchOptions,
    ) -> StoreResult<ObjectRecord> {
        self.observe(options);
        self.inner.update(reference, attributes, fields, options).await
    }

    async fn delete(&self, reference: &str) -> StoreResult<()> {
        self.inner.delete(reference).await
    }

    async fn list(
        &self,
        object_type: &str,
        filter: &AttributeFilter,
        options: &SearchOptions,
    ) -> StoreResult<Vec<ObjectRecord>> {
        self.observe(options);
        self.inner.list(object_type, filter, options).await
    }
}
