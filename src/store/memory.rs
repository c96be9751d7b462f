// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory object store
//!
//! Mimics the backend behaviors the reconciler has to cope with:
//!
//! - attributes configured per object type are inherited into every created
//!   object, carrying an inheritance marker
//! - update replaces the whole attribute set
//! - objects can be recreated or swapped out of band, changing or reusing
//!   references

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::{object_type_of, AttributeFilter, Fields, ObjectRecord, ObjectStore, SearchOptions};
use crate::attributes::{AttributeMap, AttributeValue};
use crate::errors::{StoreError, StoreResult};

/// A write the store accepted, recorded for inspection
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Create {
        object_type: String,
        attributes: AttributeMap,
    },
    Update {
        reference: String,
        attributes: AttributeMap,
    },
    Delete {
        reference: String,
    },
}

#[derive(Default)]
struct StoreState {
    objects: BTreeMap<String, ObjectRecord>,
    inherited: HashMap<String, AttributeMap>,
    writes: Vec<WriteOp>,
    next_id: u64,
}

impl StoreState {
    fn allocate_reference(&mut self, object_type: &str, fields: &Fields) -> String {
        self.next_id += 1;
        let label = ["name", "network", "fqdn"]
            .iter()
            .find_map(|f| fields.get(*f).and_then(|v| v.as_str()))
            .unwrap_or("object");
        format!("{}/ZG5z{:08x}:{}", object_type, self.next_id, label)
    }
}

/// In-memory [`ObjectStore`] for tests, local demos, and embedding
#[derive(Default)]
pub struct InMemoryObjectStore {
    inner: RwLock<StoreState>,
}

impl InMemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes the server injects into every new object of `object_type`
    pub fn with_inherited(self, object_type: &str, attributes: AttributeMap) -> Self {
        let source = format!("{}/parent:inherited", object_type);
        let marked = attributes
            .into_iter()
            .map(|(k, v)| {
                let value = AttributeValue::inherited(v.value(), source.as_str());
                (k, value)
            })
            .collect();
        if let Ok(mut state) = self.inner.write() {
            state.inherited.insert(object_type.to_string(), marked);
        }
        self
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, StoreState>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Transport("store lock poisoned".to_string()))
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, StoreState>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Transport("store lock poisoned".to_string()))
    }

    /// Current record at `reference`, bypassing the trait
    pub fn get(&self, reference: &str) -> Option<ObjectRecord> {
        self.read_state().ok()?.objects.get(reference).cloned()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.read_state().map(|s| s.objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes accepted so far, oldest first
    pub fn writes(&self) -> Vec<WriteOp> {
        self.read_state().map(|s| s.writes.clone()).unwrap_or_default()
    }

    /// Store a record as-is, replacing whatever is at its reference
    pub fn insert(&self, record: ObjectRecord) -> StoreResult<()> {
        let mut state = self.write_state()?;
        state.objects.insert(record.reference.clone(), record);
        Ok(())
    }

    /// Delete and recreate an object under a new reference, out of band
    pub fn recreate(&self, reference: &str) -> StoreResult<String> {
        let mut state = self.write_state()?;
        let record = state
            .objects
            .remove(reference)
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))?;
        let new_reference = state.allocate_reference(object_type_of(reference), &record.fields);
        state.objects.insert(
            new_reference.clone(),
            ObjectRecord {
                reference: new_reference.clone(),
                ..record
            },
        );
        Ok(new_reference)
    }

    /// Delete an object without recording a write
    pub fn remove_out_of_band(&self, reference: &str) -> StoreResult<Option<ObjectRecord>> {
        Ok(self.write_state()?.objects.remove(reference))
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn create(
        &self,
        object_type: &str,
        attributes: &AttributeMap,
        fields: &Fields,
        _options: &SearchOptions,
    ) -> StoreResult<ObjectRecord> {
        let mut state = self.write_state()?;

        let mut stored = state.inherited.get(object_type).cloned().unwrap_or_default();
        stored.extend(attributes.clone());

        let reference = state.allocate_reference(object_type, fields);
        let record = ObjectRecord::new(reference.clone(), stored, fields.clone());
        state.objects.insert(reference.clone(), record.clone());
        state.writes.push(WriteOp::Create {
            object_type: object_type.to_string(),
            attributes: attributes.clone(),
        });

        debug!("Created {}", reference);
        Ok(record)
    }

    async fn read(&self, reference: &str, _options: &SearchOptions) -> StoreResult<ObjectRecord> {
        self.read_state()?
            .objects
            .get(reference)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))
    }

    async fn update(
        &self,
        reference: &str,
        attributes: &AttributeMap,
        fields: &Fields,
        _options: &SearchOptions,
    ) -> StoreResult<ObjectRecord> {
        let mut state = self.write_state()?;

        let record = state
            .objects
            .get_mut(reference)
            .ok_or_else(|| StoreError::NotFound(reference.to_string()))?;
        record.attributes = attributes.clone();
        for (name, value) in fields {
            record.fields.insert(name.clone(), value.clone());
        }
        let updated = record.clone();

        state.writes.push(WriteOp::Update {
            reference: reference.to_string(),
            attributes: attributes.clone(),
        });

        debug!("Updated {}", reference);
        Ok(updated)
    }

    async fn delete(&self, reference: &str) -> StoreResult<()> {
        let mut state = self.write_state()?;
        if state.objects.remove(reference).is_some() {
            state.writes.push(WriteOp::Delete {
                reference: reference.to_string(),
            });
            debug!("Deleted {}", reference);
        }
        Ok(())
    }

    async fn list(
        &self,
        object_type: &str,
        filter: &AttributeFilter,
        _options: &SearchOptions,
    ) -> StoreResult<Vec<ObjectRecord>> {
        Ok(self
            .read_state()?
            .objects
            .values()
            .filter(|r| object_type_of(&r.reference) == object_type && r.matches(filter))
            .cloned()
            .collect())
    }
}
