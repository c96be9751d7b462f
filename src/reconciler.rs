// Copyright (c) 2025 - Cowboy AI, Inc.
//! Generic Resource Reconciler
//!
//! One reconciliation component serves every resource type. A thin
//! [`ResourceAdapter`] supplies the object type and the mapping between the
//! typed resource specification and the store's field map; everything
//! attribute related is handled here.
//!
//! # Data Flow
//!
//! ```text
//! create: inject ─▶ store.create ─▶ split ─▶ state
//! read:   resolve (verify / fallback) ─▶ split ─▶ state | removed
//! update: merge ─▶ store.update ─▶ split ─▶ state
//! delete: store.delete (missing is fine)
//! import: store.read ─▶ [inject + store.update] ─▶ split ─▶ state
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cim_ipam::attributes::AttributeMap;
//! use cim_ipam::reconciler::{ResourcePlan, ResourceReconciler};
//! use cim_ipam::resources::{NetworkViewAdapter, NetworkViewSpec};
//! use cim_ipam::store::InMemoryObjectStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryObjectStore::new());
//!     let views = ResourceReconciler::new(store, NetworkViewAdapter);
//!
//!     let plan = ResourcePlan::new(NetworkViewSpec::named("lab"))
//!         .with_ext_attrs(AttributeMap::from([("Site", "NY")]));
//!     let state = views.create(&plan).await?;
//!     let refreshed = views.read(&state).await?;
//!
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::attributes::{codec, AttributeMap};
use crate::errors::{ReconcileError, ReconcileResult};
use crate::identity::{resolve, IdentityOutcome};
use crate::inheritance::{merge_for_update, split};
use crate::store::{Fields, ObjectRecord, ObjectStore, SearchOptions};
use crate::tracking::{ensure_tracking_id, inject, tracking_id};

/// Per-resource mapping between a typed specification and store fields
///
/// The default `expand`/`flatten` go through serde; adapters usually only
/// provide `object_type` and, where needed, `validate`.
pub trait ResourceAdapter: Send + Sync {
    /// Typed resource fields as seen by the declarative model
    type Spec: Serialize + DeserializeOwned + Clone + Debug + PartialEq + Send + Sync;

    /// Store object type (e.g. `network`, `networkview`)
    fn object_type(&self) -> &str;

    /// Fields `flatten` needs that the store does not return by default
    fn return_fields(&self) -> &[&str] {
        &[]
    }

    /// Reject specifications the store would refuse
    fn validate(&self, _spec: &Self::Spec) -> ReconcileResult<()> {
        Ok(())
    }

    /// Specification → store fields
    fn expand(&self, spec: &Self::Spec) -> ReconcileResult<Fields> {
        self.validate(spec)?;
        match serde_json::to_value(spec)? {
            Value::Object(fields) => Ok(fields),
            other => Err(ReconcileError::InvalidSpec(format!(
                "{} specification must be an object, got {}",
                self.object_type(),
                other
            ))),
        }
    }

    /// Store fields → specification
    fn flatten(&self, fields: &Fields) -> ReconcileResult<Self::Spec> {
        Ok(serde_json::from_value(Value::Object(fields.clone()))?)
    }
}

/// Desired state of one resource instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePlan<T> {
    pub spec: T,

    /// Attributes the user declares; scalar JSON values are accepted
    #[serde(
        default,
        serialize_with = "codec::serialize_declared",
        deserialize_with = "codec::deserialize_declared"
    )]
    pub ext_attrs: AttributeMap,
}

impl<T> ResourcePlan<T> {
    /// Plan for `spec` with no declared attributes
    pub fn new(spec: T) -> Self {
        Self {
            spec,
            ext_attrs: AttributeMap::new(),
        }
    }

    /// Replace the declared attributes
    pub fn with_ext_attrs(mut self, ext_attrs: AttributeMap) -> Self {
        self.ext_attrs = ext_attrs;
        self
    }
}

/// Persisted state of one resource instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState<T> {
    /// Store reference; may change when the object is found again by
    /// tracking value
    pub reference: String,

    pub spec: T,

    /// Server values of the declared attributes
    #[serde(default)]
    pub ext_attrs: AttributeMap,

    /// Everything the server returned, including inherited attributes
    #[serde(default)]
    pub ext_attrs_all: AttributeMap,

    /// Time of the last successful round trip
    pub observed_at: DateTime<Utc>,
}

impl<T> ResourceState<T> {
    /// Tracking value recorded in the full attribute set
    pub fn tracking_id(&self) -> Option<&str> {
        tracking_id(&self.ext_attrs_all)
    }
}

/// Result of refreshing a resource
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome<T> {
    Present(ResourceState<T>),
    /// The resource no longer exists and should be dropped from state
    Removed,
}

impl<T> ReadOutcome<T> {
    pub fn into_state(self) -> Option<ResourceState<T>> {
        match self {
            ReadOutcome::Present(state) => Some(state),
            ReadOutcome::Removed => None,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, ReadOutcome::Removed)
    }
}

/// Reconciles resources of one type against an object store
pub struct ResourceReconciler<S: ?Sized, A> {
    store: Arc<S>,
    adapter: A,
    options: SearchOptions,
}

impl<S, A> ResourceReconciler<S, A>
where
    S: ObjectStore + ?Sized,
    A: ResourceAdapter,
{
    /// Reconciler for `adapter`'s resource type over `store`
    pub fn new(store: Arc<S>, adapter: A) -> Self {
        Self {
            store,
            adapter,
            options: SearchOptions::default(),
        }
    }

    /// Options for every store call; the adapter's return fields are added
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Resource adapter in use
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Underlying object store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Create the object, tagging it with a fresh tracking value
    pub async fn create(
        &self,
        plan: &ResourcePlan<A::Spec>,
    ) -> ReconcileResult<ResourceState<A::Spec>> {
        let object_type = self.adapter.object_type();
        let fields = self.adapter.expand(&plan.spec)?;
        let outgoing = inject(plan.ext_attrs.clone());

        let options = self.request_options();
        let record = self
            .store
            .create(object_type, &outgoing, &fields, &options)
            .await?;
        if tracking_id(&record.attributes) != tracking_id(&outgoing) {
            warn!(
                "{} did not keep its tracking value; later reads cannot verify identity",
                record.reference
            );
        }

        info!("Created {} {}", object_type, record.reference);
        self.observe(&plan.ext_attrs, record)
    }

    /// Refresh persisted state from the store
    ///
    /// Returns [`ReadOutcome::Removed`] when the object is gone and cannot be
    /// found by tracking value.
    pub async fn read(
        &self,
        state: &ResourceState<A::Spec>,
    ) -> ReconcileResult<ReadOutcome<A::Spec>> {
        let resolution = resolve(
            self.store.as_ref(),
            self.adapter.object_type(),
            &state.reference,
            &state.ext_attrs_all,
            &self.request_options(),
        )
        .await?;

        match resolution.outcome {
            IdentityOutcome::Accept(record) => {
                if record.reference != state.reference {
                    info!("Reference changed: {} -> {}", state.reference, record.reference);
                }
                Ok(ReadOutcome::Present(self.observe(&state.ext_attrs, record)?))
            }
            IdentityOutcome::Remove => {
                info!("{} removed from state", state.reference);
                Ok(ReadOutcome::Removed)
            }
        }
    }

    /// Apply a new plan, carrying inherited attributes forward
    pub async fn update(
        &self,
        state: &ResourceState<A::Spec>,
        plan: &ResourcePlan<A::Spec>,
    ) -> ReconcileResult<ResourceState<A::Spec>> {
        let fields = self.adapter.expand(&plan.spec)?;

        let mut outgoing = merge_for_update(&plan.ext_attrs, &state.ext_attrs_all, &state.ext_attrs);
        if let Some(id) = state.tracking_id() {
            outgoing = ensure_tracking_id(outgoing, id)?;
        } else {
            warn!("{} has no recorded tracking value", state.reference);
        }

        debug!(
            "Updating {} with {} attributes ({} declared)",
            state.reference,
            outgoing.len(),
            plan.ext_attrs.len()
        );
        let record = self
            .store
            .update(&state.reference, &outgoing, &fields, &self.request_options())
            .await?;

        info!("Updated {}", record.reference);
        self.observe(&plan.ext_attrs, record)
    }

    /// Delete the object; an already missing object is not an error
    pub async fn delete(&self, state: &ResourceState<A::Spec>) -> ReconcileResult<()> {
        match self.store.delete(&state.reference).await {
            Ok(()) => {
                info!("Deleted {}", state.reference);
                Ok(())
            }
            Err(e) if e.is_not_found() => {
                debug!("{} already gone", state.reference);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Adopt an existing object, tagging it if it has no tracking value yet
    pub async fn import(&self, reference: &str) -> ReconcileResult<ResourceState<A::Spec>> {
        let options = self.request_options();
        let mut record = self.store.read(reference, &options).await?;

        if tracking_id(&record.attributes).is_none() {
            let outgoing = inject(record.attributes.clone());
            record = self
                .store
                .update(&record.reference, &outgoing, &Fields::new(), &options)
                .await?;
            debug!("Tagged imported object {}", record.reference);
        }

        info!("Imported {}", record.reference);
        self.observe(&AttributeMap::new(), record)
    }

    /// Configured options plus the fields this resource type needs back
    pub fn request_options(&self) -> SearchOptions {
        self.options
            .clone()
            .with_return_fields(self.adapter.return_fields().iter().copied())
    }

    fn observe(
        &self,
        declared: &AttributeMap,
        record: ObjectRecord,
    ) -> ReconcileResult<ResourceState<A::Spec>> {
        let spec = self.adapter.flatten(&record.fields)?;
        let attributes = split(declared, &record.attributes);

        Ok(ResourceState {
            reference: record.reference,
            spec,
            ext_attrs: attributes.user_visible,
            ext_attrs_all: attributes.full,
            observed_at: Utc::now(),
        })
    }
}
