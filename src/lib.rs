//! IPAM extensible-attribute reconciliation
//!
//! Keeps a declarative view of IPAM objects (network views, networks,
//! VLANs, super hosts, network templates) in step with a remote object
//! store, with two concerns at the center:
//!
//! - **Attribute inheritance**: the server may attach extensible attributes
//!   inherited from parent objects. Only user-declared attributes are shown
//!   back, while the full server view is kept for later updates.
//! - **Identity preservation**: every managed object carries a hidden
//!   tracking attribute. When a stored reference stops resolving, the object
//!   is recovered by searching for that tracking value.
//!
//! The [`store::ObjectStore`] trait is the seam to the remote system, with an
//! in-memory implementation for tests and a WAPI client behind the `wapi`
//! feature.

pub mod attributes;
pub mod config;
pub mod domain;
pub mod errors;
pub mod identity;
pub mod inheritance;
pub mod logging;
pub mod reconciler;
pub mod resources;
pub mod state_machine;
pub mod store;
pub mod tracking;

// Re-export commonly used types
pub use attributes::{AttributeMap, AttributeValue};
pub use config::WapiConfig;
pub use errors::{ReconcileError, ReconcileResult, StoreError, StoreResult};
pub use identity::{resolve, IdentityOutcome, Resolution};
pub use inheritance::{merge, merge_for_update, split, SplitAttributes};
pub use reconciler::{ReadOutcome, ResourceAdapter, ResourcePlan, ResourceReconciler, ResourceState};
pub use store::{InMemoryObjectStore, ObjectRecord, ObjectStore, SearchOptions};
pub use tracking::TRACKING_ATTRIBUTE;
