// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for reconciliation and object-store operations

use thiserror::Error;

use crate::domain::NetworkError;
use crate::state_machine::TransitionError;

/// Errors reported by an object store backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The reference no longer resolves to an object
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Network or connection failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend rejected the request
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Client is misconfigured
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl StoreError {
    /// Whether this error signals a missing object
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// Result type for object-store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reconciling a resource
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Object store failure, propagated verbatim
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Persisted state carries no usable tracking value
    #[error("Missing internal identity for {reference}: re-import or recreate the resource")]
    MissingIdentity { reference: String },

    /// More than one object carries the same tracking value
    #[error("Tracking value {tracking_id} matches {matches} objects")]
    AmbiguousIdentity { tracking_id: String, matches: usize },

    /// Refusing to replace an existing tracking value
    #[error("Tracking value conflict: object has {existing}, refusing to set {requested}")]
    TrackingIdConflict { existing: String, requested: String },

    /// Attribute value cannot be represented
    #[error("Invalid attribute '{name}': {reason}")]
    InvalidAttribute { name: String, reason: String },

    /// Resource fields failed validation
    #[error("Invalid resource specification: {0}")]
    InvalidSpec(String),

    /// Value object validation failed
    #[error(transparent)]
    Validation(#[from] NetworkError),

    /// Identity lookup reached an impossible transition
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ReconcileError {
    /// Whether the underlying store reported a missing object
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReconcileError::Store(e) if e.is_not_found())
    }
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;

impl From<serde_json::Error> for ReconcileError {
    fn from(err: serde_json::Error) -> Self {
        ReconcileError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[cfg(feature = "wapi")]
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Serialization(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}
