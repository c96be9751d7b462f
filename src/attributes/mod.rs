// Copyright (c) 2025 - Cowboy AI, Inc.
//! Extensible Attribute Maps
//!
//! An [`AttributeMap`] is the flat, string-keyed set of extensible attributes
//! carried by every managed object. Values are strings; the object store may
//! annotate a value with the scope it was inherited from.
//!
//! Keys are case-sensitive and unique. Ordering is irrelevant, but the map is
//! backed by a `BTreeMap` so serialized state is stable.

pub mod codec;

use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap};
use std::fmt;

/// A single extensible attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ValueRepr", into = "ValueRepr")]
pub struct AttributeValue {
    value: String,
    inherited_from: Option<String>,
}

impl AttributeValue {
    /// Create a locally-set value
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inherited_from: None,
        }
    }

    /// Create a value the server inherited from `source`
    pub fn inherited(value: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            inherited_from: Some(source.into()),
        }
    }

    /// The attribute value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Reference of the scope this value was inherited from, if any
    pub fn inherited_from(&self) -> Option<&str> {
        self.inherited_from.as_deref()
    }

    /// Whether the server inherited this value from a parent scope
    pub fn is_inherited(&self) -> bool {
        self.inherited_from.is_some()
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Persisted form: a bare string unless the value carries metadata
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ValueRepr {
    Plain(String),
    Annotated {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        inherited_from: Option<String>,
    },
}

impl From<ValueRepr> for AttributeValue {
    fn from(repr: ValueRepr) -> Self {
        match repr {
            ValueRepr::Plain(value) => Self::new(value),
            ValueRepr::Annotated {
                value,
                inherited_from,
            } => Self {
                value,
                inherited_from,
            },
        }
    }
}

impl From<AttributeValue> for ValueRepr {
    fn from(value: AttributeValue) -> Self {
        match value.inherited_from {
            None => ValueRepr::Plain(value.value),
            Some(source) => ValueRepr::Annotated {
                value: value.value,
                inherited_from: Some(source),
            },
        }
    }
}

/// Mapping from attribute name to value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeMap(BTreeMap<String, AttributeValue>);

impl AttributeMap {
    /// Create an empty attribute map
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no attributes are set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if `name` is set
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Get the attribute named `name`
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    /// Value string for `name`
    pub fn value(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(AttributeValue::value)
    }

    /// Insert or replace an attribute, returning the previous value
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<AttributeValue>,
    ) -> Option<AttributeValue> {
        self.0.insert(name.into(), value.into())
    }

    /// Remove an attribute, returning its value
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        self.0.remove(name)
    }

    /// Attribute names in sorted order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate name/value pairs in sorted order
    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.0.iter()
    }

    /// Same key set, values ignored
    pub fn key_equal(&self, other: &AttributeMap) -> bool {
        self.len() == other.len() && self.keys().all(|k| other.contains_key(k))
    }

    /// Same keys and same values; inheritance markers ignored
    pub fn values_equal(&self, other: &AttributeMap) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.value(k) == Some(v.value()))
    }

    /// Plain name → value view, dropping metadata
    pub fn to_plain(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(k, v)| (k.clone(), v.value().to_string()))
            .collect()
    }
}

impl IntoIterator for AttributeMap {
    type Item = (String, AttributeValue);
    type IntoIter = btree_map::IntoIter<String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a AttributeMap {
    type Item = (&'a String, &'a AttributeValue);
    type IntoIter = btree_map::Iter<'a, String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for AttributeMap
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K, V> Extend<(K, V)> for AttributeMap
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl<const N: usize> From<[(&str, &str); N]> for AttributeMap {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for AttributeMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}
