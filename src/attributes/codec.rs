// Copyright (c) 2025 - Cowboy AI, Inc.
//! Attribute Map Codec
//!
//! Converts between the three representations an attribute set takes:
//!
//! ```text
//! declarative model        AttributeMap           object store wire
//! {"Site": "NY"}    <──>   Site = NY      <──>    {"Site": {"value": "NY"}}
//! ```
//!
//! The declarative side is a JSON object of scalars (or its JSON text).
//! [`ResourcePlan`](crate::reconciler::ResourcePlan) goes through
//! [`deserialize_declared`] and [`serialize_declared`]; engines that hand
//! attributes over as JSON text use [`decode_declared_str`].
//! The wire side is the store's `extattrs` object, where each entry may also
//! carry an `inheritance_source` naming the scope it was inherited from.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{AttributeMap, AttributeValue};
use crate::errors::{ReconcileError, ReconcileResult};

fn scalar_to_string(name: &str, value: &Value) -> ReconcileResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) => Err(ReconcileError::InvalidAttribute {
            name: name.to_string(),
            reason: "multi-valued attributes are not supported".to_string(),
        }),
        Value::Object(_) => Err(ReconcileError::InvalidAttribute {
            name: name.to_string(),
            reason: "value must be a scalar".to_string(),
        }),
    }
}

/// Decode the declarative model's attribute object
///
/// `null` stands for "no attributes"; `null` entries are skipped.
pub fn decode_declared(value: &Value) -> ReconcileResult<AttributeMap> {
    let object = match value {
        Value::Null => return Ok(AttributeMap::new()),
        Value::Object(object) => object,
        other => {
            return Err(ReconcileError::InvalidAttribute {
                name: "<root>".to_string(),
                reason: format!("expected an object, got {}", other),
            })
        }
    };

    let mut map = AttributeMap::new();
    for (name, value) in object {
        if let Some(v) = scalar_to_string(name, value)? {
            map.insert(name.clone(), v);
        }
    }
    Ok(map)
}

/// Decode declared attributes from JSON text; blank text means none
pub fn decode_declared_str(text: &str) -> ReconcileResult<AttributeMap> {
    if text.trim().is_empty() {
        return Ok(AttributeMap::new());
    }
    let value: Value = serde_json::from_str(text)?;
    decode_declared(&value)
}

/// Encode an attribute map for the declarative model (metadata dropped)
pub fn encode_declared(map: &AttributeMap) -> Value {
    Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), Value::String(v.value().to_string())))
            .collect(),
    )
}

/// `deserialize_with` adapter for declared attribute maps
pub fn deserialize_declared<'de, D>(deserializer: D) -> Result<AttributeMap, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    decode_declared(&value).map_err(serde::de::Error::custom)
}

/// `serialize_with` adapter for declared attribute maps
pub fn serialize_declared<S>(map: &AttributeMap, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    encode_declared(map).serialize(serializer)
}

/// Decode the object store's `extattrs` object
pub fn decode_wire(value: &Value) -> ReconcileResult<AttributeMap> {
    let object = match value {
        Value::Null => return Ok(AttributeMap::new()),
        Value::Object(object) => object,
        other => {
            return Err(ReconcileError::InvalidAttribute {
                name: "extattrs".to_string(),
                reason: format!("expected an object, got {}", other),
            })
        }
    };

    let mut map = AttributeMap::new();
    for (name, entry) in object {
        let Some(raw) = entry.get("value") else {
            return Err(ReconcileError::InvalidAttribute {
                name: name.clone(),
                reason: "missing 'value'".to_string(),
            });
        };
        let Some(value) = scalar_to_string(name, raw)? else {
            continue;
        };
        let source = entry
            .get("inheritance_source")
            .and_then(|s| s.get("_ref"))
            .and_then(Value::as_str);

        let attribute = match source {
            Some(source) => AttributeValue::inherited(value, source),
            None => AttributeValue::new(value),
        };
        map.insert(name.clone(), attribute);
    }
    Ok(map)
}

/// Encode an attribute map as the store's `extattrs` object
///
/// Inheritance markers are never sent back.
pub fn encode_wire(map: &AttributeMap) -> Value {
    let mut object = Map::new();
    for (name, value) in map {
        let mut entry = Map::new();
        entry.insert("value".to_string(), Value::String(value.value().to_string()));
        object.insert(name.clone(), Value::Object(entry));
    }
    Value::Object(object)
}
