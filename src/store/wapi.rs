// Copyright (c) 2025 - Cowboy AI, Inc.
//! WAPI Object Store
//!
//! [`ObjectStore`] over an Infoblox-style WAPI REST API.
//!
//! ```text
//! create  POST   {base}{object_type}?_return_fields+=extattrs[,..][&_proxy_search=GM]
//! read    GET    {base}{ref}?_return_fields+=extattrs[,..][&_proxy_search=GM]
//! update  PUT    {base}{ref}?_return_fields+=extattrs[,..][&_proxy_search=GM]
//! delete  DELETE {base}{ref}
//! list    GET    {base}{object_type}?*{name}={value}&_return_fields+=extattrs[,..]
//! ```
//!
//! Fields outside the server's basic set (a template's `netmask`, a host's
//! `disabled`) only come back when named in [`SearchOptions::return_fields`].
//!
//! Records arrive as JSON objects: `_ref` becomes the reference, `extattrs`
//! is decoded into the attribute map, and everything else is kept as fields.
//!
//! # Example
//!
//! ```rust,no_run
//! use cim_ipam::config::WapiConfig;
//! use cim_ipam::store::WapiObjectStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = WapiConfig::new("gm.example.com", "admin", "secret");
//! let store = WapiObjectStore::new(config)?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::{AttributeFilter, Fields, ObjectRecord, ObjectStore, SearchOptions};
use crate::attributes::codec::{decode_wire, encode_wire};
use crate::attributes::AttributeMap;
use crate::config::WapiConfig;
use crate::errors::{StoreError, StoreResult};

const RETURN_FIELDS: &str = "_return_fields+";
const EXTATTRS: &str = "extattrs";
const PROXY_SEARCH: (&str, &str) = ("_proxy_search", "GM");

type Query = Vec<(String, String)>;

/// WAPI-backed object store
pub struct WapiObjectStore {
    config: WapiConfig,
    base_url: String,
    client: Client,
}

impl WapiObjectStore {
    /// Validate `config` and build the HTTP client
    ///
    /// Certificate checks follow `ssl_verify`.
    pub fn new(config: WapiConfig) -> StoreResult<Self> {
        config
            .validate()
            .map_err(|e| StoreError::Configuration(e.to_string()))?;

        info!("Connecting to WAPI at {}", config.base_url());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.ssl_verify)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| {
                StoreError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            base_url: config.base_url(),
            config,
            client,
        })
    }

    /// Configuration this store was built from
    pub fn config(&self) -> &WapiConfig {
        &self.config
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .basic_auth(&self.config.username, Some(&self.config.password))
    }

    fn url(&self, path: &str, query: &Query) -> String {
        build_url(&self.base_url, path, query)
    }

    async fn json(response: Response, reference: &str) -> StoreResult<Value> {
        let response = check_status(response, reference).await?;
        Ok(response.json::<Value>().await?)
    }
}

fn build_url(base_url: &str, path: &str, query: &Query) -> String {
    if query.is_empty() {
        return format!("{}{}", base_url, path);
    }
    let query = query
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}{}?{}", base_url, path, query)
}

/// `extattrs` followed by the object-specific fields in `options`
fn return_fields(options: &SearchOptions) -> String {
    std::iter::once(EXTATTRS)
        .chain(
            options
                .return_fields
                .iter()
                .map(String::as_str)
                .filter(|field| *field != EXTATTRS),
        )
        .collect::<Vec<_>>()
        .join(",")
}

/// Query for calls that return records: `query`, then return fields, then
/// the proxy flag when searches go through the Grid Master
fn record_query(options: &SearchOptions, mut query: Query) -> Query {
    query.push((RETURN_FIELDS.to_string(), return_fields(options)));
    if options.proxy_search {
        query.push((PROXY_SEARCH.0.to_string(), PROXY_SEARCH.1.to_string()));
    }
    query
}

fn list_query(filter: &AttributeFilter, options: &SearchOptions) -> Query {
    let query = filter
        .iter()
        .map(|(name, value)| (format!("*{}", name), value.clone()))
        .collect();
    record_query(options, query)
}

fn is_not_found(status: StatusCode, body: &str) -> bool {
    if status == StatusCode::NOT_FOUND {
        return true;
    }
    let body = body.to_ascii_lowercase();
    status == StatusCode::BAD_REQUEST
        && (body.contains("not found") || body.contains("datanotfound"))
}

fn error_for_status(status: StatusCode, body: String, reference: &str) -> StoreError {
    if is_not_found(status, &body) {
        StoreError::NotFound(reference.to_string())
    } else {
        StoreError::Api {
            status: status.as_u16(),
            message: body,
        }
    }
}

async fn check_status(response: Response, reference: &str) -> StoreResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(error_for_status(status, body, reference))
}

/// Deleting an object that is already gone succeeds
fn tolerate_missing(result: StoreResult<()>) -> StoreResult<()> {
    match result {
        Err(e) if e.is_not_found() => Ok(()),
        other => other,
    }
}

fn record_from_json(value: Value) -> StoreResult<ObjectRecord> {
    let mut fields = match value {
        Value::Object(fields) => fields,
        other => {
            return Err(StoreError::Serialization(format!(
                "expected an object, got {}",
                other
            )))
        }
    };

    let reference = match fields.remove("_ref") {
        Some(Value::String(reference)) => reference,
        _ => return Err(StoreError::Serialization("record without _ref".to_string())),
    };
    let attributes = match fields.remove(EXTATTRS) {
        Some(extattrs) => {
            decode_wire(&extattrs).map_err(|e| StoreError::Serialization(e.to_string()))?
        }
        None => AttributeMap::new(),
    };

    Ok(ObjectRecord::new(reference, attributes, fields))
}

fn records_from_list(value: Value) -> StoreResult<Vec<ObjectRecord>> {
    match value {
        Value::Array(items) => items.into_iter().map(record_from_json).collect(),
        other => Err(StoreError::Serialization(format!(
            "expected a list, got {}",
            other
        ))),
    }
}

fn request_body(attributes: &AttributeMap, fields: &Fields) -> Value {
    let mut body = fields.clone();
    body.insert(EXTATTRS.to_string(), encode_wire(attributes));
    Value::Object(body)
}

#[async_trait]
impl ObjectStore for WapiObjectStore {
    async fn create(
        &self,
        object_type: &str,
        attributes: &AttributeMap,
        fields: &Fields,
        options: &SearchOptions,
    ) -> StoreResult<ObjectRecord> {
        let url = self.url(object_type, &record_query(options, Query::new()));
        let response = self
            .request(Method::POST, url)
            .json(&request_body(attributes, fields))
            .send()
            .await?;

        record_from_json(Self::json(response, object_type).await?)
    }

    async fn read(&self, reference: &str, options: &SearchOptions) -> StoreResult<ObjectRecord> {
        let url = self.url(reference, &record_query(options, Query::new()));
        let response = self.request(Method::GET, url).send().await?;

        record_from_json(Self::json(response, reference).await?)
    }

    async fn update(
        &self,
        reference: &str,
        attributes: &AttributeMap,
        fields: &Fields,
        options: &SearchOptions,
    ) -> StoreResult<ObjectRecord> {
        let url = self.url(reference, &record_query(options, Query::new()));
        let response = self
            .request(Method::PUT, url)
            .json(&request_body(attributes, fields))
            .send()
            .await?;

        record_from_json(Self::json(response, reference).await?)
    }

    async fn delete(&self, reference: &str) -> StoreResult<()> {
        let url = self.url(reference, &Query::new());
        let response = self.request(Method::DELETE, url).send().await?;

        tolerate_missing(check_status(response, reference).await.map(|_| ()))
    }

    async fn list(
        &self,
        object_type: &str,
        filter: &AttributeFilter,
        options: &SearchOptions,
    ) -> StoreResult<Vec<ObjectRecord>> {
        let url = self.url(object_type, &list_query(filter, options));
        let response = self.request(Method::GET, url).send().await?;

        records_from_list(Self::json(response, object_type).await?)
    }
}
