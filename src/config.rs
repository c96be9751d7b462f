// Copyright (c) 2025 - Cowboy AI, Inc.
//! WAPI connection configuration

use serde::{Deserialize, Serialize};
use std::env;

use crate::errors::{ReconcileError, ReconcileResult};
use crate::store::SearchOptions;

fn default_port() -> u16 {
    443
}

fn default_wapi_version() -> String {
    "2.12".to_string()
}

fn default_ssl_verify() -> bool {
    true
}

fn default_timeout() -> u64 {
    60
}

/// Connection settings for a WAPI grid master
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WapiConfig {
    /// Grid master host name or address
    pub server: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub username: String,

    pub password: String,

    /// WAPI version, e.g. "2.12"
    #[serde(default = "default_wapi_version")]
    pub wapi_version: String,

    /// Verify the server certificate
    #[serde(default = "default_ssl_verify")]
    pub ssl_verify: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Route reads and lists through the grid master's proxy search
    #[serde(default)]
    pub proxy_search: bool,
}

impl Default for WapiConfig {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: default_port(),
            username: String::new(),
            password: String::new(),
            wapi_version: default_wapi_version(),
            ssl_verify: default_ssl_verify(),
            timeout_secs: default_timeout(),
            proxy_search: false,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> ReconcileResult<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ReconcileError::Configuration(format!("{} has an invalid value: {}", name, raw))),
        Err(_) => Ok(None),
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "gm"
    )
}

impl WapiConfig {
    /// Configuration for `server` with default port, version, and timeouts
    pub fn new(
        server: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server: server.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Set the HTTPS port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the WAPI version (e.g. `2.12`)
    pub fn with_wapi_version(mut self, version: impl Into<String>) -> Self {
        self.wapi_version = version.into();
        self
    }

    /// Route searches through the Grid Master
    pub fn with_proxy_search(mut self, enabled: bool) -> Self {
        self.proxy_search = enabled;
        self
    }

    /// Load configuration from `INFOBLOX_*` environment variables
    ///
    /// `INFOBLOX_SERVER`, `INFOBLOX_USERNAME` and `INFOBLOX_PASSWORD` are
    /// required; `INFOBLOX_PORT`, `WAPI_VERSION`, `INFOBLOX_SSL_VERIFY`,
    /// `INFOBLOX_TIMEOUT` and `INFOBLOX_PROXY_SEARCH` are optional.
    pub fn from_env() -> ReconcileResult<Self> {
        let required = |name: &str| {
            env::var(name).map_err(|_| ReconcileError::Configuration(format!("{} not set", name)))
        };

        let mut config = Self::new(
            required("INFOBLOX_SERVER")?,
            required("INFOBLOX_USERNAME")?,
            required("INFOBLOX_PASSWORD")?,
        );

        if let Some(port) = parse_env("INFOBLOX_PORT")? {
            config.port = port;
        }
        if let Ok(version) = env::var("WAPI_VERSION") {
            config.wapi_version = version;
        }
        if let Ok(raw) = env::var("INFOBLOX_SSL_VERIFY") {
            config.ssl_verify = parse_flag(&raw);
        }
        if let Some(timeout) = parse_env("INFOBLOX_TIMEOUT")? {
            config.timeout_secs = timeout;
        }
        if let Ok(raw) = env::var("INFOBLOX_PROXY_SEARCH") {
            config.proxy_search = parse_flag(&raw);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReconcileResult<()> {
        if self.server.trim().is_empty() {
            return Err(ReconcileError::Configuration("server must not be empty".to_string()));
        }
        if self.wapi_version.trim().is_empty() {
            return Err(ReconcileError::Configuration(
                "wapi_version must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ReconcileError::Configuration(
                "timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// `https://{server}:{port}/wapi/v{version}/`
    pub fn base_url(&self) -> String {
        format!(
            "https://{}:{}/wapi/v{}/",
            self.server.trim_end_matches('/'),
            self.port,
            self.wapi_version
        )
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions::default().with_proxy_search(self.proxy_search)
    }
}
