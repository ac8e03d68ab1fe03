//! Configuration management for the gateway
//!
//! This module provides utilities for loading and validating gateway
//! configuration, with support for environment variables.

use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{GatewayError, Result};
use crate::util::parse_duration;

/// Route prefixes tried in priority order for every logical request.
/// The first entry is the primary functions gateway; the empty prefix is the
/// deployment root.
pub const DEFAULT_ROUTE_PREFIXES: [&str; 4] =
    ["/.netlify/functions/api", "/api", "", "/functions/api"];

/// Fixed prefix for file upload/download; never part of the candidate sweep.
pub const DEFAULT_FILE_BASE: &str = "/api/ultimate-ai";

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get an integer configuration value
    fn get_int(&self, key: &str) -> Result<i64> {
        let value = self.get_string(key)?;
        value.parse::<i64>().map_err(|e| {
            GatewayError::configuration(format!("Invalid integer for key {}: {}", key, e))
        })
    }

    /// Get a boolean configuration value
    fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get_string(key)?;
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(true),
            "false" | "no" | "0" | "off" => Ok(false),
            _ => Err(GatewayError::configuration(format!(
                "Invalid boolean value for key {}: {}",
                key, value
            ))),
        }
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get an integer configuration value with a default
    fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }
}

impl<T: ConfigProvider> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,
}

impl EnvConfigProvider {
    /// Create a new environment variable config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Format a configuration key as an environment variable
    fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        env_key.push_str(
            &key.to_uppercase()
                .replace(|c: char| !c.is_ascii_alphanumeric(), "_"),
        );

        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => GatewayError::configuration(format!(
                "Environment variable not set: {}",
                env_key
            )),
            env::VarError::NotUnicode(_) => GatewayError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial values
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values.get(key).cloned().ok_or_else(|| {
            GatewayError::configuration(format!("Configuration key not found: {}", key))
        })
    }
}

/// Global default configuration provider
pub static DEFAULT_PROVIDER: Lazy<Arc<EnvConfigProvider>> =
    Lazy::new(|| Arc::new(EnvConfigProvider::new().with_prefix("GATEWAY")));

/// Gateway configuration
///
/// Read-only for the life of the process once a client is built; the
/// candidate list derived from it is shared without synchronization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Absolute URL of the deployment hosting the serverless endpoints
    pub origin: String,

    /// Route prefixes tried in priority order (first match wins)
    pub route_prefixes: Vec<String>,

    /// Fixed prefix for file upload/download (not swept)
    pub file_base: String,

    /// Overall HTTP client timeout in seconds
    pub timeout_seconds: u64,

    /// Per-candidate attempt deadline in milliseconds; 0 disables the deadline
    pub attempt_timeout_ms: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:8888".to_string(),
            route_prefixes: DEFAULT_ROUTE_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            file_base: DEFAULT_FILE_BASE.to_string(),
            timeout_seconds: 30,
            attempt_timeout_ms: 10_000,
        }
    }
}

impl GatewayConfig {
    /// Load configuration from a config provider
    ///
    /// Recognized keys: `api_origin`, `route_prefixes` (comma-separated, empty
    /// entries kept), `file_base`, `timeout_seconds`, `attempt_timeout`
    /// (duration string, e.g. "10s").
    pub fn from_provider<P: ConfigProvider + ConfigProviderExt>(provider: &P) -> Result<Self> {
        let defaults = Self::default();

        let origin = provider.get_string_or("api_origin", &defaults.origin);
        let route_prefixes = match provider.get_string("route_prefixes") {
            Ok(raw) => raw.split(',').map(|p| p.trim().to_string()).collect(),
            Err(_) => defaults.route_prefixes.clone(),
        };
        let file_base = provider.get_string_or("file_base", &defaults.file_base);
        let timeout_seconds =
            provider.get_int_or("timeout_seconds", defaults.timeout_seconds as i64) as u64;
        let attempt_timeout_ms = match provider.get_string("attempt_timeout") {
            Ok(raw) => parse_duration(&raw)
                .ok_or_else(|| {
                    GatewayError::configuration(format!("Invalid attempt_timeout: {}", raw))
                })?
                .as_millis() as u64,
            Err(_) => defaults.attempt_timeout_ms,
        };

        let config = Self {
            origin,
            route_prefixes,
            file_base,
            timeout_seconds,
            attempt_timeout_ms,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate this configuration
    pub fn validate(&self) -> Result<()> {
        if self.origin.is_empty() {
            return Err(GatewayError::configuration("API origin is required"));
        }

        Url::parse(&self.origin).map_err(|e| {
            GatewayError::configuration(format!("API origin must be an absolute URL: {}", e))
        })?;

        if self.route_prefixes.is_empty() {
            return Err(GatewayError::configuration(
                "At least one route prefix is required",
            ));
        }

        Ok(())
    }

    /// Derive the candidate base URLs in priority order
    pub fn candidates(&self) -> Vec<String> {
        self.route_prefixes
            .iter()
            .map(|prefix| format!("{}{}", self.origin.trim_end_matches('/'), prefix))
            .collect()
    }

    /// The fixed base URL for file upload/download
    pub fn file_base_url(&self) -> String {
        format!("{}{}", self.origin.trim_end_matches('/'), self.file_base)
    }

    /// Per-candidate attempt deadline, if enabled
    pub fn attempt_timeout(&self) -> Option<Duration> {
        if self.attempt_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.attempt_timeout_ms))
        }
    }
}
