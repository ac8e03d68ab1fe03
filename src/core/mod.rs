//! Core abstractions for the capability gateway
//!
//! This module provides the trait interfaces the typed clients implement:
//!
//! - `ServiceClient`: the base trait for service clients
//! - `RequestExecutor`: typed request dispatch over the candidate sweep

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;

use crate::error::Result;

/// Base trait for all service clients
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// The client name/identifier
    fn name(&self) -> &str;

    /// The deployment origin the client talks to
    fn origin(&self) -> &str;

    /// Service version
    fn version(&self) -> &str;

    /// Health check for the service
    async fn health_check(&self) -> Result<bool>;

    /// Returns the client's operability metrics if available
    fn metrics(&self) -> Option<HashMap<String, String>>;
}

/// Trait responsible for executing typed requests
///
/// Each call maps to exactly one logical request; the implementation may
/// attempt multiple physical candidates to satisfy it.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute a request against a logical endpoint, returning a response of type R
    async fn execute<T, R>(&self, endpoint: &str, request: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send;

    /// Execute a GET request against a logical endpoint
    async fn get<R>(&self, endpoint: &str) -> Result<R>
    where
        R: DeserializeOwned + Send;

    /// Execute a POST request against a logical endpoint
    async fn post<T, R>(&self, endpoint: &str, body: &T) -> Result<R>
    where
        T: Serialize + Send + Sync,
        R: DeserializeOwned + Send;
}
