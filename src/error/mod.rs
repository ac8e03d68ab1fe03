//! Error handling for the capability gateway
//!
//! This module provides a normalized error system that:
//! - Categorizes errors by type (network, timeout, exhaustion, etc.)
//! - Adds rich context to errors for better debugging
//! - Maps platform error responses to normalized formats
//! - Provides a convenient Result type alias

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

pub mod mapping;

/// Result type for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the capability gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Network or connection errors for a single attempt
    #[error("Network error: {0}")]
    Network(String),

    /// A single attempt exceeded its deadline
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// The platform returned a server-side error
    #[error("Service error: {0}")]
    Service(String),

    /// A 2xx response body was not the expected payload
    #[error("Parsing error: {0}")]
    Parsing(String),

    /// Request validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Resource not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Every candidate base URL failed for a logical path.
    /// The message names the path only; individual candidate errors are
    /// logged but never surfaced to the caller.
    #[error("All candidate endpoints failed: {0}")]
    Exhausted(String),

    /// File upload/download errors against the fixed file base
    #[error("Transfer error: {0}")]
    Transfer(String),

    /// A diagnostics aggregation pass failed as a whole
    #[error("Aggregation error: {0}")]
    Aggregation(String),

    /// Unexpected or internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Errors with additional context
    #[error("{inner}")]
    WithContext {
        inner: Box<GatewayError>,
        context: ErrorContext,
    },
}

impl GatewayError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        GatewayError::Network(message.into())
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        GatewayError::Timeout(message.into())
    }

    /// Create a service error
    pub fn service(message: impl Into<String>) -> Self {
        GatewayError::Service(message.into())
    }

    /// Create a parsing error
    pub fn parsing(message: impl Into<String>) -> Self {
        GatewayError::Parsing(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        GatewayError::Validation(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        GatewayError::Configuration(message.into())
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        GatewayError::NotFound(message.into())
    }

    /// Create an exhaustion error for a logical path
    pub fn exhausted(path: impl Into<String>, attempts: usize) -> Self {
        GatewayError::Exhausted(format!(
            "all {} candidate endpoints failed for endpoint: {}",
            attempts,
            path.into()
        ))
    }

    /// Create a transfer (upload/download) error
    pub fn transfer(message: impl Into<String>) -> Self {
        GatewayError::Transfer(message.into())
    }

    /// Create an aggregation error
    pub fn aggregation(message: impl Into<String>) -> Self {
        GatewayError::Aggregation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        GatewayError::Internal(message.into())
    }

    /// Add context to an existing error
    pub fn with_context(self, context: ErrorContext) -> Self {
        GatewayError::WithContext {
            inner: Box::new(self),
            context,
        }
    }

    /// Add a single context key/value to an existing error
    pub fn with_context_value(self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        let mut context = ErrorContext::new();
        context.add(key, value);
        self.with_context(context)
    }

    /// Get the HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::WithContext { context, .. } => context.status_code,
            _ => None,
        }
    }

    /// Get the endpoint if available
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            GatewayError::WithContext { context, .. } => context.endpoint.as_deref(),
            _ => None,
        }
    }

    /// Get the request id if available
    pub fn request_id(&self) -> Option<&str> {
        match self {
            GatewayError::WithContext { context, .. } => context.request_id.as_deref(),
            _ => None,
        }
    }

    /// Check whether this error terminated a full candidate sweep
    pub fn is_exhaustion(&self) -> bool {
        match self {
            GatewayError::Exhausted(_) => true,
            GatewayError::WithContext { inner, .. } => inner.is_exhaustion(),
            _ => false,
        }
    }
}

/// Error context information
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// Request timestamp
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,

    /// HTTP status code if applicable
    pub status_code: Option<u16>,

    /// Request ID for tracing
    pub request_id: Option<String>,

    /// Logical endpoint that was called
    pub endpoint: Option<String>,

    /// Additional context data
    pub data: HashMap<String, String>,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            timestamp: Some(chrono::Utc::now()),
            status_code: None,
            request_id: None,
            endpoint: None,
            data: HashMap::new(),
        }
    }
}

impl ErrorContext {
    /// Create a new error context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an HTTP status code
    pub fn status_code(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Add a request ID
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Add an endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Add a context value
    pub fn add<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: fmt::Display,
    {
        self.data.insert(key.into(), value.to_string());
    }

    /// Add a context value and return self (builder pattern)
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: fmt::Display,
    {
        self.add(key, value);
        self
    }
}

/// Convert reqwest errors to GatewayError
impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        let context = ErrorContext::new();

        let gateway_error = if err.is_timeout() {
            GatewayError::timeout(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            GatewayError::network(format!("Connection error: {}", err))
        } else if err.is_request() {
            GatewayError::validation(format!("Invalid request: {}", err))
        } else if err.is_redirect() {
            GatewayError::network(format!("Too many redirects: {}", err))
        } else if err.is_decode() {
            GatewayError::parsing(format!("Response decode error: {}", err))
        } else {
            GatewayError::internal(format!("HTTP client error: {}", err))
        };

        if let Some(status) = err.status() {
            gateway_error.with_context(context.status_code(status.as_u16()))
        } else {
            gateway_error.with_context(context)
        }
    }
}

/// Convert serde_json errors to GatewayError
impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::parsing(format!("JSON error: {}", err))
    }
}
