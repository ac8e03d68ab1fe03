//! # Capability Gateway
//!
//! A resilient client gateway for the AI capability platform API.
//!
//! The platform exposes a set of named AI capabilities (image generation, web
//! research, code execution, browser control, file creation, live interaction,
//! analytics, workflow automation) behind serverless endpoints. Because the
//! deployment topology supports several function-routing schemes, the real
//! backend base URL is not known statically and must be discovered per call.
//!
//! This crate provides:
//!
//! - A priority-ordered candidate sweep that tries each possible base URL in
//!   turn and returns the first success
//! - A typed client with one method per capability plus the system/analytics
//!   surface
//! - A diagnostics aggregator that fans out health, analytics, capability
//!   metadata, and performance calls concurrently
//! - Comprehensive error handling and configuration management utilities
//!
//! ## Architecture
//!
//! The gateway is designed around the following key abstractions:
//!
//! - `ServiceClient`: the base trait for service clients
//! - `RequestExecutor`: typed request dispatch; one logical request maps to
//!   one candidate sweep
//! - `Sweep`: the resilient lookup over the candidate base URLs
//! - `CapabilityClient`: the typed facade for the platform API
//! - `GatewayError`: normalized error taxonomy

// Re-export core modules
pub mod core;
pub use core::{RequestExecutor, ServiceClient};

// Re-export service-specific modules
pub mod services;
pub use services::capability::{self, CapabilityClient, CapabilityClientBuilder};

// Re-export error handling
pub mod error;
pub use error::{ErrorContext, GatewayError, Result};

// Re-export the resilient sweep
pub mod resilience;
pub use resilience::{CandidateList, Sweep, SweepConfig};

// Re-export configuration management
pub mod config;
pub use config::{ConfigProvider, GatewayConfig};

// Utility module for common functionality
mod util;

#[cfg(test)]
mod tests;

/// Create a new builder for a capability client
pub fn client() -> CapabilityClientBuilder {
    CapabilityClientBuilder::new()
}

/// Create a capability client from environment configuration
pub fn capability_client() -> CapabilityClient {
    CapabilityClient::new()
}
