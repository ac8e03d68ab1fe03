//! Service clients for the gateway
//!
//! `common` holds the shared HTTP plumbing; `capability` is the typed client
//! for the AI capability platform.

pub mod capability;
pub mod common;
