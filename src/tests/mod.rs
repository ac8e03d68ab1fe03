//! Unit tests for the capability gateway
//!
//! This module contains tests for various components of the gateway.

// Re-export test modules
pub mod capability_mock_tests;
pub mod transfer_tests;
