//! Common types module for the crowdfund trail system.
//!
//! This module defines the data model shared by the trails client, the wallet
//! layer, the transaction orchestrator and the HTTP service. Keeping these
//! types in one crate ensures the wire formats stay consistent across crates.

/// Campaign and donation listings shown to users.
pub mod campaign;
/// Secret string wrapper for key material.
pub mod secret_string;
/// Trail API request and response types.
pub mod trail;
/// Transaction request, hash and state types.
pub mod transaction;
/// Utility functions for hex and display formatting.
pub mod utils;
/// Configuration validation types for wallet implementation tables.
pub mod validation;

// Re-export all types for convenient access
pub use campaign::*;
pub use secret_string::SecretString;
pub use trail::*;
pub use transaction::*;
pub use utils::{truncate_id, with_0x_prefix, without_0x_prefix, ZERO_ADDRESS};
pub use validation::*;
