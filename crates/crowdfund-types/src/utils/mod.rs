//! Utility functions and constants shared across crates.

pub mod formatting;

pub use formatting::{truncate_id, with_0x_prefix, without_0x_prefix};

/// The zero address, used as the acting wallet for unauthenticated reads.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
