//! Request processing for the HTTP API.
//!
//! Handlers in [`crate::server`] extract request data and delegate here;
//! these functions only talk to the [`crowdfund_core::CrowdfundEngine`].

pub mod error;
pub mod forms;
pub mod listings;
pub mod session;
pub mod trails;

pub use error::{APIError, ErrorResponse};
