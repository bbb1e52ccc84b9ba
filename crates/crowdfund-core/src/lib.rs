//! Core orchestration for the crowdfund trail system.
//!
//! Form input flows through a [`TransactionOrchestrator`] which throttles
//! trail calls with a shared [`RateLimiter`], turns step evaluations into
//! transactions and hands them to the wallet for signing and broadcast. The
//! [`CrowdfundEngine`] wires one orchestrator per form, and the
//! [`CrowdfundBuilder`] assembles everything from configuration.

pub mod builder;
pub mod directory;
pub mod engine;
pub mod forms;
pub mod rate_limit;

#[cfg(test)]
mod test_support;

pub use builder::{BuilderError, CrowdfundBuilder};
pub use directory::{CampaignDirectory, Listings, PlaceholderDirectory};
pub use engine::{
	CrowdfundEngine, FormKind, OrchestratorError, SessionSummary, StateHolder, TrailKind,
	TransactionError, TransactionOrchestrator,
};
pub use forms::{create_user_inputs, FormError};
pub use rate_limit::RateLimiter;
