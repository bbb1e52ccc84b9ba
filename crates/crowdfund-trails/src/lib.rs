//! Client for the trails workflow API.
//!
//! A trail turns structured user input into blockchain call data. This crate
//! wraps the service's HTTP surface behind [`TrailsInterface`] so the
//! orchestrator can be exercised against test doubles, and ships the
//! reqwest-backed implementation used in production.

use async_trait::async_trait;
use crowdfund_types::{
	ExecutionAck, ExecutionHistory, ExecutionRecord, ReadResult, StepEvaluation, TrailMetadata,
	TrailRef, UserInputs,
};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod http;
}

/// Errors that can occur while talking to the trails API.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The service answered with a non-2xx status.
	#[error("Herd API error: {status} {status_text}")]
	Status { status: u16, status_text: String },
	/// The request could not be sent or its response not received.
	#[error("Network error: {0}")]
	Network(String),
	/// The response body did not match the expected shape.
	#[error("Invalid response: {0}")]
	Decode(String),
	/// The request was rejected before being sent.
	#[error("Invalid request: {0}")]
	InvalidRequest(String),
}

impl ApiError {
	pub fn is_network(&self) -> bool {
		matches!(self, ApiError::Network(_))
	}
}

/// Operations offered by the trails workflow service.
#[async_trait]
pub trait TrailsInterface: Send + Sync {
	/// Fetches trail metadata including steps and input requirements.
	async fn get_trail_metadata(&self, trail: &TrailRef) -> Result<TrailMetadata, ApiError>;

	/// Evaluates a step and returns the transaction to broadcast.
	///
	/// `step_number` is 1-indexed.
	async fn get_step_evaluation(
		&self,
		trail: &TrailRef,
		step_number: u32,
		user_inputs: &UserInputs,
		wallet_address: &str,
	) -> Result<StepEvaluation, ApiError>;

	/// Records a broadcast transaction against the trail's execution history.
	async fn submit_execution(
		&self,
		trail: &TrailRef,
		record: &ExecutionRecord,
	) -> Result<ExecutionAck, ApiError>;

	/// Queries recorded executions, optionally restricted to some wallets.
	async fn get_execution_history(
		&self,
		trail: &TrailRef,
		wallet_addresses: Option<&[String]>,
	) -> Result<ExecutionHistory, ApiError>;

	/// Reads derived on-chain state through a read node.
	///
	/// Unauthenticated reads pass `None` and act as the zero address.
	async fn read_trail_data(
		&self,
		trail: &TrailRef,
		node_id: &str,
		wallet_address: Option<&str>,
	) -> Result<ReadResult, ApiError>;
}
