//! Form controllers for campaign creation, donation and refund.
//!
//! Each controller validates its input, maps it to trail user inputs and
//! drives its own [`TransactionOrchestrator`]: execute the step, then record
//! the execution when a transaction hash came back.

pub mod creation;
pub mod donation;
mod inputs;
pub mod refund;

pub use creation::{Category, CreationForm, CreationInput};
pub use donation::{DonationForm, DonationInput};
pub use inputs::create_user_inputs;
pub use refund::{RefundForm, RefundInput};

use crate::engine::{OrchestratorError, TransactionOrchestrator};
use crowdfund_trails::ApiError;
use crowdfund_types::{TrailRef, TransactionState, UserInputs};
use thiserror::Error;

/// Errors that prevent a form submission from running.
#[derive(Debug, Error)]
pub enum FormError {
	/// A field failed validation.
	#[error("{0}")]
	Invalid(String),
	#[error("Unknown campaign: {0}")]
	UnknownCampaign(String),
	#[error("Unknown donation: {0}")]
	UnknownDonation(String),
	#[error("Donation {0} is not eligible for a refund")]
	NotRefundable(String),
	#[error(transparent)]
	Orchestrator(#[from] OrchestratorError),
	#[error("Failed to load listings: {0}")]
	Listing(#[from] ApiError),
}

fn require(field: &str, value: &str) -> Result<(), FormError> {
	if value.trim().is_empty() {
		return Err(FormError::Invalid(format!("{} is required", field)));
	}
	Ok(())
}

fn max_length(field: &str, value: &str, max: usize) -> Result<(), FormError> {
	if value.chars().count() > max {
		return Err(FormError::Invalid(format!(
			"{} must be at most {} characters",
			field, max
		)));
	}
	Ok(())
}

/// Amounts are decimal ETH strings and must be strictly positive.
fn positive_amount(field: &str, value: &str) -> Result<(), FormError> {
	require(field, value)?;
	match value.trim().parse::<f64>() {
		Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(()),
		_ => Err(FormError::Invalid(format!(
			"{} must be a positive number",
			field
		))),
	}
}

/// Executes one step and records it on success.
async fn submit_step(
	orchestrator: &TransactionOrchestrator,
	trail: &TrailRef,
	step_number: u32,
	node_id: &str,
	user_inputs: &UserInputs,
) -> Result<TransactionState, FormError> {
	let state = orchestrator
		.execute_step(trail, step_number, node_id, user_inputs)
		.await?;

	if let Some(hash) = &state.transaction_hash {
		orchestrator.record_execution(trail, node_id, hash).await;
	}

	Ok(state)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_positive_amount() {
		assert!(positive_amount("Amount", "0.01").is_ok());
		assert!(positive_amount("Amount", " 2 ").is_ok());
		assert!(positive_amount("Amount", "0").is_err());
		assert!(positive_amount("Amount", "-1").is_err());
		assert!(positive_amount("Amount", "NaN").is_err());
		assert_eq!(
			positive_amount("Amount", "").unwrap_err().to_string(),
			"Amount is required"
		);
	}

	#[test]
	fn test_max_length_counts_characters() {
		assert!(max_length("Title", &"é".repeat(100), 100).is_ok());
		assert!(max_length("Title", &"a".repeat(101), 100).is_err());
	}
}
