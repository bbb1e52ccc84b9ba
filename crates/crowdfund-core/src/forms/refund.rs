//! Refund form.

use super::{create_user_inputs, require, submit_step, FormError};
use crate::directory::Listings;
use crate::engine::TransactionOrchestrator;
use crowdfund_types::{TrailRef, TransactionState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const REFUND_NODE: &str = "refund_node";
/// Refunds follow the donation step on the same trail.
pub const REFUND_STEP: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundInput {
	pub donation_id: String,
}

pub struct RefundForm {
	orchestrator: TransactionOrchestrator,
	trail: TrailRef,
	listings: Arc<Listings>,
}

impl RefundForm {
	pub fn new(orchestrator: TransactionOrchestrator, trail: TrailRef, listings: Arc<Listings>) -> Self {
		Self {
			orchestrator,
			trail,
			listings,
		}
	}

	pub fn orchestrator(&self) -> &TransactionOrchestrator {
		&self.orchestrator
	}

	/// Refunds the selected donation and marks it refunded on success.
	pub async fn submit(&self, input: &RefundInput) -> Result<TransactionState, FormError> {
		require("Donation", &input.donation_id)?;

		let donation = self
			.listings
			.directory()
			.donations()
			.await
			.into_iter()
			.find(|d| d.id == input.donation_id)
			.ok_or_else(|| FormError::UnknownDonation(input.donation_id.clone()))?;
		if !donation.is_refundable() {
			return Err(FormError::NotRefundable(donation.id));
		}

		let donor = self.orchestrator.connected_address().await.unwrap_or_default();
		let user_inputs = create_user_inputs(
			REFUND_NODE,
			[
				("inputs.donationId", donation.id.as_str()),
				("inputs.crowdfundId", donation.crowdfund_id.as_str()),
				("inputs.donorAddress", donor.as_str()),
				("inputs.originalAmount", donation.amount.as_str()),
				("inputs.originalTxHash", donation.transaction_hash.as_str()),
			],
		);

		let state = submit_step(
			&self.orchestrator,
			&self.trail,
			REFUND_STEP,
			REFUND_NODE,
			&user_inputs,
		)
		.await?;

		if state.is_success {
			self.listings.directory().mark_refunded(&donation.id).await;
			tracing::info!(donation_id = %donation.id, "Donation refunded");
		}

		Ok(state)
	}

	pub fn reset(&self) {
		self.orchestrator.reset();
	}
}
