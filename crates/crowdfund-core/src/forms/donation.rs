//! Donation form.

use super::{create_user_inputs, max_length, positive_amount, require, submit_step, FormError};
use crate::directory::Listings;
use crate::engine::TransactionOrchestrator;
use crowdfund_types::{TrailRef, TransactionState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DONATE_NODE: &str = "donate_node";
pub const DONATE_STEP: u32 = 1;

pub const MAX_MESSAGE_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationInput {
	pub crowdfund_id: String,
	/// Amount in ETH.
	pub amount: String,
	#[serde(default)]
	pub message: String,
}

impl DonationInput {
	pub fn validate(&self) -> Result<(), FormError> {
		require("Campaign", &self.crowdfund_id)?;
		positive_amount("Amount", &self.amount)?;
		max_length("Message", &self.message, MAX_MESSAGE_LENGTH)
	}
}

pub struct DonationForm {
	orchestrator: TransactionOrchestrator,
	trail: TrailRef,
	listings: Arc<Listings>,
}

impl DonationForm {
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

	/// Donates to a listed, active campaign.
	pub async fn submit(&self, input: &DonationInput) -> Result<TransactionState, FormError> {
		input.validate()?;

		let campaigns = self.listings.directory().campaigns().await;
		let listed = campaigns
			.iter()
			.any(|c| c.id == input.crowdfund_id && c.is_active);
		if !listed {
			return Err(FormError::UnknownCampaign(input.crowdfund_id.clone()));
		}

		let user_inputs = create_user_inputs(
			DONATE_NODE,
			[
				("inputs.crowdfundId", &input.crowdfund_id),
				("inputs.amount", &input.amount),
				("inputs.message", &input.message),
			],
		);
		submit_step(
			&self.orchestrator,
			&self.trail,
			DONATE_STEP,
			DONATE_NODE,
			&user_inputs,
		)
		.await
	}

	pub fn reset(&self) {
		self.orchestrator.reset();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::directory::PlaceholderDirectory;
	use crate::rate_limit::RateLimiter;
	use crate::test_support::{MockTrails, MockWallet};
	use crowdfund_wallet::WalletService;
	use std::time::Duration;

	fn form(trails: &Arc<MockTrails>, wallet: MockWallet) -> DonationForm {
		let trail = TrailRef::new("donate", "v2");
		let listings = Arc::new(Listings::new(
			trails.clone(),
			Arc::new(PlaceholderDirectory::new()),
			TrailRef::new("create", "v1"),
			trail.clone(),
		));
		let orchestrator = TransactionOrchestrator::new(
			trails.clone(),
			Some(Arc::new(WalletService::new(Box::new(wallet)))),
			Arc::new(RateLimiter::new(Duration::from_millis(10))),
		);
		DonationForm::new(orchestrator, trail, listings)
	}

	fn input(crowdfund_id: &str) -> DonationInput {
		DonationInput {
			crowdfund_id: crowdfund_id.to_string(),
			amount: "0.05".to_string(),
			message: "Good luck!".to_string(),
		}
	}

	#[tokio::test]
	async fn test_donation_to_listed_campaign() {
		let trails = Arc::new(MockTrails::default());
		let form = form(&trails, MockWallet::connected());

		let state = form.submit(&input("cf_002")).await.unwrap();
		assert!(state.is_success);

		let call = trails.last_evaluation().unwrap();
		assert_eq!(call.step_number, DONATE_STEP);
		let node = &call.user_inputs[DONATE_NODE];
		assert_eq!(node["inputs.crowdfundId"].value, "cf_002");
		assert_eq!(node["inputs.amount"].value, "0.05");
		assert_eq!(node["inputs.message"].value, "Good luck!");
		assert_eq!(trails.submissions()[0].node_id, DONATE_NODE);
	}

	#[tokio::test]
	async fn test_unknown_campaign_is_rejected() {
		let trails = Arc::new(MockTrails::default());
		let form = form(&trails, MockWallet::connected());

		let err = form.submit(&input("cf_404")).await.unwrap_err();
		assert!(matches!(err, FormError::UnknownCampaign(id) if id == "cf_404"));
		assert_eq!(trails.evaluation_calls(), 0);
	}

	#[tokio::test]
	async fn test_disconnected_wallet_reports_connectivity() {
		let trails = Arc::new(MockTrails::default());
		let form = form(&trails, MockWallet::disconnected());

		let state = form.submit(&input("cf_001")).await.unwrap();
		assert_eq!(state.error.as_deref(), Some("Please connect your wallet first"));
		assert!(trails.submissions().is_empty());
	}

	#[test]
	fn test_message_length_limit() {
		let mut long = input("cf_001");
		long.message = "m".repeat(MAX_MESSAGE_LENGTH + 1);
		assert!(long.validate().is_err());

		let mut empty = input("cf_001");
		empty.message.clear();
		assert!(empty.validate().is_ok());
	}
}
