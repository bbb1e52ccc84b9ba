//! Campaign and donation listings.

use super::APIError;
use crowdfund_core::CrowdfundEngine;
use crowdfund_types::{CampaignSummary, DonationRecord};
use serde::Serialize;

/// A campaign together with its funding progress.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignView {
	#[serde(flatten)]
	pub campaign: CampaignSummary,
	pub progress_percentage: f64,
}

impl From<CampaignSummary> for CampaignView {
	fn from(campaign: CampaignSummary) -> Self {
		let progress_percentage = campaign.progress_percentage();
		Self {
			campaign,
			progress_percentage,
		}
	}
}

pub async fn campaigns(engine: &CrowdfundEngine) -> Result<Vec<CampaignView>, APIError> {
	let campaigns = engine.listings().campaigns().await?;
	Ok(campaigns.into_iter().map(CampaignView::from).collect())
}

/// Donations of the connected wallet; empty when none is connected.
pub async fn donations(engine: &CrowdfundEngine) -> Result<Vec<DonationRecord>, APIError> {
	let address = engine.session().await.address;
	Ok(engine.listings().donations(address.as_deref()).await?)
}

/// Donations of the connected wallet that can be refunded.
pub async fn refundable(engine: &CrowdfundEngine) -> Result<Vec<DonationRecord>, APIError> {
	let address = engine.session().await.address;
	Ok(engine.listings().refundable(address.as_deref()).await?)
}
