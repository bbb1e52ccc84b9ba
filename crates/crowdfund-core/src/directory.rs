//! Campaign and donation listings.
//!
//! The trail's execution history is queried before listing, but its entries
//! are not parsed: the listings themselves come from a [`CampaignDirectory`].

use async_trait::async_trait;
use crowdfund_trails::{ApiError, TrailsInterface};
use crowdfund_types::{CampaignSummary, DonationRecord, TrailRef};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of campaign and donation listings.
#[async_trait]
pub trait CampaignDirectory: Send + Sync {
	async fn campaigns(&self) -> Vec<CampaignSummary>;

	async fn donations(&self) -> Vec<DonationRecord>;

	/// Marks a donation refunded. Returns false if it is unknown.
	async fn mark_refunded(&self, donation_id: &str) -> bool;
}

/// Fixed demonstration listings held in memory.
pub struct PlaceholderDirectory {
	campaigns: Vec<CampaignSummary>,
	donations: RwLock<Vec<DonationRecord>>,
}

impl PlaceholderDirectory {
	pub fn new() -> Self {
		Self {
			campaigns: vec![
				campaign(
					"cf_001",
					"Community Garden Project",
					"Building a sustainable community garden for everyone",
					"0.5",
					"0.12",
					"0x1234...5678",
				),
				campaign(
					"cf_002",
					"Tech Workshop Series",
					"Free blockchain education workshops for beginners",
					"0.3",
					"0.08",
					"0x8765...4321",
				),
			],
			donations: RwLock::new(vec![
				donation("don_001", "cf_001", "Community Garden Project", "0.05", "2024-08-26", "0x1234...abcd", true),
				donation("don_002", "cf_002", "Tech Workshop Series", "0.02", "2024-08-25", "0x5678...efgh", true),
				// campaign already succeeded
				donation("don_003", "cf_001", "Community Garden Project", "0.03", "2024-08-20", "0x9012...ijkl", false),
			]),
		}
	}
}

impl Default for PlaceholderDirectory {
	fn default() -> Self {
		Self::new()
	}
}

fn campaign(
	id: &str,
	title: &str,
	description: &str,
	goal_amount: &str,
	raised_amount: &str,
	creator: &str,
) -> CampaignSummary {
	CampaignSummary {
		id: id.to_string(),
		title: title.to_string(),
		description: description.to_string(),
		goal_amount: goal_amount.to_string(),
		raised_amount: raised_amount.to_string(),
		creator: creator.to_string(),
		is_active: true,
	}
}

fn donation(
	id: &str,
	crowdfund_id: &str,
	crowdfund_title: &str,
	amount: &str,
	date: &str,
	transaction_hash: &str,
	can_refund: bool,
) -> DonationRecord {
	DonationRecord {
		id: id.to_string(),
		crowdfund_id: crowdfund_id.to_string(),
		crowdfund_title: crowdfund_title.to_string(),
		amount: amount.to_string(),
		date: date.to_string(),
		transaction_hash: transaction_hash.to_string(),
		can_refund,
		is_refunded: false,
	}
}

#[async_trait]
impl CampaignDirectory for PlaceholderDirectory {
	async fn campaigns(&self) -> Vec<CampaignSummary> {
		self.campaigns.clone()
	}

	async fn donations(&self) -> Vec<DonationRecord> {
		self.donations.read().await.clone()
	}

	async fn mark_refunded(&self, donation_id: &str) -> bool {
		let mut donations = self.donations.write().await;
		match donations.iter_mut().find(|d| d.id == donation_id) {
			Some(donation) => {
				donation.is_refunded = true;
				true
			},
			None => false,
		}
	}
}

/// Listing queries combining execution history with the directory.
pub struct Listings {
	trails: Arc<dyn TrailsInterface>,
	directory: Arc<dyn CampaignDirectory>,
	creation: TrailRef,
	donation_refund: TrailRef,
}

impl Listings {
	pub fn new(
		trails: Arc<dyn TrailsInterface>,
		directory: Arc<dyn CampaignDirectory>,
		creation: TrailRef,
		donation_refund: TrailRef,
	) -> Self {
		Self {
			trails,
			directory,
			creation,
			donation_refund,
		}
	}

	pub fn directory(&self) -> &Arc<dyn CampaignDirectory> {
		&self.directory
	}

	/// Campaigns open for donations.
	pub async fn campaigns(&self) -> Result<Vec<CampaignSummary>, ApiError> {
		let history = self.trails.get_execution_history(&self.creation, None).await?;
		tracing::debug!(executions = history.len(), "Loaded creation history");
		Ok(self.directory.campaigns().await)
	}

	/// Donations made by `wallet`, excluding those already refunded.
	///
	/// Without a wallet there is nothing to list.
	pub async fn donations(&self, wallet: Option<&str>) -> Result<Vec<DonationRecord>, ApiError> {
		let Some(wallet) = wallet else {
			return Ok(Vec::new());
		};

		let history = self
			.trails
			.get_execution_history(&self.donation_refund, Some(&[wallet.to_string()]))
			.await?;
		tracing::debug!(executions = history.len(), "Loaded donation history");

		Ok(self
			.directory
			.donations()
			.await
			.into_iter()
			.filter(|d| !d.is_refunded)
			.collect())
	}

	/// Donations that can still be refunded.
	pub async fn refundable(&self, wallet: Option<&str>) -> Result<Vec<DonationRecord>, ApiError> {
		Ok(self
			.donations(wallet)
			.await?
			.into_iter()
			.filter(DonationRecord::is_refundable)
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::{MockTrails, WALLET};

	fn listings(trails: &Arc<MockTrails>) -> Listings {
		Listings::new(
			trails.clone(),
			Arc::new(PlaceholderDirectory::new()),
			TrailRef::new("create", "v1"),
			TrailRef::new("donate", "v2"),
		)
	}

	#[tokio::test]
	async fn test_campaigns_query_unfiltered_creation_history() {
		let trails = Arc::new(MockTrails::default());
		let campaigns = listings(&trails).campaigns().await.unwrap();

		assert_eq!(campaigns.len(), 2);
		assert_eq!(campaigns[0].id, "cf_001");
		assert_eq!(
			trails.history_queries(),
			vec![(TrailRef::new("create", "v1"), None)]
		);
	}

	#[tokio::test]
	async fn test_donations_filter_history_by_wallet() {
		let trails = Arc::new(MockTrails::default());
		let donations = listings(&trails).donations(Some(WALLET)).await.unwrap();

		assert_eq!(donations.len(), 3);
		assert_eq!(
			trails.history_queries(),
			vec![(TrailRef::new("donate", "v2"), Some(vec![WALLET.to_string()]))]
		);
	}

	#[tokio::test]
	async fn test_donations_without_wallet_skip_history() {
		let trails = Arc::new(MockTrails::default());
		assert!(listings(&trails).donations(None).await.unwrap().is_empty());
		assert!(trails.history_queries().is_empty());
	}

	#[tokio::test]
	async fn test_history_failure_is_propagated() {
		let trails = Arc::new(MockTrails::default().failing_history());
		assert!(listings(&trails).campaigns().await.unwrap_err().is_network());
	}

	#[tokio::test]
	async fn test_refundable_excludes_ineligible_and_refunded() {
		let trails = Arc::new(MockTrails::default());
		let listings = listings(&trails);
		assert!(listings.directory().mark_refunded("don_002").await);

		let refundable = listings.refundable(Some(WALLET)).await.unwrap();
		let ids: Vec<_> = refundable.iter().map(|d| d.id.as_str()).collect();
		assert_eq!(ids, vec!["don_001"]);
	}

	#[tokio::test]
	async fn test_mark_unknown_donation() {
		let directory = PlaceholderDirectory::new();
		assert!(!directory.mark_refunded("don_999").await);
	}
}
