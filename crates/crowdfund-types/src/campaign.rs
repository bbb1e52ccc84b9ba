//! Campaign and donation listing types.

use serde::{Deserialize, Serialize};

/// A crowdfund campaign as listed for donors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
	pub id: String,
	pub title: String,
	pub description: String,
	/// Funding goal in ETH.
	pub goal_amount: String,
	/// Amount raised so far in ETH.
	pub raised_amount: String,
	pub creator: String,
	pub is_active: bool,
}

impl CampaignSummary {
	/// Funding progress as a percentage, capped at 100.
	///
	/// Returns 0 when either amount does not parse or the goal is not positive.
	pub fn progress_percentage(&self) -> f64 {
		let raised = self.raised_amount.trim().parse::<f64>().unwrap_or(0.0);
		let goal = self.goal_amount.trim().parse::<f64>().unwrap_or(0.0);
		if goal <= 0.0 || !raised.is_finite() {
			return 0.0;
		}
		(raised / goal * 100.0).min(100.0)
	}
}

/// A donation made by the connected wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
	pub id: String,
	pub crowdfund_id: String,
	pub crowdfund_title: String,
	/// Donated amount in ETH.
	pub amount: String,
	pub date: String,
	pub transaction_hash: String,
	pub can_refund: bool,
	pub is_refunded: bool,
}

impl DonationRecord {
	/// A donation may be refunded only once and only while the campaign allows it.
	pub fn is_refundable(&self) -> bool {
		self.can_refund && !self.is_refunded
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn campaign(goal: &str, raised: &str) -> CampaignSummary {
		CampaignSummary {
			id: "cf".to_string(),
			title: "t".to_string(),
			description: "d".to_string(),
			goal_amount: goal.to_string(),
			raised_amount: raised.to_string(),
			creator: "0x1".to_string(),
			is_active: true,
		}
	}

	#[test]
	fn test_progress_percentage() {
		assert!((campaign("0.5", "0.12").progress_percentage() - 24.0).abs() < 1e-9);
		assert_eq!(campaign("0.5", "2").progress_percentage(), 100.0);
		assert_eq!(campaign("0", "1").progress_percentage(), 0.0);
		assert_eq!(campaign("abc", "1").progress_percentage(), 0.0);
	}
}
