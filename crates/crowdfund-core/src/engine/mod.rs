//! Crowdfund engine tying the forms, listings and wallet session together.
//!
//! The engine owns one orchestrator per form, all sharing a single rate
//! limiter, so each form has its own observable state while trail calls
//! stay globally spaced.

pub mod orchestrator;
pub mod state;

pub use orchestrator::{OrchestratorError, TransactionError, TransactionOrchestrator};
pub use state::StateHolder;

use crate::directory::{CampaignDirectory, Listings};
use crate::forms::{CreationForm, DonationForm, RefundForm};
use crate::rate_limit::RateLimiter;
use crowdfund_config::Config;
use crowdfund_trails::TrailsInterface;
use crowdfund_types::TrailRef;
use crowdfund_wallet::WalletService;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// The three forms exposed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
	Creation,
	Donation,
	Refund,
}

/// The trails the engine talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailKind {
	Creation,
	DonationRefund,
}

#[derive(Debug, Error)]
#[error("Unknown {kind}: {name}")]
pub struct UnknownKind {
	kind: &'static str,
	name: String,
}

impl FromStr for FormKind {
	type Err = UnknownKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"creation" => Ok(FormKind::Creation),
			"donation" => Ok(FormKind::Donation),
			"refund" => Ok(FormKind::Refund),
			_ => Err(UnknownKind {
				kind: "form",
				name: s.to_string(),
			}),
		}
	}
}

impl FromStr for TrailKind {
	type Err = UnknownKind;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"creation" => Ok(TrailKind::Creation),
			"donation-refund" | "donation" | "refund" => Ok(TrailKind::DonationRefund),
			_ => Err(UnknownKind {
				kind: "trail",
				name: s.to_string(),
			}),
		}
	}
}

/// Identity and wallet status for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
	pub identity_enabled: bool,
	pub authenticated: bool,
	pub address: Option<String>,
}

/// Main crowdfund engine.
pub struct CrowdfundEngine {
	config: Config,
	trails: Arc<dyn TrailsInterface>,
	/// Absent when the identity layer is disabled.
	wallet: Option<Arc<WalletService>>,
	listings: Arc<Listings>,
	creation: CreationForm,
	donation: DonationForm,
	refund: RefundForm,
}

impl CrowdfundEngine {
	pub fn new(
		config: Config,
		trails: Arc<dyn TrailsInterface>,
		wallet: Option<Arc<WalletService>>,
		directory: Arc<dyn CampaignDirectory>,
		rate_limiter: Arc<RateLimiter>,
	) -> Self {
		let creation_trail = config.trails.creation.clone();
		let donation_trail = config.trails.donation_refund.clone();

		let listings = Arc::new(Listings::new(
			trails.clone(),
			directory,
			creation_trail.clone(),
			donation_trail.clone(),
		));

		let orchestrator = || {
			TransactionOrchestrator::new(trails.clone(), wallet.clone(), rate_limiter.clone())
		};

		let creation = CreationForm::new(orchestrator(), creation_trail);
		let donation = DonationForm::new(orchestrator(), donation_trail.clone(), listings.clone());
		let refund = RefundForm::new(orchestrator(), donation_trail, listings.clone());

		Self {
			config,
			trails,
			wallet,
			listings,
			creation,
			donation,
			refund,
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}

	pub fn trails(&self) -> &Arc<dyn TrailsInterface> {
		&self.trails
	}

	pub fn wallet(&self) -> Option<&Arc<WalletService>> {
		self.wallet.as_ref()
	}

	pub fn listings(&self) -> &Listings {
		&self.listings
	}

	pub fn creation(&self) -> &CreationForm {
		&self.creation
	}

	pub fn donation(&self) -> &DonationForm {
		&self.donation
	}

	pub fn refund(&self) -> &RefundForm {
		&self.refund
	}

	pub fn orchestrator(&self, form: FormKind) -> &TransactionOrchestrator {
		match form {
			FormKind::Creation => self.creation.orchestrator(),
			FormKind::Donation => self.donation.orchestrator(),
			FormKind::Refund => self.refund.orchestrator(),
		}
	}

	pub fn trail(&self, trail: TrailKind) -> &TrailRef {
		match trail {
			TrailKind::Creation => &self.config.trails.creation,
			TrailKind::DonationRefund => &self.config.trails.donation_refund,
		}
	}

	pub async fn session(&self) -> SessionSummary {
		match &self.wallet {
			Some(wallet) => {
				let session = wallet.session().await;
				SessionSummary {
					identity_enabled: true,
					authenticated: session.authenticated,
					address: session.connected_address().map(str::to_string),
				}
			},
			None => SessionSummary {
				identity_enabled: false,
				authenticated: false,
				address: None,
			},
		}
	}

	/// Block explorer link for a transaction.
	pub fn explorer_url(&self, transaction_hash: &str) -> String {
		self.config.explorer.transaction_url(transaction_hash)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::directory::PlaceholderDirectory;
	use crate::test_support::{MockTrails, MockWallet, WALLET};
	use std::time::Duration;

	fn engine(wallet: Option<MockWallet>) -> CrowdfundEngine {
		CrowdfundEngine::new(
			Config::default(),
			Arc::new(MockTrails::default()),
			wallet.map(|w| Arc::new(WalletService::new(Box::new(w)))),
			Arc::new(PlaceholderDirectory::new()),
			Arc::new(RateLimiter::new(Duration::from_millis(10))),
		)
	}

	#[test]
	fn test_kind_parsing() {
		assert_eq!("refund".parse::<FormKind>().unwrap(), FormKind::Refund);
		assert_eq!(
			"donation-refund".parse::<TrailKind>().unwrap(),
			TrailKind::DonationRefund
		);
		assert_eq!(
			"payout".parse::<FormKind>().unwrap_err().to_string(),
			"Unknown form: payout"
		);
	}

	#[tokio::test]
	async fn test_session_without_identity_is_read_only() {
		let session = engine(None).session().await;
		assert!(!session.identity_enabled);
		assert_eq!(session.address, None);
	}

	#[tokio::test]
	async fn test_session_reports_connected_wallet() {
		let session = engine(Some(MockWallet::connected())).session().await;
		assert!(session.identity_enabled && session.authenticated);
		assert_eq!(session.address.as_deref(), Some(WALLET));
	}

	#[tokio::test]
	async fn test_forms_have_independent_state() {
		let engine = engine(Some(MockWallet::connected()));
		engine
			.donation()
			.submit(&crate::forms::DonationInput {
				crowdfund_id: "cf_001".to_string(),
				amount: "0.1".to_string(),
				message: String::new(),
			})
			.await
			.unwrap();

		assert!(engine.orchestrator(FormKind::Donation).state().is_success);
		assert!(!engine.orchestrator(FormKind::Refund).state().is_success);
	}

	#[test]
	fn test_explorer_link() {
		assert_eq!(
			engine(None).explorer_url("0xabc"),
			"https://basescan.org/tx/0xabc"
		);
	}
}
