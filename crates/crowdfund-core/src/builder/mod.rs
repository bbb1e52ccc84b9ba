//! Builder for constructing a crowdfund engine from configuration.
//!
//! The trails client and campaign directory can be overridden, which is how
//! tests and alternative deployments swap in their own implementations.

use crate::directory::{CampaignDirectory, PlaceholderDirectory};
use crate::engine::CrowdfundEngine;
use crate::rate_limit::RateLimiter;
use crowdfund_config::Config;
use crowdfund_trails::implementations::http::HttpTrailsClient;
use crowdfund_trails::TrailsInterface;
use crowdfund_wallet::WalletService;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during engine construction.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Missing required component: {0}")]
	MissingComponent(String),
}

/// Builder for [`CrowdfundEngine`].
pub struct CrowdfundBuilder {
	config: Config,
	trails: Option<Arc<dyn TrailsInterface>>,
	directory: Option<Arc<dyn CampaignDirectory>>,
}

impl CrowdfundBuilder {
	pub fn new(config: Config) -> Self {
		Self {
			config,
			trails: None,
			directory: None,
		}
	}

	/// Uses `trails` instead of the HTTP client built from configuration.
	pub fn with_trails(mut self, trails: Arc<dyn TrailsInterface>) -> Self {
		self.trails = Some(trails);
		self
	}

	/// Uses `directory` instead of the placeholder listings.
	pub fn with_directory(mut self, directory: Arc<dyn CampaignDirectory>) -> Self {
		self.directory = Some(directory);
		self
	}

	pub fn build(self) -> Result<CrowdfundEngine, BuilderError> {
		let trails = match self.trails {
			Some(trails) => trails,
			None => Arc::new(
				HttpTrailsClient::from_config(&self.config.trails)
					.map_err(|e| BuilderError::Config(e.to_string()))?,
			),
		};

		let wallet = if self.config.wallet_enabled() {
			let wallet_config = self.config.wallet.as_ref().ok_or_else(|| {
				BuilderError::MissingComponent("wallet configuration".to_string())
			})?;
			let implementation = wallet_config
				.implementations
				.get(&wallet_config.primary)
				.ok_or_else(|| {
					BuilderError::MissingComponent(format!(
						"wallet implementation '{}'",
						wallet_config.primary
					))
				})?;
			let service = WalletService::from_config(&wallet_config.primary, implementation)
				.map_err(|e| BuilderError::Config(e.to_string()))?;
			tracing::info!(implementation = %wallet_config.primary, "Loaded wallet");
			Some(Arc::new(service))
		} else {
			tracing::warn!("Identity provider not configured, running read-only");
			None
		};

		let directory = self
			.directory
			.unwrap_or_else(|| Arc::new(PlaceholderDirectory::new()));
		let rate_limiter = Arc::new(RateLimiter::new(Duration::from_millis(
			self.config.trails.min_interval_ms,
		)));

		Ok(CrowdfundEngine::new(
			self.config,
			trails,
			wallet,
			directory,
			rate_limiter,
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_support::MockTrails;

	#[tokio::test]
	async fn test_build_without_identity_is_read_only() {
		let mut config = Config::default();
		config.identity.app_id = None;

		let engine = CrowdfundBuilder::new(config).build().unwrap();
		assert!(engine.wallet().is_none());
		assert!(!engine.session().await.identity_enabled);
	}

	#[tokio::test]
	async fn test_build_with_local_wallet() {
		let config: Config = r#"
			[identity]
			app_id = "privy-app"

			[wallet]
			primary = "local"

			[wallet.implementations.local]
			private_key = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
			rpc_url = "http://127.0.0.1:8545"
		"#
		.parse()
		.unwrap();

		let engine = CrowdfundBuilder::new(config)
			.with_trails(Arc::new(MockTrails::default()))
			.build()
			.unwrap();
		assert!(engine.wallet().is_some());
	}

	#[test]
	fn test_unknown_wallet_implementation_fails() {
		let mut config = Config::default();
		config.identity.app_id = Some("privy-app".to_string());
		config.wallet = Some(crowdfund_config::WalletConfig {
			primary: "hardware".to_string(),
			implementations: [("hardware".to_string(), toml::Value::Table(Default::default()))]
				.into_iter()
				.collect(),
		});

		let result = CrowdfundBuilder::new(config).build();
		assert!(matches!(result, Err(BuilderError::Config(_))));
	}
}
