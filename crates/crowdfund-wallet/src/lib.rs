//! Wallet and identity module for the crowdfund system.
//!
//! The orchestrator only needs two things from a wallet provider: the
//! address of the connected account and the ability to sign and broadcast a
//! transaction from it. [`WalletInterface`] captures that together with the
//! small session surface (sign-in, linking, logout) the service exposes.
//! Wallet lifecycle is owned by the implementation, not by callers.

use async_trait::async_trait;
use crowdfund_types::{ConfigSchema, ImplementationRegistry, TransactionHash, TransactionRequest};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod local;
}

/// Proof of a nonce-based sign-in: the signed message and its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInProof {
	pub message: String,
	/// 0x-prefixed hex signature.
	pub signature: String,
}

/// Errors that can occur during wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
	/// No authenticated session.
	#[error("Wallet session is not authenticated")]
	NotAuthenticated,
	/// The requested sending address is not linked to this session.
	#[error("Wallet {0} is not linked")]
	NotLinked(String),
	/// The transaction fields could not be converted for signing.
	#[error("Invalid transaction: {0}")]
	InvalidTransaction(String),
	/// Signing failed.
	#[error("Signing failed: {0}")]
	SigningFailed(String),
	/// The provider refused or failed to broadcast the transaction.
	#[error("{0}")]
	Broadcast(String),
	/// The implementation configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for wallet providers.
#[async_trait]
pub trait WalletInterface: Send + Sync {
	/// Returns the configuration schema for this wallet implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Whether the current session is authenticated.
	async fn is_authenticated(&self) -> bool;

	/// Addresses of wallets linked to the session, primary first.
	async fn linked_wallets(&self) -> Vec<String>;

	/// Authenticates by signing a login message containing `nonce`.
	async fn sign_in_with_nonce(&self, nonce: &str) -> Result<SignInProof, WalletError>;

	/// Signs and broadcasts `tx` from `from`, returning the transaction hash.
	async fn send_transaction(
		&self,
		tx: &TransactionRequest,
		from: &str,
	) -> Result<TransactionHash, WalletError>;

	/// Links the implementation's wallet to the session and returns its address.
	async fn link_wallet(&self) -> Result<String, WalletError>;

	/// Ends the session and unlinks all wallets.
	async fn logout(&self) -> Result<(), WalletError>;
}

/// Type alias for wallet factory functions.
pub type WalletFactory = fn(&toml::Value) -> Result<Box<dyn WalletInterface>, WalletError>;

/// Registry trait for wallet implementations.
pub trait WalletRegistry: ImplementationRegistry<Factory = WalletFactory> {}

/// Get all registered wallet implementations.
pub fn get_all_implementations() -> Vec<(&'static str, WalletFactory)> {
	use implementations::local;

	vec![(local::Registry::NAME, local::Registry::factory())]
}

/// Snapshot of the wallet session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSession {
	pub authenticated: bool,
	/// First linked wallet, if any.
	pub address: Option<String>,
}

impl WalletSession {
	/// A session can transact only when authenticated with a linked wallet.
	pub fn connected_address(&self) -> Option<&str> {
		self.address.as_deref().filter(|_| self.authenticated)
	}
}

/// Service wrapping the configured wallet implementation.
pub struct WalletService {
	implementation: Box<dyn WalletInterface>,
}

impl WalletService {
	pub fn new(implementation: Box<dyn WalletInterface>) -> Self {
		Self { implementation }
	}

	/// Builds the service from the named implementation's configuration table.
	pub fn from_config(name: &str, config: &toml::Value) -> Result<Self, WalletError> {
		let factory = get_all_implementations()
			.into_iter()
			.find(|(registered, _)| *registered == name)
			.map(|(_, factory)| factory)
			.ok_or_else(|| {
				WalletError::Configuration(format!("Unknown wallet implementation '{}'", name))
			})?;
		Ok(Self::new(factory(config)?))
	}

	/// Current authentication status and primary address.
	pub async fn session(&self) -> WalletSession {
		let authenticated = self.implementation.is_authenticated().await;
		let address = self.implementation.linked_wallets().await.into_iter().next();
		WalletSession {
			authenticated,
			address,
		}
	}

	/// The address transactions are sent from, if the session is connected.
	pub async fn connected_address(&self) -> Option<String> {
		self.session().await.connected_address().map(str::to_string)
	}

	pub async fn sign_in(&self, nonce: &str) -> Result<SignInProof, WalletError> {
		self.implementation.sign_in_with_nonce(nonce).await
	}

	pub async fn send_transaction(
		&self,
		tx: &TransactionRequest,
		from: &str,
	) -> Result<TransactionHash, WalletError> {
		self.implementation.send_transaction(tx, from).await
	}

	pub async fn link_wallet(&self) -> Result<String, WalletError> {
		self.implementation.link_wallet().await
	}

	pub async fn logout(&self) -> Result<(), WalletError> {
		self.implementation.logout().await
	}
}
