//! Local key wallet backed by Alloy.
//!
//! Holds a single private key, signs with it, and broadcasts through an HTTP
//! RPC endpoint. The key's address is the only wallet that can be linked.

use crate::{SignInProof, WalletError, WalletFactory, WalletInterface, WalletRegistry};
use alloy_network::EthereumWallet;
use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest as AlloyTransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport_http::Http;
use async_trait::async_trait;
use crowdfund_types::{
	with_0x_prefix, without_0x_prefix, ConfigSchema, Field, FieldType, ImplementationRegistry,
	Schema, SecretString, TransactionHash, TransactionRequest, ValidationError,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Base mainnet.
const DEFAULT_CHAIN_ID: u64 = 8453;

type HttpProvider = Arc<dyn Provider<Http<reqwest::Client>> + Send + Sync>;

#[derive(Debug, Default)]
struct SessionState {
	authenticated: bool,
	linked: Vec<String>,
}

/// Wallet signing with a locally held private key.
pub struct LocalWallet {
	signer: PrivateKeySigner,
	provider: HttpProvider,
	state: RwLock<SessionState>,
}

impl LocalWallet {
	/// Creates a wallet for `private_key` broadcasting through `rpc_url`.
	///
	/// With `auto_sign_in` the key's address starts linked and authenticated,
	/// mirroring an embedded host that logs the user in on load.
	pub fn new(
		private_key: &SecretString,
		rpc_url: &str,
		chain_id: u64,
		auto_sign_in: bool,
	) -> Result<Self, WalletError> {
		let signer: PrivateKeySigner = private_key.with_exposed(|key| {
			key.parse()
				.map_err(|_| WalletError::Configuration("Invalid private key format".to_string()))
		})?;
		let signer = signer.with_chain_id(Some(chain_id));

		let url: reqwest::Url = rpc_url.parse().map_err(|e| {
			WalletError::Configuration(format!("Invalid RPC URL '{}': {}", rpc_url, e))
		})?;

		let provider = ProviderBuilder::new()
			.with_recommended_fillers()
			.wallet(EthereumWallet::from(signer.clone()))
			.on_http(url);

		let mut state = SessionState::default();
		if auto_sign_in {
			state.authenticated = true;
			state.linked.push(signer.address().to_string());
		}

		tracing::info!(
			address = %signer.address(),
			chain_id,
			authenticated = state.authenticated,
			"Initialized local wallet"
		);

		Ok(Self {
			signer,
			provider: Arc::new(provider),
			state: RwLock::new(state),
		})
	}

	pub fn address(&self) -> Address {
		self.signer.address()
	}

	fn to_alloy_request(&self, tx: &TransactionRequest) -> Result<AlloyTransactionRequest, WalletError> {
		let to: Address = tx
			.to
			.parse()
			.map_err(|e| WalletError::InvalidTransaction(format!("Invalid target address: {}", e)))?;
		let data = hex::decode(without_0x_prefix(&tx.data))
			.map_err(|e| WalletError::InvalidTransaction(format!("Invalid call data: {}", e)))?;
		let value = U256::from_str_radix(tx.value.trim(), 10)
			.map_err(|e| WalletError::InvalidTransaction(format!("Invalid value: {}", e)))?;

		Ok(AlloyTransactionRequest::default()
			.from(self.signer.address())
			.to(to)
			.input(Bytes::from(data).into())
			.value(value))
	}
}

/// Configuration schema for the local wallet.
pub struct LocalWalletSchema;

impl ConfigSchema for LocalWalletSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("private_key", FieldType::String),
				Field::new("rpc_url", FieldType::String).with_validator(|value| {
					match value.as_str() {
						Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
							Ok(())
						},
						_ => Err("rpc_url must be an http(s) URL".to_string()),
					}
				}),
			],
			vec![
				Field::new(
					"chain_id",
					FieldType::Integer {
						min: Some(1),
						max: None,
					},
				),
				Field::new("auto_sign_in", FieldType::Boolean),
			],
		);
		schema.validate(config)
	}
}

#[async_trait]
impl WalletInterface for LocalWallet {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LocalWalletSchema)
	}

	async fn is_authenticated(&self) -> bool {
		self.state.read().await.authenticated
	}

	async fn linked_wallets(&self) -> Vec<String> {
		self.state.read().await.linked.clone()
	}

	async fn sign_in_with_nonce(&self, nonce: &str) -> Result<SignInProof, WalletError> {
		let message = format!(
			"Sign in with your Ethereum account:\n{}\n\nChain ID: {}\nNonce: {}",
			self.signer.address(),
			self.signer.chain_id().unwrap_or(DEFAULT_CHAIN_ID),
			nonce
		);
		let signature = self
			.signer
			.sign_message(message.as_bytes())
			.await
			.map_err(|e| WalletError::SigningFailed(e.to_string()))?;

		let mut state = self.state.write().await;
		state.authenticated = true;
		let address = self.signer.address().to_string();
		if !state.linked.contains(&address) {
			state.linked.push(address);
		}

		Ok(SignInProof {
			message,
			signature: with_0x_prefix(&hex::encode(signature.as_bytes())),
		})
	}

	async fn send_transaction(
		&self,
		tx: &TransactionRequest,
		from: &str,
	) -> Result<TransactionHash, WalletError> {
		{
			let state = self.state.read().await;
			if !state.authenticated {
				return Err(WalletError::NotAuthenticated);
			}
			if !state.linked.iter().any(|a| a.eq_ignore_ascii_case(from)) {
				return Err(WalletError::NotLinked(from.to_string()));
			}
		}

		let request = self.to_alloy_request(tx)?;

		let pending_tx = self
			.provider
			.send_transaction(request)
			.await
			.map_err(|e| WalletError::Broadcast(format!("Failed to send transaction: {}", e)))?;

		let hash = TransactionHash(pending_tx.tx_hash().0.to_vec());
		tracing::info!(tx_hash = %hash, to = %tx.to, "Submitted transaction");
		Ok(hash)
	}

	async fn link_wallet(&self) -> Result<String, WalletError> {
		let address = self.signer.address().to_string();
		let mut state = self.state.write().await;
		if !state.linked.contains(&address) {
			state.linked.push(address.clone());
		}
		Ok(address)
	}

	async fn logout(&self) -> Result<(), WalletError> {
		let mut state = self.state.write().await;
		state.authenticated = false;
		state.linked.clear();
		Ok(())
	}
}

/// Factory function to create a local wallet from configuration.
///
/// Configuration parameters:
/// - `private_key`: hex private key (required)
/// - `rpc_url`: HTTP RPC endpoint used for broadcasting (required)
/// - `chain_id`: chain to sign for, defaults to Base (8453)
/// - `auto_sign_in`: start authenticated, defaults to true
pub fn create_wallet(config: &toml::Value) -> Result<Box<dyn WalletInterface>, WalletError> {
	LocalWalletSchema
		.validate(config)
		.map_err(|e| WalletError::Configuration(format!("Invalid configuration: {}", e)))?;

	let private_key = config
		.get("private_key")
		.and_then(|v| v.as_str())
		.map(SecretString::from)
		.ok_or_else(|| WalletError::Configuration("private_key is required".to_string()))?;
	let rpc_url = config
		.get("rpc_url")
		.and_then(|v| v.as_str())
		.ok_or_else(|| WalletError::Configuration("rpc_url is required".to_string()))?;
	let chain_id = config
		.get("chain_id")
		.and_then(|v| v.as_integer())
		.map(|id| id as u64)
		.unwrap_or(DEFAULT_CHAIN_ID);
	let auto_sign_in = config
		.get("auto_sign_in")
		.and_then(|v| v.as_bool())
		.unwrap_or(true);

	Ok(Box::new(LocalWallet::new(
		&private_key,
		rpc_url,
		chain_id,
		auto_sign_in,
	)?))
}

/// Registry for the local wallet implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "local";
	type Factory = WalletFactory;

	fn factory() -> Self::Factory {
		create_wallet
	}
}

impl WalletRegistry for Registry {}
