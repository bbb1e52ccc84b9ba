//! Transaction types for the crowdfund system.
//!
//! Covers the request handed to the wallet for signing and broadcast, the
//! resulting hash, and the three-state result exposed to form controllers.

use serde::{Deserialize, Serialize};

use crate::utils::with_0x_prefix;

/// Blockchain transaction hash.
///
/// Stores the raw hash bytes as returned by the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHash(pub Vec<u8>);

impl TransactionHash {
	/// Returns the hash as a 0x-prefixed lowercase hex string.
	pub fn to_hex(&self) -> String {
		with_0x_prefix(&hex::encode(&self.0))
	}
}

impl std::fmt::Display for TransactionHash {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.to_hex())
	}
}

/// Transaction to be signed and broadcast by the wallet provider.
///
/// All fields are forwarded verbatim from the trail evaluation: the target
/// contract, the opaque call data and the payable amount in wei.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
	/// Target contract address (0x-prefixed hex).
	pub to: String,
	/// Hex-encoded call data.
	pub data: String,
	/// Payable amount in wei as a decimal string.
	pub value: String,
}

/// Observable result of a single orchestrated operation.
///
/// After leaving the idle state exactly one of the following holds:
/// loading, success with a hash, or an error message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionState {
	pub is_loading: bool,
	pub is_success: bool,
	pub error: Option<String>,
	pub transaction_hash: Option<String>,
}

impl TransactionState {
	/// Initial state, also reached through an explicit reset.
	pub fn idle() -> Self {
		Self::default()
	}

	pub fn loading() -> Self {
		Self {
			is_loading: true,
			..Self::default()
		}
	}

	pub fn success(transaction_hash: impl Into<String>) -> Self {
		Self {
			is_success: true,
			transaction_hash: Some(transaction_hash.into()),
			..Self::default()
		}
	}

	pub fn failed(error: impl Into<String>) -> Self {
		Self {
			error: Some(error.into()),
			..Self::default()
		}
	}

	/// Returns the coarse lifecycle status derived from the flags.
	pub fn status(&self) -> TransactionStatus {
		if self.is_loading {
			TransactionStatus::Loading
		} else if self.is_success {
			TransactionStatus::Success
		} else if self.error.is_some() {
			TransactionStatus::Failed
		} else {
			TransactionStatus::Idle
		}
	}
}

/// Lifecycle of an orchestrated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
	Idle,
	Loading,
	Success,
	Failed,
}

impl TransactionStatus {
	/// Whether the operation has finished, successfully or not.
	pub fn is_terminal(self) -> bool {
		matches!(self, TransactionStatus::Success | TransactionStatus::Failed)
	}
}
