//! Transaction orchestration for trail steps.
//!
//! Turns a trail step plus user inputs into a broadcast transaction:
//! connectivity check, rate limit, step evaluation, then sign-and-broadcast
//! through the wallet. The outcome is published as a [`TransactionState`].
//! Recording the execution afterwards is best-effort and never changes the
//! published state.

use super::state::StateHolder;
use crate::rate_limit::RateLimiter;
use crowdfund_trails::{ApiError, TrailsInterface};
use crowdfund_types::{
	ExecutionRecord, ExecutionReference, TrailRef, TransactionHash, TransactionRequest,
	TransactionState, UserInputs,
};
use crowdfund_wallet::{WalletError, WalletService};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::watch;
use tracing::instrument;

/// Why an operation ended in the failed state.
///
/// The display strings are what users see.
#[derive(Debug, Error)]
pub enum TransactionError {
	/// No authenticated session with a linked wallet.
	#[error("Please connect your wallet first")]
	Connectivity,
	/// The trail service answered with a non-success status.
	#[error("API Error: {0}")]
	Api(ApiError),
	#[error("Network error. Please check your connection.")]
	Network,
	/// Signing or broadcast was rejected by the wallet provider.
	#[error("Wallet error: {0}")]
	Wallet(WalletError),
	#[error("An unexpected error occurred.")]
	Unclassified,
}

impl From<ApiError> for TransactionError {
	fn from(error: ApiError) -> Self {
		match error {
			ApiError::Status { .. } => TransactionError::Api(error),
			ApiError::Network(_) => TransactionError::Network,
			ApiError::Decode(_) | ApiError::InvalidRequest(_) => TransactionError::Unclassified,
		}
	}
}

impl From<WalletError> for TransactionError {
	fn from(error: WalletError) -> Self {
		TransactionError::Wallet(error)
	}
}

/// Errors returned instead of running an operation.
#[derive(Debug, Error)]
pub enum OrchestratorError {
	#[error("Another transaction is already in progress")]
	InFlight,
}

/// Which operation, if any, owns the published state.
///
/// Every start and every reset opens a new generation. An operation only
/// publishes while its generation is still the current one.
#[derive(Debug, Default)]
struct Ownership {
	generation: u64,
	running: bool,
}

fn lock(ownership: &Mutex<Ownership>) -> MutexGuard<'_, Ownership> {
	ownership.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Claim on the state held by a running operation.
///
/// Releases the running flag on drop unless a reset already took it over.
struct OperationGuard<'a> {
	ownership: &'a Mutex<Ownership>,
	generation: u64,
}

impl OperationGuard<'_> {
	/// Publishes `state` unless the operation was abandoned by a reset.
	fn publish(&self, holder: &StateHolder, state: TransactionState) -> bool {
		let ownership = lock(self.ownership);
		if ownership.generation != self.generation {
			return false;
		}
		holder.publish(state);
		true
	}
}

impl Drop for OperationGuard<'_> {
	fn drop(&mut self) {
		let mut ownership = lock(self.ownership);
		if ownership.generation == self.generation {
			ownership.running = false;
		}
	}
}

/// Runs trail steps for one form and publishes their outcome.
///
/// At most one operation runs at a time; a second submission while one is
/// loading is rejected without touching the state. A reset abandons the
/// running operation: its outcome is returned to its caller but never
/// published.
pub struct TransactionOrchestrator {
	trails: Arc<dyn TrailsInterface>,
	/// Absent when the identity layer is disabled.
	wallet: Option<Arc<WalletService>>,
	rate_limiter: Arc<RateLimiter>,
	state: StateHolder,
	ownership: Mutex<Ownership>,
}

impl TransactionOrchestrator {
	pub fn new(
		trails: Arc<dyn TrailsInterface>,
		wallet: Option<Arc<WalletService>>,
		rate_limiter: Arc<RateLimiter>,
	) -> Self {
		Self {
			trails,
			wallet,
			rate_limiter,
			state: StateHolder::new(),
			ownership: Mutex::new(Ownership::default()),
		}
	}

	/// Current state snapshot.
	pub fn state(&self) -> TransactionState {
		self.state.current()
	}

	/// Subscribes to state changes.
	pub fn subscribe(&self) -> watch::Receiver<TransactionState> {
		self.state.subscribe()
	}

	/// Returns to the idle state, abandoning any running operation.
	pub fn reset(&self) {
		let mut ownership = lock(&self.ownership);
		if ownership.running {
			tracing::debug!("Abandoning running operation");
		}
		ownership.generation += 1;
		ownership.running = false;
		self.state.publish(TransactionState::idle());
	}

	/// Address transactions are sent from, if a wallet session is connected.
	pub async fn connected_address(&self) -> Option<String> {
		match &self.wallet {
			Some(wallet) => wallet.connected_address().await,
			None => None,
		}
	}

	/// Evaluates `step_number` of `trail` and broadcasts the resulting
	/// transaction from the connected wallet.
	///
	/// Returns the terminal state, which is also published unless a reset
	/// happened meanwhile. Failures of the operation itself are reported
	/// through the state, not as `Err`.
	#[instrument(skip(self, user_inputs), fields(trail_id = %trail.trail_id, step = step_number))]
	pub async fn execute_step(
		&self,
		trail: &TrailRef,
		step_number: u32,
		node_id: &str,
		user_inputs: &UserInputs,
	) -> Result<TransactionState, OrchestratorError> {
		let guard = self.begin()?;

		let Some(address) = self.connected_address().await else {
			tracing::warn!("No connected wallet, refusing to execute step");
			let state = TransactionState::failed(TransactionError::Connectivity.to_string());
			guard.publish(&self.state, state.clone());
			return Ok(state);
		};

		guard.publish(&self.state, TransactionState::loading());

		let state = match self
			.evaluate_and_send(trail, step_number, user_inputs, &address)
			.await
		{
			Ok(hash) => {
				tracing::info!(tx_hash = %hash, node_id, "Transaction sent");
				TransactionState::success(hash.to_hex())
			},
			Err(e) => {
				tracing::warn!(error = %e, node_id, "Transaction failed");
				TransactionState::failed(e.to_string())
			},
		};

		if !guard.publish(&self.state, state.clone()) {
			tracing::info!(
				node_id,
				status = ?state.status(),
				"Operation was reset, outcome not published"
			);
		}
		Ok(state)
	}

	/// Records a broadcast transaction against the trail's execution history.
	///
	/// Failures are logged only.
	#[instrument(skip(self), fields(trail_id = %trail.trail_id))]
	pub async fn record_execution(&self, trail: &TrailRef, node_id: &str, transaction_hash: &str) {
		let Some(wallet_address) = self.connected_address().await else {
			tracing::debug!("No connected wallet, skipping execution record");
			return;
		};

		let record = ExecutionRecord {
			node_id: node_id.to_string(),
			transaction_hash: transaction_hash.to_string(),
			wallet_address,
			execution: ExecutionReference::Latest,
		};

		match self.trails.submit_execution(trail, &record).await {
			Ok(_) => tracing::debug!(tx_hash = %transaction_hash, "Execution recorded"),
			Err(e) => {
				tracing::warn!(error = %e, tx_hash = %transaction_hash, "Failed to record execution")
			},
		}
	}

	fn begin(&self) -> Result<OperationGuard<'_>, OrchestratorError> {
		let mut ownership = lock(&self.ownership);
		if ownership.running {
			return Err(OrchestratorError::InFlight);
		}
		ownership.generation += 1;
		ownership.running = true;
		Ok(OperationGuard {
			ownership: &self.ownership,
			generation: ownership.generation,
		})
	}

	async fn evaluate_and_send(
		&self,
		trail: &TrailRef,
		step_number: u32,
		user_inputs: &UserInputs,
		address: &str,
	) -> Result<TransactionHash, TransactionError> {
		let wallet = self.wallet.as_ref().ok_or(TransactionError::Connectivity)?;

		self.rate_limiter.acquire().await;

		let evaluation = self
			.trails
			.get_step_evaluation(trail, step_number, user_inputs, address)
			.await?;

		let request = TransactionRequest {
			to: evaluation.contract_address.clone(),
			data: evaluation.call_data.clone(),
			value: evaluation.value(),
		};

		Ok(wallet.send_transaction(&request, address).await?)
	}
}
