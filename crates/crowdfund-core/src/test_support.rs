//! Test doubles for the trails and wallet seams.

use async_trait::async_trait;
use crowdfund_trails::{ApiError, TrailsInterface};
use crowdfund_types::{
	ConfigSchema, ExecutionAck, ExecutionHistory, ExecutionRecord, ReadResult, StepEvaluation,
	TrailMetadata, TrailRef, TransactionHash, TransactionRequest, UserInputs, ValidationError,
};
use crowdfund_wallet::{SignInProof, WalletError, WalletInterface};
use serde_json::json;
use std::sync::{Arc, Mutex};

pub const WALLET: &str = "0x1111111111111111111111111111111111111111";

#[derive(Debug, Clone)]
pub struct EvaluationCall {
	pub trail: TrailRef,
	pub step_number: u32,
	pub user_inputs: UserInputs,
	pub wallet_address: String,
}

enum EvaluationFailure {
	Status(u16),
	Network,
}

pub struct MockTrails {
	evaluation: StepEvaluation,
	evaluation_failure: Option<EvaluationFailure>,
	fail_submissions: bool,
	fail_history: bool,
	evaluations: Mutex<Vec<EvaluationCall>>,
	submissions: Mutex<Vec<ExecutionRecord>>,
	history_queries: Mutex<Vec<(TrailRef, Option<Vec<String>>)>>,
}

impl Default for MockTrails {
	fn default() -> Self {
		Self::with_evaluation(StepEvaluation {
			contract_address: "0x00000000000000000000000000000000000000aa".to_string(),
			call_data: "0xdeadbeef".to_string(),
			payable_amount: None,
		})
	}
}

impl MockTrails {
	pub fn with_evaluation(evaluation: StepEvaluation) -> Self {
		Self {
			evaluation,
			evaluation_failure: None,
			fail_submissions: false,
			fail_history: false,
			evaluations: Mutex::new(Vec::new()),
			submissions: Mutex::new(Vec::new()),
			history_queries: Mutex::new(Vec::new()),
		}
	}

	pub fn failing_evaluation_with_status(mut self, status: u16) -> Self {
		self.evaluation_failure = Some(EvaluationFailure::Status(status));
		self
	}

	pub fn failing_evaluation_with_network(mut self) -> Self {
		self.evaluation_failure = Some(EvaluationFailure::Network);
		self
	}

	pub fn failing_submissions(mut self) -> Self {
		self.fail_submissions = true;
		self
	}

	pub fn failing_history(mut self) -> Self {
		self.fail_history = true;
		self
	}

	pub fn evaluation_calls(&self) -> usize {
		self.evaluations.lock().unwrap().len()
	}

	pub fn last_evaluation(&self) -> Option<EvaluationCall> {
		self.evaluations.lock().unwrap().last().cloned()
	}

	pub fn submissions(&self) -> Vec<ExecutionRecord> {
		self.submissions.lock().unwrap().clone()
	}

	pub fn history_queries(&self) -> Vec<(TrailRef, Option<Vec<String>>)> {
		self.history_queries.lock().unwrap().clone()
	}
}

#[async_trait]
impl TrailsInterface for MockTrails {
	async fn get_trail_metadata(&self, trail: &TrailRef) -> Result<TrailMetadata, ApiError> {
		Ok(TrailMetadata(json!({ "id": trail.trail_id })))
	}

	async fn get_step_evaluation(
		&self,
		trail: &TrailRef,
		step_number: u32,
		user_inputs: &UserInputs,
		wallet_address: &str,
	) -> Result<StepEvaluation, ApiError> {
		self.evaluations.lock().unwrap().push(EvaluationCall {
			trail: trail.clone(),
			step_number,
			user_inputs: user_inputs.clone(),
			wallet_address: wallet_address.to_string(),
		});
		match self.evaluation_failure {
			Some(EvaluationFailure::Status(status)) => Err(ApiError::Status {
				status,
				status_text: "Internal Server Error".to_string(),
			}),
			Some(EvaluationFailure::Network) => {
				Err(ApiError::Network("connection refused".to_string()))
			},
			None => Ok(self.evaluation.clone()),
		}
	}

	async fn submit_execution(
		&self,
		_trail: &TrailRef,
		record: &ExecutionRecord,
	) -> Result<ExecutionAck, ApiError> {
		self.submissions.lock().unwrap().push(record.clone());
		if self.fail_submissions {
			return Err(ApiError::Status {
				status: 503,
				status_text: "Service Unavailable".to_string(),
			});
		}
		Ok(ExecutionAck(json!({ "ok": true })))
	}

	async fn get_execution_history(
		&self,
		trail: &TrailRef,
		wallet_addresses: Option<&[String]>,
	) -> Result<ExecutionHistory, ApiError> {
		self.history_queries
			.lock()
			.unwrap()
			.push((trail.clone(), wallet_addresses.map(<[String]>::to_vec)));
		if self.fail_history {
			return Err(ApiError::Network("timed out".to_string()));
		}
		Ok(ExecutionHistory(json!([{ "id": "exec_1" }])))
	}

	async fn read_trail_data(
		&self,
		_trail: &TrailRef,
		node_id: &str,
		wallet_address: Option<&str>,
	) -> Result<ReadResult, ApiError> {
		Ok(ReadResult(json!({
			"nodeId": node_id,
			"walletAddress": wallet_address,
		})))
	}
}

struct NoSchema;

impl ConfigSchema for NoSchema {
	fn validate(&self, _config: &toml::Value) -> Result<(), ValidationError> {
		Ok(())
	}
}

/// Wallet double; clones share recorded calls.
#[derive(Clone)]
pub struct MockWallet {
	authenticated: bool,
	linked: Vec<String>,
	failure: Option<String>,
	sent: Arc<Mutex<Vec<(TransactionRequest, String)>>>,
}

impl MockWallet {
	pub fn connected() -> Self {
		Self {
			authenticated: true,
			linked: vec![WALLET.to_string()],
			failure: None,
			sent: Arc::new(Mutex::new(Vec::new())),
		}
	}

	pub fn disconnected() -> Self {
		Self {
			authenticated: false,
			linked: Vec::new(),
			..Self::connected()
		}
	}

	pub fn failing_with(mut self, message: &str) -> Self {
		self.failure = Some(message.to_string());
		self
	}

	pub fn hash() -> TransactionHash {
		TransactionHash(vec![0xab; 32])
	}

	pub fn sent(&self) -> Vec<(TransactionRequest, String)> {
		self.sent.lock().unwrap().clone()
	}
}

#[async_trait]
impl WalletInterface for MockWallet {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(NoSchema)
	}

	async fn is_authenticated(&self) -> bool {
		self.authenticated
	}

	async fn linked_wallets(&self) -> Vec<String> {
		self.linked.clone()
	}

	async fn sign_in_with_nonce(&self, nonce: &str) -> Result<SignInProof, WalletError> {
		Ok(SignInProof {
			message: format!("nonce {}", nonce),
			signature: "0x00".to_string(),
		})
	}

	async fn send_transaction(
		&self,
		tx: &TransactionRequest,
		from: &str,
	) -> Result<TransactionHash, WalletError> {
		self.sent.lock().unwrap().push((tx.clone(), from.to_string()));
		match &self.failure {
			Some(message) => Err(WalletError::Broadcast(message.clone())),
			None => Ok(Self::hash()),
		}
	}

	async fn link_wallet(&self) -> Result<String, WalletError> {
		Ok(WALLET.to_string())
	}

	async fn logout(&self) -> Result<(), WalletError> {
		Ok(())
	}
}
