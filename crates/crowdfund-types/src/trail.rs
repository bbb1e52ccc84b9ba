//! Trail API types.
//!
//! Request and response bodies exchanged with the trails workflow service.
//! The service speaks camelCase JSON; the structs below rename accordingly.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Identifies one version of a trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailRef {
	pub trail_id: String,
	pub version_id: String,
}

impl TrailRef {
	pub fn new(trail_id: impl Into<String>, version_id: impl Into<String>) -> Self {
		Self {
			trail_id: trail_id.into(),
			version_id: version_id.into(),
		}
	}
}

/// A single user-supplied input value, always string-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputValue {
	pub value: String,
}

impl InputValue {
	pub fn new(value: impl ToString) -> Self {
		Self {
			value: value.to_string(),
		}
	}
}

/// User inputs keyed by node id, then by input field name.
pub type UserInputs = BTreeMap<String, BTreeMap<String, InputValue>>;

/// Body of a step evaluation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEvaluationRequest {
	pub user_inputs: UserInputs,
	pub wallet_address: String,
}

/// Call data produced by the trail for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEvaluation {
	/// Target contract address.
	pub contract_address: String,
	/// Opaque hex-encoded call data.
	pub call_data: String,
	/// Payable amount in wei; absent means zero.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub payable_amount: Option<String>,
}

impl StepEvaluation {
	/// Payable amount with the zero default applied.
	pub fn value(&self) -> String {
		self.payable_amount
			.clone()
			.filter(|v| !v.is_empty())
			.unwrap_or_else(|| "0".to_string())
	}
}

/// How an execution record attaches to server-side execution history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExecutionReference {
	/// Attach to the wallet's latest execution.
	Latest,
	/// Start a new execution.
	New {
		#[serde(rename = "executionId", default, skip_serializing_if = "Option::is_none")]
		execution_id: Option<String>,
	},
	/// Attach to an explicitly named execution.
	Manual {
		#[serde(rename = "executionId")]
		execution_id: String,
	},
}

/// Record posted after a transaction has been broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
	pub node_id: String,
	pub transaction_hash: String,
	pub wallet_address: String,
	pub execution: ExecutionReference,
}

/// Body of an execution history query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionQuery {
	pub wallet_addresses: Vec<String>,
}

/// Body of a read node request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRequest {
	pub wallet_address: String,
}

/// Acknowledgement returned by the executions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionAck(pub Value);

/// Execution history as returned by the service.
///
/// The service does not commit to a history schema, so the body is kept as
/// raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExecutionHistory(pub Value);

impl ExecutionHistory {
	/// Number of entries in the history, accepting either a bare array or an
	/// object wrapping one under `executions`.
	pub fn len(&self) -> usize {
		match &self.0 {
			Value::Array(items) => items.len(),
			Value::Object(map) => map
				.get("executions")
				.and_then(Value::as_array)
				.map(Vec::len)
				.unwrap_or(0),
			_ => 0,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Result of a read node call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadResult(pub Value);

/// Trail metadata including steps and input requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrailMetadata(pub Value);

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_evaluation_value_defaults_to_zero() {
		let evaluation: StepEvaluation = serde_json::from_value(json!({
			"contractAddress": "0x1234",
			"callData": "0xdeadbeef"
		}))
		.unwrap();
		assert_eq!(evaluation.value(), "0");

		let evaluation: StepEvaluation = serde_json::from_value(json!({
			"contractAddress": "0x1234",
			"callData": "0xdeadbeef",
			"payableAmount": "1000000000000000"
		}))
		.unwrap();
		assert_eq!(evaluation.value(), "1000000000000000");
	}

	#[test]
	fn test_execution_reference_wire_format() {
		let record = ExecutionRecord {
			node_id: "donate_node".to_string(),
			transaction_hash: "0xabc".to_string(),
			wallet_address: "0xdef".to_string(),
			execution: ExecutionReference::Latest,
		};
		assert_eq!(
			serde_json::to_value(&record).unwrap(),
			json!({
				"nodeId": "donate_node",
				"transactionHash": "0xabc",
				"walletAddress": "0xdef",
				"execution": { "type": "latest" }
			})
		);

		let manual = ExecutionReference::Manual {
			execution_id: "exec-1".to_string(),
		};
		assert_eq!(
			serde_json::to_value(&manual).unwrap(),
			json!({ "type": "manual", "executionId": "exec-1" })
		);
	}

	#[test]
	fn test_history_len() {
		assert_eq!(ExecutionHistory(json!([1, 2, 3])).len(), 3);
		assert_eq!(
			ExecutionHistory(json!({ "executions": [1] })).len(),
			1
		);
		assert!(ExecutionHistory(json!({})).is_empty());
	}
}
