//! Form submission and state endpoints.

use super::APIError;
use crowdfund_core::forms::{CreationInput, DonationInput, RefundInput};
use crowdfund_core::{CrowdfundEngine, FormKind};
use crowdfund_types::TransactionState;
use serde::Serialize;

/// Transaction state plus a block explorer link once a hash is known.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
	#[serde(flatten)]
	pub state: TransactionState,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub explorer_url: Option<String>,
}

impl SubmissionResponse {
	fn new(engine: &CrowdfundEngine, state: TransactionState) -> Self {
		let explorer_url = state
			.transaction_hash
			.as_deref()
			.map(|hash| engine.explorer_url(hash));
		Self {
			state,
			explorer_url,
		}
	}
}

fn parse_form(form: &str) -> Result<FormKind, APIError> {
	form.parse::<FormKind>().map_err(APIError::not_found)
}

pub async fn create_campaign(
	engine: &CrowdfundEngine,
	input: CreationInput,
) -> Result<SubmissionResponse, APIError> {
	let state = engine.creation().submit(&input).await?;
	Ok(SubmissionResponse::new(engine, state))
}

pub async fn donate(
	engine: &CrowdfundEngine,
	input: DonationInput,
) -> Result<SubmissionResponse, APIError> {
	let state = engine.donation().submit(&input).await?;
	Ok(SubmissionResponse::new(engine, state))
}

pub async fn refund(
	engine: &CrowdfundEngine,
	input: RefundInput,
) -> Result<SubmissionResponse, APIError> {
	let state = engine.refund().submit(&input).await?;
	Ok(SubmissionResponse::new(engine, state))
}

pub fn state(engine: &CrowdfundEngine, form: &str) -> Result<SubmissionResponse, APIError> {
	let state = engine.orchestrator(parse_form(form)?).state();
	Ok(SubmissionResponse::new(engine, state))
}

pub fn reset(engine: &CrowdfundEngine, form: &str) -> Result<SubmissionResponse, APIError> {
	let orchestrator = engine.orchestrator(parse_form(form)?);
	orchestrator.reset();
	Ok(SubmissionResponse::new(engine, orchestrator.state()))
}
