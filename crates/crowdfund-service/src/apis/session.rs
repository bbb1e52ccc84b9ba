//! Wallet session endpoints.

use super::APIError;
use crowdfund_core::{CrowdfundEngine, SessionSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
	pub nonce: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
	pub message: String,
	pub signature: String,
	pub session: SessionSummary,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
	pub address: String,
}

pub async fn get_session(engine: &CrowdfundEngine) -> SessionSummary {
	engine.session().await
}

/// Signs in by signing a message containing the caller's nonce.
pub async fn login(engine: &CrowdfundEngine, request: LoginRequest) -> Result<LoginResponse, APIError> {
	let wallet = engine.wallet().ok_or_else(APIError::wallet_disabled)?;
	if request.nonce.trim().is_empty() {
		return Err(APIError::BadRequest {
			error_type: "INVALID_INPUT".to_string(),
			message: "nonce is required".to_string(),
		});
	}

	let proof = wallet.sign_in(&request.nonce).await?;
	tracing::info!("Wallet session signed in");

	Ok(LoginResponse {
		message: proof.message,
		signature: proof.signature,
		session: engine.session().await,
	})
}

pub async fn link(engine: &CrowdfundEngine) -> Result<LinkResponse, APIError> {
	let wallet = engine.wallet().ok_or_else(APIError::wallet_disabled)?;
	let address = wallet.link_wallet().await?;
	Ok(LinkResponse { address })
}

pub async fn logout(engine: &CrowdfundEngine) -> Result<SessionSummary, APIError> {
	let wallet = engine.wallet().ok_or_else(APIError::wallet_disabled)?;
	wallet.logout().await?;
	tracing::info!("Wallet session logged out");
	Ok(engine.session().await)
}
