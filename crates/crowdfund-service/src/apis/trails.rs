//! Pass-through access to trail metadata and read nodes.

use super::APIError;
use crowdfund_core::{CrowdfundEngine, TrailKind};
use crowdfund_types::{ReadResult, TrailMetadata};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadRequestBody {
	/// Wallet to read for; defaults to the connected wallet, then the zero
	/// address.
	#[serde(default)]
	pub wallet_address: Option<String>,
}

fn parse_trail(trail: &str) -> Result<TrailKind, APIError> {
	trail.parse::<TrailKind>().map_err(APIError::not_found)
}

pub async fn metadata(engine: &CrowdfundEngine, trail: &str) -> Result<TrailMetadata, APIError> {
	let trail = engine.trail(parse_trail(trail)?);
	Ok(engine.trails().get_trail_metadata(trail).await?)
}

pub async fn read_node(
	engine: &CrowdfundEngine,
	trail: &str,
	node_id: &str,
	body: ReadRequestBody,
) -> Result<ReadResult, APIError> {
	let trail = engine.trail(parse_trail(trail)?);
	let wallet_address = match body.wallet_address {
		Some(address) => Some(address),
		None => engine.session().await.address,
	};
	Ok(engine
		.trails()
		.read_trail_data(trail, node_id, wallet_address.as_deref())
		.await?)
}
