//! reqwest-backed trails client.
//!
//! Every request goes to the configured base URL with a JSON content type
//! and the `Herd-Trail-App-Id` header identifying this application. Trail,
//! version and node ids are appended as single percent-encoded path
//! segments, so an id can never reach another endpoint.

use crate::{ApiError, TrailsInterface};
use async_trait::async_trait;
use crowdfund_config::TrailsConfig;
use crowdfund_types::{
	truncate_id, ExecutionAck, ExecutionHistory, ExecutionQuery, ExecutionRecord, ReadRequest,
	ReadResult, StepEvaluation, StepEvaluationRequest, TrailMetadata, TrailRef, UserInputs,
	ZERO_ADDRESS,
};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Header carrying the application token on every request.
pub const APP_ID_HEADER: &str = "Herd-Trail-App-Id";

/// HTTP client for the trails API.
#[derive(Clone)]
pub struct HttpTrailsClient {
	client: Client,
	base_url: Url,
}

impl HttpTrailsClient {
	/// Creates a client for `base_url` sending `app_id` with every request.
	pub fn new(base_url: &str, app_id: &str, timeout: Duration) -> Result<Self, ApiError> {
		let mut headers = HeaderMap::new();
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		headers.insert(
			APP_ID_HEADER,
			HeaderValue::from_str(app_id)
				.map_err(|e| ApiError::InvalidRequest(format!("Invalid app id header: {}", e)))?,
		);

		let client = Client::builder()
			.default_headers(headers)
			.timeout(timeout)
			.pool_idle_timeout(Duration::from_secs(90))
			.build()
			.map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

		let base_url = Url::parse(base_url).map_err(|e| {
			ApiError::InvalidRequest(format!("Invalid base URL '{}': {}", base_url, e))
		})?;
		if base_url.cannot_be_a_base() {
			return Err(ApiError::InvalidRequest(format!(
				"Base URL '{}' cannot carry a path",
				base_url
			)));
		}

		Ok(Self { client, base_url })
	}

	/// Creates a client from the `[trails]` configuration section.
	pub fn from_config(config: &TrailsConfig) -> Result<Self, ApiError> {
		Self::new(
			&config.base_url,
			&config.app_id,
			Duration::from_secs(config.timeout_seconds),
		)
	}

	/// Builds `{base}/trails/{trail}/versions/{version}/{tail..}`.
	fn endpoint(&self, trail: &TrailRef, tail: &[&str]) -> Result<Url, ApiError> {
		let mut url = self.base_url.clone();
		{
			let mut segments = url
				.path_segments_mut()
				.map_err(|_| ApiError::InvalidRequest("Base URL cannot carry a path".to_string()))?;
			segments.pop_if_empty();
			let ids = [
				"trails",
				trail.trail_id.as_str(),
				"versions",
				trail.version_id.as_str(),
			];
			for segment in ids.into_iter().chain(tail.iter().copied()) {
				if matches!(segment, "" | "." | "..") {
					return Err(ApiError::InvalidRequest(format!(
						"Invalid path segment '{}'",
						segment
					)));
				}
				segments.push(segment);
			}
		}
		Ok(url)
	}

	async fn call<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> Result<T, ApiError>
	where
		B: Serialize + ?Sized + Sync,
		T: DeserializeOwned,
	{
		tracing::debug!(%method, %url, "Calling trails API");

		let mut request = self.client.request(method, url.clone());
		if let Some(body) = body {
			request = request.json(body);
		}

		let response = request.send().await.map_err(|e| {
			tracing::warn!(%url, error = %e, "Trails API request failed");
			ApiError::Network(e.to_string())
		})?;

		let status = response.status();
		if !status.is_success() {
			let err = ApiError::Status {
				status: status.as_u16(),
				status_text: status.canonical_reason().unwrap_or_default().to_string(),
			};
			tracing::warn!(%url, "{}", err);
			return Err(err);
		}

		response.json::<T>().await.map_err(|e| {
			if e.is_decode() {
				ApiError::Decode(e.to_string())
			} else {
				ApiError::Network(e.to_string())
			}
		})
	}
}

#[async_trait]
impl TrailsInterface for HttpTrailsClient {
	async fn get_trail_metadata(&self, trail: &TrailRef) -> Result<TrailMetadata, ApiError> {
		let url = self.endpoint(trail, &[])?;
		self.call::<(), _>(Method::GET, url, None).await
	}

	async fn get_step_evaluation(
		&self,
		trail: &TrailRef,
		step_number: u32,
		user_inputs: &UserInputs,
		wallet_address: &str,
	) -> Result<StepEvaluation, ApiError> {
		if step_number == 0 {
			return Err(ApiError::InvalidRequest(
				"Step numbers start at 1".to_string(),
			));
		}

		let step = step_number.to_string();
		let url = self.endpoint(trail, &["steps", &step, "evaluations"])?;
		let body = StepEvaluationRequest {
			user_inputs: user_inputs.clone(),
			wallet_address: wallet_address.to_string(),
		};

		let evaluation: StepEvaluation = self.call(Method::POST, url, Some(&body)).await?;
		tracing::debug!(
			trail_id = %truncate_id(&trail.trail_id),
			step = step_number,
			contract = %evaluation.contract_address,
			"Received step evaluation"
		);
		Ok(evaluation)
	}

	async fn submit_execution(
		&self,
		trail: &TrailRef,
		record: &ExecutionRecord,
	) -> Result<ExecutionAck, ApiError> {
		let url = self.endpoint(trail, &["executions"])?;
		self.call(Method::POST, url, Some(record)).await
	}

	async fn get_execution_history(
		&self,
		trail: &TrailRef,
		wallet_addresses: Option<&[String]>,
	) -> Result<ExecutionHistory, ApiError> {
		let url = self.endpoint(trail, &["executions", "query"])?;
		let body = ExecutionQuery {
			wallet_addresses: wallet_addresses.map(<[String]>::to_vec).unwrap_or_default(),
		};
		self.call(Method::POST, url, Some(&body)).await
	}

	async fn read_trail_data(
		&self,
		trail: &TrailRef,
		node_id: &str,
		wallet_address: Option<&str>,
	) -> Result<ReadResult, ApiError> {
		let url = self.endpoint(trail, &["reads", node_id])?;
		let body = ReadRequest {
			wallet_address: wallet_address.unwrap_or(ZERO_ADDRESS).to_string(),
		};
		self.call(Method::POST, url, Some(&body)).await
	}
}
