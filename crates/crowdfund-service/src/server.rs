//! HTTP server for the crowdfund API.
//!
//! Exposes the wallet session, listings, form submissions and trail
//! pass-through endpoints under `/api` for the browser front-end.

use crate::apis::{
	self,
	forms::SubmissionResponse,
	listings::CampaignView,
	session::{LinkResponse, LoginRequest, LoginResponse},
	trails::ReadRequestBody,
	APIError,
};
use axum::{
	extract::{Path, State},
	response::Json,
	routing::{get, post},
	Router,
};
use crowdfund_config::ApiConfig;
use crowdfund_core::forms::{CreationInput, DonationInput, RefundInput};
use crowdfund_core::{CrowdfundEngine, SessionSummary};
use crowdfund_types::{DonationRecord, ReadResult, TrailMetadata};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	pub engine: Arc<CrowdfundEngine>,
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
	Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/session", get(handle_get_session))
				.route("/session/login", post(handle_login))
				.route("/session/link", post(handle_link))
				.route("/session/logout", post(handle_logout))
				.route("/campaigns", get(handle_list_campaigns).post(handle_create_campaign))
				.route("/donations", get(handle_list_donations).post(handle_donate))
				.route("/refunds", get(handle_list_refundable).post(handle_refund))
				.route("/forms/{form}/state", get(handle_form_state))
				.route("/forms/{form}/reset", post(handle_form_reset))
				.route("/trails/{trail}/metadata", get(handle_trail_metadata))
				.route("/trails/{trail}/reads/{node}", post(handle_trail_read)),
		)
		.layer(
			ServiceBuilder::new()
				.layer(TraceLayer::new_for_http())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}

/// Starts the HTTP server and serves until it fails.
pub async fn start_server(
	api_config: ApiConfig,
	engine: Arc<CrowdfundEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
	let app = router(AppState { engine });

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("Crowdfund API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

fn logged<T>(operation: &str, result: Result<T, APIError>) -> Result<Json<T>, APIError> {
	match result {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("{} failed: {}", operation, e);
			Err(e)
		},
	}
}

async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSummary> {
	Json(apis::session::get_session(&state.engine).await)
}

async fn handle_login(
	State(state): State<AppState>,
	Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, APIError> {
	logged("Login", apis::session::login(&state.engine, request).await)
}

async fn handle_link(State(state): State<AppState>) -> Result<Json<LinkResponse>, APIError> {
	logged("Wallet link", apis::session::link(&state.engine).await)
}

async fn handle_logout(State(state): State<AppState>) -> Result<Json<SessionSummary>, APIError> {
	logged("Logout", apis::session::logout(&state.engine).await)
}

async fn handle_list_campaigns(
	State(state): State<AppState>,
) -> Result<Json<Vec<CampaignView>>, APIError> {
	logged("Campaign listing", apis::listings::campaigns(&state.engine).await)
}

async fn handle_list_donations(
	State(state): State<AppState>,
) -> Result<Json<Vec<DonationRecord>>, APIError> {
	logged("Donation listing", apis::listings::donations(&state.engine).await)
}

async fn handle_list_refundable(
	State(state): State<AppState>,
) -> Result<Json<Vec<DonationRecord>>, APIError> {
	logged("Refund listing", apis::listings::refundable(&state.engine).await)
}

async fn handle_create_campaign(
	State(state): State<AppState>,
	Json(input): Json<CreationInput>,
) -> Result<Json<SubmissionResponse>, APIError> {
	logged("Campaign creation", apis::forms::create_campaign(&state.engine, input).await)
}

async fn handle_donate(
	State(state): State<AppState>,
	Json(input): Json<DonationInput>,
) -> Result<Json<SubmissionResponse>, APIError> {
	logged("Donation", apis::forms::donate(&state.engine, input).await)
}

async fn handle_refund(
	State(state): State<AppState>,
	Json(input): Json<RefundInput>,
) -> Result<Json<SubmissionResponse>, APIError> {
	logged("Refund", apis::forms::refund(&state.engine, input).await)
}

async fn handle_form_state(
	Path(form): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<SubmissionResponse>, APIError> {
	logged("Form state", apis::forms::state(&state.engine, &form))
}

async fn handle_form_reset(
	Path(form): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<SubmissionResponse>, APIError> {
	logged("Form reset", apis::forms::reset(&state.engine, &form))
}

async fn handle_trail_metadata(
	Path(trail): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<TrailMetadata>, APIError> {
	logged("Trail metadata", apis::trails::metadata(&state.engine, &trail).await)
}

async fn handle_trail_read(
	Path((trail, node)): Path<(String, String)>,
	State(state): State<AppState>,
	Json(body): Json<ReadRequestBody>,
) -> Result<Json<ReadResult>, APIError> {
	logged(
		"Trail read",
		apis::trails::read_node(&state.engine, &trail, &node, body).await,
	)
}
