//! Error responses for the HTTP API.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Json, Response},
};
use crowdfund_core::{FormError, OrchestratorError};
use crowdfund_trails::ApiError;
use crowdfund_wallet::WalletError;
use serde::Serialize;
use std::fmt;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	/// Error type/code
	pub error: String,
	/// Human-readable description
	pub message: String,
}

/// API error with its HTTP status.
#[derive(Debug)]
pub enum APIError {
	/// Invalid input (400)
	BadRequest { error_type: String, message: String },
	/// Unknown form, trail or resource (404)
	NotFound { error_type: String, message: String },
	/// Another operation is in progress (409)
	Conflict { error_type: String, message: String },
	/// Valid input the current state does not allow (422)
	UnprocessableEntity { error_type: String, message: String },
	/// The trails service failed (502)
	BadGateway { error_type: String, message: String },
	/// The wallet layer is disabled (503)
	ServiceUnavailable { error_type: String, message: String },
}

impl APIError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			APIError::BadRequest { .. } => StatusCode::BAD_REQUEST,
			APIError::NotFound { .. } => StatusCode::NOT_FOUND,
			APIError::Conflict { .. } => StatusCode::CONFLICT,
			APIError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
			APIError::BadGateway { .. } => StatusCode::BAD_GATEWAY,
			APIError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
		}
	}

	pub fn to_error_response(&self) -> ErrorResponse {
		let (error_type, message) = match self {
			APIError::BadRequest { error_type, message }
			| APIError::NotFound { error_type, message }
			| APIError::Conflict { error_type, message }
			| APIError::UnprocessableEntity { error_type, message }
			| APIError::BadGateway { error_type, message }
			| APIError::ServiceUnavailable { error_type, message } => (error_type, message),
		};
		ErrorResponse {
			error: error_type.clone(),
			message: message.clone(),
		}
	}

	pub fn not_found(message: impl fmt::Display) -> Self {
		APIError::NotFound {
			error_type: "NOT_FOUND".to_string(),
			message: message.to_string(),
		}
	}

	pub fn wallet_disabled() -> Self {
		APIError::ServiceUnavailable {
			error_type: "WALLET_DISABLED".to_string(),
			message: "Wallet features are disabled: no identity provider configured".to_string(),
		}
	}
}

impl fmt::Display for APIError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.status_code(), self.to_error_response().message)
	}
}

impl std::error::Error for APIError {}

impl IntoResponse for APIError {
	fn into_response(self) -> Response {
		(self.status_code(), Json(self.to_error_response())).into_response()
	}
}

impl From<ApiError> for APIError {
	fn from(error: ApiError) -> Self {
		APIError::BadGateway {
			error_type: "TRAILS_API_ERROR".to_string(),
			message: error.to_string(),
		}
	}
}

impl From<WalletError> for APIError {
	fn from(error: WalletError) -> Self {
		APIError::UnprocessableEntity {
			error_type: "WALLET_ERROR".to_string(),
			message: error.to_string(),
		}
	}
}

impl From<FormError> for APIError {
	fn from(error: FormError) -> Self {
		let message = error.to_string();
		match error {
			FormError::Invalid(_) => APIError::BadRequest {
				error_type: "INVALID_INPUT".to_string(),
				message,
			},
			FormError::UnknownCampaign(_) | FormError::UnknownDonation(_) => APIError::BadRequest {
				error_type: "UNKNOWN_SELECTION".to_string(),
				message,
			},
			FormError::NotRefundable(_) => APIError::UnprocessableEntity {
				error_type: "NOT_REFUNDABLE".to_string(),
				message,
			},
			FormError::Orchestrator(OrchestratorError::InFlight) => APIError::Conflict {
				error_type: "IN_FLIGHT".to_string(),
				message,
			},
			FormError::Listing(e) => e.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_form_errors_map_to_statuses() {
		let invalid: APIError = FormError::Invalid("Amount is required".to_string()).into();
		assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
		assert_eq!(invalid.to_error_response().message, "Amount is required");

		let busy: APIError = FormError::Orchestrator(OrchestratorError::InFlight).into();
		assert_eq!(busy.status_code(), StatusCode::CONFLICT);

		let refunded: APIError = FormError::NotRefundable("don_003".to_string()).into();
		assert_eq!(refunded.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
	}

	#[test]
	fn test_trails_failure_is_bad_gateway() {
		let error: APIError = ApiError::Status {
			status: 500,
			status_text: "Internal Server Error".to_string(),
		}
		.into();
		assert_eq!(error.status_code(), StatusCode::BAD_GATEWAY);
		assert_eq!(
			error.to_error_response().message,
			"Herd API error: 500 Internal Server Error"
		);
	}
}
