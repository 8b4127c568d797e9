//! Mapping of service results onto HTTP responses
//!
//! Errors are always rendered as `{"error": "<message>"}`. Insufficient data
//! additionally carries the partial totals so clients can still show them.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::{BudgetError, BudgetResult};

/// HTTP status for an error kind
pub fn status_for(err: &BudgetError) -> StatusCode {
    match err {
        BudgetError::InvalidIdentifier(_) | BudgetError::InvalidPeriods(_) => {
            StatusCode::BAD_REQUEST
        }
        BudgetError::NoData => StatusCode::NOT_FOUND,
        BudgetError::InvalidSchema { .. }
        | BudgetError::InsufficientData { .. }
        | BudgetError::AmountOutOfRange(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BudgetError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        BudgetError::ComputationFailure(_)
        | BudgetError::Config(_)
        | BudgetError::Io(_)
        | BudgetError::Json(_)
        | BudgetError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON payload for an error
pub fn error_body(err: &BudgetError) -> Value {
    match err {
        BudgetError::InsufficientData {
            total_income,
            total_expense,
        } => json!({
            "error": err.to_string(),
            "total_income": total_income,
            "total_expense": total_expense,
        }),
        _ => json!({ "error": err.to_string() }),
    }
}

/// An error paired with the status policy in force
#[derive(Debug)]
pub struct ApiError {
    error: BudgetError,
    legacy_status: bool,
}

impl ApiError {
    pub fn new(error: BudgetError, legacy_status: bool) -> Self {
        Self {
            error,
            legacy_status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.legacy_status {
            StatusCode::OK
        } else {
            status_for(&self.error)
        };

        if self.error.is_client_error() {
            tracing::debug!(error = %self.error, "Request rejected");
        } else if status_for(&self.error).is_server_error() {
            tracing::error!(error = %self.error, "Request failed");
        } else {
            tracing::info!(error = %self.error, "No insight for request");
        }

        (status, Json(error_body(&self.error))).into_response()
    }
}

/// Render a service result
pub fn respond<T: Serialize>(result: BudgetResult<T>, legacy_status: bool) -> Response {
    match result {
        Ok(value) => Json(value).into_response(),
        Err(error) => ApiError::new(error, legacy_status).into_response(),
    }
}
