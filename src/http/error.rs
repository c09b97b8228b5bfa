//! Gateway error to HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::gateway::GatewayError;

/// JSON error body returned for failed ledger operations. The transaction
/// id is included whenever one was assigned, so callers can reconcile
/// against ledger-side audit logs even when the effect did not take place.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

/// Wrapper turning a [`GatewayError`] into an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub GatewayError);

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_timeout() {
            StatusCode::GATEWAY_TIMEOUT
        } else {
            StatusCode::BAD_GATEWAY
        };

        tracing::warn!(
            status = %status,
            transaction_id = self.0.transaction_id().unwrap_or(""),
            error = %self.0,
            "Ledger operation failed"
        );

        let body = ErrorBody {
            error: self.0.to_string(),
            transaction_id: self
                .0
                .transaction_id()
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        };

        (status, Json(body)).into_response()
    }
}
