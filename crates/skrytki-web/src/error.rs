use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use skrytki_search::LookupError;

/// A lookup failure rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub LookupError);

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            LookupError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            LookupError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            LookupError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            LookupError::Query(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(err: LookupError) -> Self {
        Self(err)
    }
}

/// Malformed query-string parameters, such as `?limit=abc`.
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(LookupError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("request failed ({status}): {}", self.0);
        } else {
            log::debug!("rejected request: {}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
