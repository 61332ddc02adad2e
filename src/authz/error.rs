//! Authorization errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    /// The actor may not perform this action. Denies the action only; the
    /// session and tenant context stay valid.
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthzError {
    pub fn access_denied(reason: impl Into<String>) -> Self {
        Self::AccessDenied(reason.into())
    }
}

impl IntoResponse for AuthzError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthzError::AccessDenied(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.as_str()),
            AuthzError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.as_str(),
            ),
        };

        let body = json!({
            "error": {
                "type": "authorization_error",
                "code": code,
                "message": message,
            }
        });
        (status, Json(body)).into_response()
    }
}
