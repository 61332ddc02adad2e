mod access;
mod grants;

pub use access::AccessService;
use axum::response::{IntoResponse, Response};
pub use grants::GrantService;
use thiserror::Error;

use crate::{authz::AuthzError, db::DbError};

/// Errors from storage-backed access checks.
///
/// Denials are expected outcomes and render as 403; storage failures are
/// faults and render as 500.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error(transparent)]
    Authz(#[from] AuthzError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        match self {
            AccessError::Authz(err) => err.into_response(),
            AccessError::Db(DbError::NotFound) => (
                axum::http::StatusCode::NOT_FOUND,
                axum::Json(serde_json::json!({
                    "error": { "type": "not_found", "code": "not_found", "message": "Not found" }
                })),
            )
                .into_response(),
            AccessError::Db(err) => {
                tracing::error!(error = %err, "Storage failure during access check");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(serde_json::json!({
                        "error": {
                            "type": "internal_error",
                            "code": "internal_error",
                            "message": "Internal error",
                        }
                    })),
                )
                    .into_response()
            }
        }
    }
}
