//! Tenant resolution errors.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Terminal outcomes of the tenant resolution gate.
///
/// Every variant ends the request; there is no fallback tenant. All render
/// as 403 with a distinct machine-readable code so support can tell a
/// suspended tenant from a misconfigured account without reading logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TenancyError {
    #[error("User is not assigned to a tenant")]
    TenantMissing,

    #[error("Tenant not found")]
    TenantNotFound,

    #[error("Tenant subscription is cancelled")]
    TenantCancelled,

    #[error("Tenant is suspended")]
    TenantSuspended,

    #[error("Tenant subscription has expired")]
    SubscriptionExpired,
}

impl TenancyError {
    /// Machine-readable code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TenantMissing => "tenant_missing",
            Self::TenantNotFound => "tenant_not_found",
            Self::TenantCancelled => "tenant_cancelled",
            Self::TenantSuspended => "tenant_suspended",
            Self::SubscriptionExpired => "subscription_expired",
        }
    }

    /// Whether this rejection points at inconsistent data rather than an
    /// expected billing state.
    pub fn is_data_inconsistency(&self) -> bool {
        matches!(self, Self::TenantMissing | Self::TenantNotFound)
    }
}

impl IntoResponse for TenancyError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "type": "forbidden",
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (StatusCode::FORBIDDEN, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_variants_render_forbidden() {
        for err in [
            TenancyError::TenantMissing,
            TenancyError::TenantNotFound,
            TenancyError::TenantCancelled,
            TenancyError::TenantSuspended,
            TenancyError::SubscriptionExpired,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
        }
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            TenancyError::TenantMissing.code(),
            TenancyError::TenantNotFound.code(),
            TenancyError::TenantCancelled.code(),
            TenancyError::TenantSuspended.code(),
            TenancyError::SubscriptionExpired.code(),
        ];
        let mut deduped = codes.to_vec();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), codes.len());
    }

    #[test]
    fn test_data_inconsistency_classification() {
        assert!(TenancyError::TenantMissing.is_data_inconsistency());
        assert!(TenancyError::TenantNotFound.is_data_inconsistency());
        assert!(!TenancyError::TenantSuspended.is_data_inconsistency());
    }
}
