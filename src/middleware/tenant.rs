//! Tenant resolution middleware.
//!
//! Runs after authentication and before any tenant-scoped handler. Loads
//! the actor's tenant, validates it through the resolution gate, and
//! publishes the resulting [`TenantContext`] into request extensions for
//! the lifetime of the request.
//!
//! Unauthenticated requests pass through unresolved; public routes never
//! reach tenant-sensitive resources. Every gate rejection is terminal and
//! renders as a 403 carrying the specific reason code.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    AppState,
    db::DbError,
    models::User,
    tenancy::{TenancyError, resolve_tenant},
};

/// Extension type the authentication layer inserts for each authenticated
/// request. This crate trusts it as already authenticated.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Failures while running the tenant gate.
#[derive(Debug, Error)]
pub enum TenantGateError {
    #[error(transparent)]
    Tenancy(#[from] TenancyError),

    #[error("Tenant lookup failed: {0}")]
    Db(#[from] DbError),
}

impl IntoResponse for TenantGateError {
    fn into_response(self) -> Response {
        match self {
            TenantGateError::Tenancy(err) => err.into_response(),
            TenantGateError::Db(err) => {
                tracing::error!(error = %err, "Tenant lookup failed");
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

/// Middleware that resolves and validates the actor's tenant.
pub async fn tenant_gate_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, TenantGateError> {
    // No actor: public route, nothing to resolve.
    let Some(AuthenticatedUser(user)) = req.extensions().get::<AuthenticatedUser>().cloned()
    else {
        return Ok(next.run(req).await);
    };

    let tenant = match user.tenant_id {
        Some(tenant_id) => state.db.tenants().get_by_id(tenant_id).await?,
        None => None,
    };

    let context = resolve_tenant(&user, tenant, chrono::Utc::now()).inspect_err(|err| {
        if err.is_data_inconsistency() {
            tracing::warn!(
                user_id = %user.id,
                tenant_id = ?user.tenant_id,
                code = err.code(),
                "Tenant gate rejected a misconfigured account"
            );
        } else {
            tracing::debug!(
                user_id = %user.id,
                code = err.code(),
                "Tenant gate rejected request"
            );
        }
    })?;

    if let Some(tenant_id) = context.tenant_id() {
        // Recorded per request; the session layer reuses it across requests.
        tracing::debug!(user_id = %user.id, tenant_id = %tenant_id, "Tenant context bound");
    }

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

#[cfg(all(test, feature = "database-sqlite"))]
mod tests {
    use std::sync::Arc;

    use axum::{
        Extension, Router,
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::BotHubConfig,
        db::{DbPool, tests::TestDb},
        models::{SubscriptionStatus, UpdateTenant, UserRole},
        tenancy::TenantContext,
    };

    async fn handler(context: Option<Extension<TenantContext>>) -> String {
        match context {
            Some(Extension(ctx)) => match ctx.tenant_id() {
                Some(id) => format!("bound:{}", id),
                None => "unbound".to_string(),
            },
            None => "unresolved".to_string(),
        }
    }

    fn router(ctx: &TestDb, user: Option<User>) -> Router {
        let state = AppState::new(
            Arc::new(DbPool::from_sqlite(ctx.pool.clone())),
            Arc::new(BotHubConfig::default()),
        );
        let mut router = Router::new()
            .route("/", get(handler))
            .layer(from_fn_with_state(state, tenant_gate_middleware));
        if let Some(user) = user {
            router = router.layer(Extension(AuthenticatedUser(user)));
        }
        router
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8")
    }

    #[tokio::test]
    async fn test_operational_tenant_binds_context() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let admin = ctx
            .create_user(UserRole::Admin, Some(tenant.id), "admin@acme.io")
            .await;

        let response = router(&ctx, Some(admin))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, format!("bound:{}", tenant.id));
    }

    #[tokio::test]
    async fn test_suspended_tenant_rejected_before_handler() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        ctx.tenants()
            .update(
                tenant.id,
                UpdateTenant {
                    name: None,
                    plan: None,
                    status: Some(SubscriptionStatus::Suspended),
                    subscription_ends_at: None,
                    limits: None,
                },
            )
            .await
            .expect("Update should succeed");
        let admin = ctx
            .create_user(UserRole::Admin, Some(tenant.id), "admin@acme.io")
            .await;

        let response = router(&ctx, Some(admin))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_string(response).await.contains("tenant_suspended"));
    }

    #[tokio::test]
    async fn test_user_without_tenant_rejected() {
        let ctx = TestDb::new().await;
        let tenant = ctx.create_tenant("acme").await;
        let mut admin = ctx
            .create_user(UserRole::Admin, Some(tenant.id), "admin@acme.io")
            .await;
        // Simulate a misconfigured account handed to us by the auth layer.
        admin.tenant_id = None;

        let response = router(&ctx, Some(admin))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(body_string(response).await.contains("tenant_missing"));
    }

    #[tokio::test]
    async fn test_super_admin_passes_unbound() {
        let ctx = TestDb::new().await;
        let root = ctx.create_user(UserRole::SuperAdmin, None, "root@bothub.io").await;

        let response = router(&ctx, Some(root))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "unbound");
    }

    #[tokio::test]
    async fn test_unauthenticated_passes_through_unresolved() {
        let ctx = TestDb::new().await;

        let response = router(&ctx, None)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "unresolved");
    }
}
