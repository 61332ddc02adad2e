use async_trait::async_trait;
use uuid::Uuid;

use super::ListParams;
use crate::{
    db::error::DbResult,
    models::{Bot, CreateBot, UpdateBot},
    tenancy::TenantScope,
};

/// Every read and write on bots goes through a [`TenantScope`]; the
/// implementation renders it as an equality predicate on `tenant_id`.
#[async_trait]
pub trait BotRepo: Send + Sync {
    /// Create a bot owned by `tenant_id`.
    ///
    /// The tenant is an explicit parameter, sourced by the caller from the
    /// request's resolved tenant context; it is never inferred here.
    async fn create(&self, tenant_id: Uuid, input: CreateBot) -> DbResult<Bot>;

    /// Get a bot by its ID within the scope.
    async fn get_by_id(&self, scope: &TenantScope, id: Uuid) -> DbResult<Option<Bot>>;

    /// List bots visible under the scope.
    async fn list(&self, scope: &TenantScope, params: ListParams) -> DbResult<Vec<Bot>>;

    /// Count bots visible under the scope, excluding soft-deleted ones.
    async fn count(&self, scope: &TenantScope) -> DbResult<i64>;

    /// Update a bot within the scope.
    async fn update(&self, scope: &TenantScope, id: Uuid, input: UpdateBot) -> DbResult<Bot>;

    /// Soft-delete a bot within the scope.
    async fn delete(&self, scope: &TenantScope, id: Uuid) -> DbResult<()>;

    /// Restore a soft-deleted bot within the scope.
    async fn restore(&self, scope: &TenantScope, id: Uuid) -> DbResult<Bot>;
}
