use async_trait::async_trait;
use uuid::Uuid;

use super::ListParams;
use crate::{
    db::error::DbResult,
    models::{CreateTenant, Tenant, UpdateTenant},
};

/// Tenants are platform-level records, not tenant-owned data, so this repo
/// takes no tenant scope. Only platform operators reach its write paths.
#[async_trait]
pub trait TenantRepo: Send + Sync {
    /// Create a new tenant.
    async fn create(&self, input: CreateTenant) -> DbResult<Tenant>;

    /// Get a tenant by its ID.
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<Tenant>>;

    /// Get a tenant by its slug.
    async fn get_by_slug(&self, slug: &str) -> DbResult<Option<Tenant>>;

    /// List all tenants.
    async fn list(&self, params: ListParams) -> DbResult<Vec<Tenant>>;

    /// Update a tenant's details, plan, status, or limits.
    ///
    /// Tenants are never hard-deleted; lifecycle changes go through the
    /// status field.
    async fn update(&self, id: Uuid, input: UpdateTenant) -> DbResult<Tenant>;
}
