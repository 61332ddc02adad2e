use async_trait::async_trait;
use uuid::Uuid;

use super::ListParams;
use crate::{
    db::error::DbResult,
    models::{CreateUser, UpdateUser, User},
    tenancy::TenantScope,
};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Create a new user.
    ///
    /// Rejects inputs that break the role/tenant pairing invariant
    /// (super_admin with a tenant, or any other role without one).
    async fn create(&self, input: CreateUser) -> DbResult<User>;

    /// Get a user by ID. Unscoped: the authentication layer resolves
    /// actors before any tenant context exists.
    async fn get_by_id(&self, id: Uuid) -> DbResult<Option<User>>;

    /// Get a user by email. Unscoped, for the same reason as `get_by_id`.
    async fn get_by_email(&self, email: &str) -> DbResult<Option<User>>;

    /// List users visible under the given tenant scope.
    async fn list(&self, scope: &TenantScope, params: ListParams) -> DbResult<Vec<User>>;

    /// Update a user within the given tenant scope.
    async fn update(&self, scope: &TenantScope, id: Uuid, input: UpdateUser) -> DbResult<User>;
}
