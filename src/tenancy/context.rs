use uuid::Uuid;

use crate::models::Tenant;

/// Tenant context resolved for one request.
///
/// Created by the tenant gate, carried in request extensions, and dropped
/// when the request ends. Never stored in process-wide state: two
/// concurrent requests from different tenants each hold their own context.
#[derive(Debug, Clone)]
pub enum TenantContext {
    /// Super admins operate across tenants; no tenant is bound.
    Unbound,
    /// A validated, operational tenant bound for this request.
    Bound(Tenant),
}

impl TenantContext {
    pub fn unbound() -> Self {
        Self::Unbound
    }

    pub fn bound(tenant: Tenant) -> Self {
        Self::Bound(tenant)
    }

    pub fn tenant(&self) -> Option<&Tenant> {
        match self {
            Self::Unbound => None,
            Self::Bound(tenant) => Some(tenant),
        }
    }

    pub fn tenant_id(&self) -> Option<Uuid> {
        self.tenant().map(|t| t.id)
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}
