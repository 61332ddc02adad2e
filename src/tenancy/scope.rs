//! Row-level tenant scoping for queries against tenant-owned entities.
//!
//! A [`TenantScope`] is passed explicitly to every repository read/write on
//! tenant-owned data and rendered into the query as an equality predicate
//! on the entity's tenant column. Removing the filter is never implicit:
//! callers with a legitimate cross-tenant need go through the named
//! [`TenantScope::unscoped_for_maintenance`] constructor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

/// What the scope filter does when an authenticated non-super-admin actor
/// has no tenant reference.
///
/// `FailOpen` preserves the historically observed behavior (skip the
/// filter, log a warning). `FailClosed` treats the account as matching no
/// rows at all. Misconfigured accounts are the only way to reach either
/// branch; the tenant gate rejects them on normal request paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTenantBehavior {
    #[default]
    FailOpen,
    FailClosed,
}

/// Query-time tenant restriction for a single storage call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantScope {
    /// Restrict to rows owned by this tenant.
    Tenant(Uuid),
    /// No restriction. Only reachable for super admins, trusted internal
    /// callers, and (under `FailOpen`) misconfigured accounts.
    Unscoped,
    /// Match nothing. Produced under `FailClosed` for misconfigured
    /// accounts.
    Empty,
}

impl TenantScope {
    /// Scope for a request made by `user`.
    ///
    /// Super admins run unscoped. Everyone else is pinned to their own
    /// tenant; an actor without a tenant reference falls through to
    /// `behavior`.
    pub fn for_actor(user: &User, behavior: MissingTenantBehavior) -> Self {
        if user.role.is_super_admin() {
            return Self::Unscoped;
        }
        match user.tenant_id {
            Some(tenant_id) => Self::Tenant(tenant_id),
            None => {
                tracing::warn!(
                    user_id = %user.id,
                    role = %user.role,
                    behavior = ?behavior,
                    "Tenant scope requested for a user without a tenant reference"
                );
                match behavior {
                    MissingTenantBehavior::FailOpen => Self::Unscoped,
                    MissingTenantBehavior::FailClosed => Self::Empty,
                }
            }
        }
    }

    /// Scope for system code acting on behalf of a known tenant.
    pub fn tenant(tenant_id: Uuid) -> Self {
        Self::Tenant(tenant_id)
    }

    /// Explicit cross-tenant bypass for platform administration and
    /// internal maintenance jobs. The reason is logged so every bypass is
    /// attributable.
    pub fn unscoped_for_maintenance(reason: &str) -> Self {
        tracing::info!(reason, "Running tenant-unscoped query");
        Self::Unscoped
    }

    pub fn tenant_id(&self) -> Option<Uuid> {
        match self {
            Self::Tenant(id) => Some(*id),
            Self::Unscoped | Self::Empty => None,
        }
    }

    /// Record which tenant a query was scoped to, for audit/debugging.
    pub fn log_applied(&self, entity: &str) {
        match self {
            Self::Tenant(id) => {
                tracing::debug!(entity, tenant_id = %id, "Tenant scope applied");
            }
            Self::Unscoped => {
                tracing::debug!(entity, "Query running unscoped");
            }
            Self::Empty => {
                tracing::debug!(entity, "Tenant scope matches nothing");
            }
        }
    }
}
