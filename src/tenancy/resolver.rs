//! The tenant resolution gate.
//!
//! Runs once per authenticated request, before any tenant-scoped work:
//! validates that the actor's tenant exists and is in an operational
//! state, and produces the [`TenantContext`] that downstream code reads.
//! Every rejection is terminal for the request.

use chrono::{DateTime, Utc};

use super::{TenancyError, TenantContext};
use crate::models::{SubscriptionStatus, Tenant, User};

/// Walk the gate's state machine for an authenticated user.
///
/// `tenant` is the record looked up from the user's `tenant_id` (None when
/// the lookup found nothing or the user has no tenant reference). The
/// lookup is the caller's job; keeping this function pure makes the state
/// machine testable without storage.
pub fn resolve_tenant(
    user: &User,
    tenant: Option<Tenant>,
    now: DateTime<Utc>,
) -> Result<TenantContext, TenancyError> {
    // Super admins are tenant-agnostic; nothing to validate or bind.
    if user.role.is_super_admin() {
        return Ok(TenantContext::unbound());
    }

    if user.tenant_id.is_none() {
        return Err(TenancyError::TenantMissing);
    }

    let Some(tenant) = tenant else {
        return Err(TenancyError::TenantNotFound);
    };

    match tenant.status {
        SubscriptionStatus::Cancelled => return Err(TenancyError::TenantCancelled),
        SubscriptionStatus::Suspended => return Err(TenancyError::TenantSuspended),
        SubscriptionStatus::Trial | SubscriptionStatus::Active => {}
    }

    if let Some(ends_at) = tenant.subscription_ends_at
        && ends_at <= now
    {
        return Err(TenancyError::SubscriptionExpired);
    }

    Ok(TenantContext::bound(tenant))
}
