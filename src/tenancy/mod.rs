//! Tenant isolation: per-request tenant resolution and row-level scoping.
//!
//! The flow over one request:
//! 1. The tenant gate middleware loads the actor's tenant, runs
//!    [`resolve_tenant`], and binds the resulting [`TenantContext`] into
//!    request extensions.
//! 2. Handlers derive a [`TenantScope`] from the actor and pass it to every
//!    repository call, which renders it as a tenant-equality predicate.
//! 3. Any gate rejection is terminal and surfaces as a 403 with a distinct
//!    reason code.

mod context;
mod error;
mod resolver;
mod scope;

pub use context::TenantContext;
pub use error::TenancyError;
pub use resolver::resolve_tenant;
pub use scope::{MissingTenantBehavior, TenantScope};
