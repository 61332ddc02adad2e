//! BotHub core: authorization and tenant isolation for a multi-tenant
//! WhatsApp chatbot platform.
//!
//! This crate decides *whether* an already-authenticated actor may perform
//! an operation against a resource, and *which rows* that actor may ever
//! see. It exposes no routes of its own; the HTTP layer mounts the tenant
//! gate middleware and consults the policies before each protected
//! operation.
//!
//! # Layers
//!
//! - [`models`] — tenants, users, bots, grants, and the bot-owned child
//!   entities.
//! - [`tenancy`] — per-request tenant resolution and the row-level scope
//!   filter.
//! - [`authz`] — capability resolution, entity policies, and named gates.
//! - [`db`] — repository traits and the SQLite backend.
//! - [`services`] — storage-backed decision and grant-mutation front-ends.
//! - [`middleware`] — the axum tenant gate.

pub mod authz;
pub mod config;
pub mod db;
pub mod middleware;
pub mod models;
pub mod services;
pub mod tenancy;

use std::sync::Arc;

use crate::{config::BotHubConfig, db::DbPool};

/// Shared application state handed to the middleware and services.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: Arc<BotHubConfig>,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: Arc<BotHubConfig>) -> Self {
        Self { db, config }
    }

    /// Tenant scope for a request made by `user`, honoring the configured
    /// missing-tenant behavior.
    pub fn scope_for(&self, user: &models::User) -> tenancy::TenantScope {
        tenancy::TenantScope::for_actor(user, self.config.tenancy.missing_tenant_behavior)
    }
}
