use serde::{Deserialize, Serialize};

use crate::tenancy::MissingTenantBehavior;

/// Tenant-isolation configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenancyConfig {
    /// What the scope filter does when an authenticated non-super-admin
    /// actor carries no tenant reference. `fail_open` skips the filter and
    /// logs a warning; `fail_closed` makes such queries match nothing.
    #[serde(default)]
    pub missing_tenant_behavior: MissingTenantBehavior,
}
